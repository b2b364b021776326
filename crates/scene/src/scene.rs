//! The render orchestrator.
//!
//! The helicopter never moves. Its mesh stays at the camera's local origin and the world is
//! translated and yawed the opposite way, which is what makes a first-person camera rigidly
//! attached to the helicopter work. Every frame is composed as a fixed sequence of passes:
//! lighting, mirrored reflection, the opaque world, and planar shadows.

use crate::integrator::StickIntegrator;
use engine_core::{TransformStack, WorldPose};
use glam::Vec3;
use input::{DirectionStick, LookDistance, StickEvent, StickState, ThrottleStick};
use renderer::{
    CameraPose, Drawable, Frame, GraphicsContext, InitError, Light, Projection, RenderError,
    SkyscraperHost,
};

/// The helicopter is only reflected once the world has moved past this depth.
pub const HELICOPTER_REFLECTION_MAX_Z: f32 = -1.0;

/// Whether the helicopter shows up in the mirror for a given pose.
pub fn reflects_helicopter(pose: &WorldPose) -> bool {
    pose.translation.z < HELICOPTER_REFLECTION_MAX_Z
}

/// The helicopter collaborator. Besides drawing, it receives a copy of the stick state to
/// drive its own animation.
pub trait HelicopterModel: Drawable {
    fn set_sticks(&mut self, sticks: StickState);

    /// Advance animation by one frame. Called once per frame before any drawing.
    fn advance_frame(&mut self) {}

    /// The helicopter as a plain drawable, for handing to the skyscraper's reflection
    /// and shadow entry points.
    fn as_drawable(&self) -> &dyn Drawable;
}

enum ContextState<G> {
    Uninitialized,
    Ready(G),
    /// Initialisation failed. Permanent.
    Failed,
    /// Torn down by the owning window.
    Released,
}

/// Owns the world pose, camera and projection state, the light, and the three collaborators,
/// and turns them into one [`Frame`] per call to [`Scene::draw`].
pub struct Scene<G: GraphicsContext> {
    state: ContextState<G>,
    pose: WorldPose,
    camera: CameraPose,
    projection: Projection,
    light: Light,
    show_light_source: bool,
    transforms: TransformStack,
    integrator: StickIntegrator,
    skyscraper: Box<dyn SkyscraperHost>,
    skybox: Box<dyn Drawable>,
    helicopter: Box<dyn HelicopterModel>,
}

impl<G: GraphicsContext> Scene<G> {
    pub fn new(
        skyscraper: Box<dyn SkyscraperHost>,
        skybox: Box<dyn Drawable>,
        helicopter: Box<dyn HelicopterModel>,
    ) -> Self {
        Self {
            state: ContextState::Uninitialized,
            pose: WorldPose::default(),
            camera: CameraPose::default(),
            projection: Projection::new(1, 1),
            light: Light::default(),
            show_light_source: false,
            transforms: TransformStack::new(),
            integrator: StickIntegrator::new(),
            skyscraper,
            skybox,
            helicopter,
        }
    }

    /// Bring the scene up on a graphics context produced by `connect`.
    ///
    /// On failure the error is logged and returned, and the scene stays inert for good:
    /// every later [`Scene::draw`] does nothing.
    pub fn init(
        &mut self,
        width: u32,
        height: u32,
        connect: impl FnOnce() -> Result<G, InitError>,
    ) -> Result<(), InitError> {
        if !matches!(self.state, ContextState::Uninitialized) {
            log::warn!("Scene already initialised or released, ignoring init");
            return Err(InitError::NoContext);
        }

        self.projection.set_viewport(width, height);
        self.pose = WorldPose::initial();

        let mut context = match connect() {
            Ok(context) => context,
            Err(e) => {
                log::error!("Failed to initialise graphics: {}", e);
                self.state = ContextState::Failed;
                return Err(e);
            }
        };

        self.skyscraper.init(&mut context);
        self.skybox.init(&mut context);
        self.helicopter.init(&mut context);
        self.light.init(&mut context);
        self.state = ContextState::Ready(context);

        log::info!("Scene ready at {}x{}", width, height);
        Ok(())
    }

    /// Integrate the sticks, compose one frame, and present it.
    pub fn draw(&mut self) -> Result<(), RenderError> {
        if !self.is_ready() {
            return Ok(());
        }

        let frame = self.compose_frame();
        let projection = self.projection.matrix();
        if let ContextState::Ready(context) = &mut self.state {
            context.present(&frame, projection)?;
        }
        Ok(())
    }

    fn compose_frame(&mut self) -> Frame {
        let mut frame = Frame::new();
        frame.clear();

        self.transforms.load_identity();
        self.camera.apply(&mut self.transforms);

        self.integrator.integrate(&mut self.pose);
        self.helicopter.advance_frame();
        log::trace!(
            "pose: translation {:?}, yaw {:.1}",
            self.pose.translation,
            self.pose.yaw_degrees
        );

        self.lighting_pass(&mut frame);
        self.reflection_pass(&mut frame);

        // Opaque world pass. These transforms accumulate on purpose.
        self.pose.apply_world(&mut self.transforms);
        self.skyscraper.draw(&mut frame, &mut self.transforms);

        self.transforms.translate(self.pose.inverse_translation());
        self.skybox.draw(&mut frame, &mut self.transforms);

        self.pose.apply_inverse_yaw(&mut self.transforms);
        self.helicopter.draw(&mut frame, &mut self.transforms);

        self.shadow_pass(&mut frame);
        frame
    }

    fn lighting_pass(&mut self, frame: &mut Frame) {
        let mut scope = self.transforms.push();
        self.pose.apply_yaw(&mut scope);
        self.light.set_enable(true, frame, &scope);
        if self.show_light_source {
            scope.translate(self.pose.translation);
            self.light.draw_source_marker(frame, &scope);
        }
    }

    fn reflection_pass(&mut self, frame: &mut Frame) {
        let mut scope = self.transforms.push();
        let light_position = self.light.position();

        // Mirrored lighting for the reflected geometry. The light itself never moves.
        let reflected = self.light.reflected_position();
        self.light.enable_at(reflected, frame, &scope);

        self.pose.apply_world(&mut scope);
        self.skyscraper
            .draw_reflection(frame, &mut scope, light_position);
        self.skyscraper.draw_component_reflection(
            frame,
            &mut scope,
            self.skybox.as_ref(),
            self.pose.skybox_placement(),
            light_position,
        );
        if reflects_helicopter(&self.pose) {
            self.skyscraper.draw_component_reflection(
                frame,
                &mut scope,
                self.helicopter.as_drawable(),
                self.pose.helicopter_placement(),
                light_position,
            );
        }

        self.light.set_enable(true, frame, &scope);
    }

    fn shadow_pass(&mut self, frame: &mut Frame) {
        let mut scope = self.transforms.push();
        self.pose.apply_world(&mut scope);
        self.skyscraper.draw_component_shadows(
            frame,
            &mut scope,
            self.light.position(),
            self.helicopter.as_drawable(),
            self.pose.helicopter_placement(),
        );
    }

    /// Step the field of view one degree. Silently ignored at either bound.
    pub fn change_look_distance(&mut self, distance: LookDistance) {
        match distance {
            LookDistance::Further => self.projection.further(),
            LookDistance::Closer => self.projection.closer(),
        }
        log::debug!("fovy now {}", self.projection.fovy_degrees());
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        log::debug!("Resizing scene to {}x{}", width, height);
        self.projection.set_viewport(width, height);
        if let ContextState::Ready(context) = &mut self.state {
            context.resize(width, height);
        }
    }

    /// Release the graphics context. The scene cannot be brought back up afterwards.
    pub fn teardown(&mut self) {
        let previous = std::mem::replace(&mut self.state, ContextState::Released);
        if let ContextState::Ready(context) = previous {
            drop(context);
            log::info!("Graphics context released");
        }
    }

    /// Route an input event. [`StickEvent::Quit`] belongs to the window and is ignored here.
    pub fn handle_event(&mut self, event: StickEvent) {
        match event {
            StickEvent::ActivateThrottle(flags) => self.activate_throttle(flags),
            StickEvent::DeactivateThrottle(flags) => self.deactivate_throttle(flags),
            StickEvent::ActivateDirection(flags) => self.activate_direction(flags),
            StickEvent::DeactivateDirection(flags) => self.deactivate_direction(flags),
            StickEvent::ChangeLookDistance(distance) => self.change_look_distance(distance),
            StickEvent::ToggleLightSource => {
                self.set_light_source_drawing(!self.show_light_source)
            }
            StickEvent::Quit => {}
        }
    }

    pub fn activate_throttle(&mut self, flags: ThrottleStick) {
        self.integrator.activate_throttle(flags);
        self.forward_sticks();
    }

    pub fn deactivate_throttle(&mut self, flags: ThrottleStick) {
        self.integrator.deactivate_throttle(flags);
        self.forward_sticks();
    }

    pub fn activate_direction(&mut self, flags: DirectionStick) {
        self.integrator.activate_direction(flags);
        self.forward_sticks();
    }

    pub fn deactivate_direction(&mut self, flags: DirectionStick) {
        self.integrator.deactivate_direction(flags);
        self.forward_sticks();
    }

    fn forward_sticks(&mut self) {
        let sticks = self.integrator.sticks();
        log::debug!("sticks: {:?}", sticks);
        self.helicopter.set_sticks(sticks);
    }

    pub fn set_light_source_drawing(&mut self, show: bool) {
        self.show_light_source = show;
    }

    pub fn is_drawing_light_source(&self) -> bool {
        self.show_light_source
    }

    pub fn set_light_position(&mut self, position: Vec3) {
        self.light.set_position(position);
    }

    pub fn set_light_position_x(&mut self, x: f32) {
        self.light.set_x(x);
    }

    pub fn set_light_position_y(&mut self, y: f32) {
        self.light.set_y(y);
    }

    pub fn set_light_position_z(&mut self, z: f32) {
        self.light.set_z(z);
    }

    pub fn set_camera(&mut self, camera: CameraPose) {
        self.camera = camera;
    }

    pub fn set_eye_x(&mut self, value: f32) {
        self.camera.set_eye_x(value);
    }

    pub fn set_eye_y(&mut self, value: f32) {
        self.camera.set_eye_y(value);
    }

    pub fn set_eye_z(&mut self, value: f32) {
        self.camera.set_eye_z(value);
    }

    pub fn set_center_x(&mut self, value: f32) {
        self.camera.set_center_x(value);
    }

    pub fn set_center_y(&mut self, value: f32) {
        self.camera.set_center_y(value);
    }

    pub fn set_center_z(&mut self, value: f32) {
        self.camera.set_center_z(value);
    }

    pub fn set_up_x(&mut self, value: f32) {
        self.camera.set_up_x(value);
    }

    pub fn set_up_y(&mut self, value: f32) {
        self.camera.set_up_y(value);
    }

    pub fn set_up_z(&mut self, value: f32) {
        self.camera.set_up_z(value);
    }

    pub fn set_pose(&mut self, pose: WorldPose) {
        self.pose = pose;
    }

    pub fn pose(&self) -> WorldPose {
        self.pose
    }

    pub fn camera(&self) -> &CameraPose {
        &self.camera
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn light(&self) -> &Light {
        &self.light
    }

    pub fn transforms(&self) -> &TransformStack {
        &self.transforms
    }

    pub fn sticks(&self) -> StickState {
        self.integrator.sticks()
    }

    pub fn context(&self) -> Option<&G> {
        match &self.state {
            ContextState::Ready(context) => Some(context),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ContextState::Ready(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, ContextState::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::{Mat4, Placement};
    use renderer::{mirror_z, FrameCommand, Material, MeshData, MeshId, MeshStore, PassMode};
    use std::cell::RefCell;
    use std::rc::Rc;

    const EPS: f32 = 1e-4;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Init(&'static str),
        Draw {
            name: &'static str,
            mode: PassMode,
            transform: Mat4,
            depth: usize,
        },
        Reflection {
            name: &'static str,
            light: Vec3,
        },
        ComponentReflection {
            placement: Placement,
            light: Vec3,
        },
        Shadows {
            placement: Placement,
            light: Vec3,
        },
        Sticks(StickState),
        Advance,
    }

    type Log = Rc<RefCell<Vec<Event>>>;

    struct Recorder {
        name: &'static str,
        log: Log,
    }

    impl Drawable for Recorder {
        fn init(&mut self, meshes: &mut dyn MeshStore) {
            meshes.upload_mesh(&MeshData::cube());
            self.log.borrow_mut().push(Event::Init(self.name));
        }

        fn draw(&self, frame: &mut Frame, transforms: &mut TransformStack) {
            frame.draw(MeshId(0), Material::Lit, transforms.current(), [1.0; 4]);
            self.log.borrow_mut().push(Event::Draw {
                name: self.name,
                mode: frame.mode(),
                transform: transforms.current(),
                depth: transforms.depth(),
            });
        }

        fn draw_reflection(&self, frame: &mut Frame, transforms: &mut TransformStack, light: Vec3) {
            self.log.borrow_mut().push(Event::Reflection {
                name: self.name,
                light,
            });
            frame.with_mode(PassMode::Reflected, |frame| self.draw(frame, transforms));
        }
    }

    struct RecordingHost(Recorder);

    impl Drawable for RecordingHost {
        fn init(&mut self, meshes: &mut dyn MeshStore) {
            self.0.init(meshes);
        }

        fn draw(&self, frame: &mut Frame, transforms: &mut TransformStack) {
            self.0.draw(frame, transforms);
        }

        fn draw_reflection(&self, frame: &mut Frame, transforms: &mut TransformStack, light: Vec3) {
            self.0.draw_reflection(frame, transforms, light);
        }
    }

    impl SkyscraperHost for RecordingHost {
        fn draw_component_reflection(
            &self,
            frame: &mut Frame,
            transforms: &mut TransformStack,
            target: &dyn Drawable,
            placement: Placement,
            light_position: Vec3,
        ) {
            self.0.log.borrow_mut().push(Event::ComponentReflection {
                placement,
                light: light_position,
            });
            let mut scope = transforms.push();
            scope.multiply(mirror_z());
            placement.apply(&mut scope);
            target.draw_reflection(frame, &mut scope, light_position);
        }

        fn draw_component_shadows(
            &self,
            frame: &mut Frame,
            transforms: &mut TransformStack,
            light_position: Vec3,
            target: &dyn Drawable,
            placement: Placement,
        ) {
            self.0.log.borrow_mut().push(Event::Shadows {
                placement,
                light: light_position,
            });
            let mut scope = transforms.push();
            placement.apply(&mut scope);
            frame.with_mode(PassMode::Shadow, |frame| target.draw(frame, &mut scope));
        }
    }

    struct RecordingHelicopter(Recorder);

    impl Drawable for RecordingHelicopter {
        fn init(&mut self, meshes: &mut dyn MeshStore) {
            self.0.init(meshes);
        }

        fn draw(&self, frame: &mut Frame, transforms: &mut TransformStack) {
            self.0.draw(frame, transforms);
        }

        fn draw_reflection(&self, frame: &mut Frame, transforms: &mut TransformStack, light: Vec3) {
            self.0.draw_reflection(frame, transforms, light);
        }
    }

    impl HelicopterModel for RecordingHelicopter {
        fn set_sticks(&mut self, sticks: StickState) {
            self.0.log.borrow_mut().push(Event::Sticks(sticks));
        }

        fn advance_frame(&mut self) {
            self.0.log.borrow_mut().push(Event::Advance);
        }

        fn as_drawable(&self) -> &dyn Drawable {
            self
        }
    }

    #[derive(Default)]
    struct RecordingContext {
        uploads: u32,
        presented: Vec<(Frame, Mat4)>,
        size: Option<(u32, u32)>,
    }

    impl MeshStore for RecordingContext {
        fn upload_mesh(&mut self, _data: &MeshData) -> MeshId {
            self.uploads += 1;
            MeshId(self.uploads - 1)
        }
    }

    impl GraphicsContext for RecordingContext {
        fn resize(&mut self, width: u32, height: u32) {
            self.size = Some((width, height));
        }

        fn present(&mut self, frame: &Frame, projection: Mat4) -> Result<(), RenderError> {
            self.presented.push((frame.clone(), projection));
            Ok(())
        }
    }

    fn recorder(name: &'static str, log: &Log) -> Recorder {
        Recorder {
            name,
            log: log.clone(),
        }
    }

    fn new_scene() -> (Scene<RecordingContext>, Log) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let scene = Scene::new(
            Box::new(RecordingHost(recorder("skyscraper", &log))),
            Box::new(recorder("skybox", &log)),
            Box::new(RecordingHelicopter(recorder("helicopter", &log))),
        );
        (scene, log)
    }

    fn ready_scene() -> (Scene<RecordingContext>, Log) {
        let (mut scene, log) = new_scene();
        scene
            .init(800, 600, || Ok(RecordingContext::default()))
            .unwrap();
        log.borrow_mut().clear();
        (scene, log)
    }

    fn helicopter_reflections(log: &Log) -> usize {
        log.borrow()
            .iter()
            .filter(|e| matches!(e, Event::Reflection { name: "helicopter", .. }))
            .count()
    }

    fn draws_of(log: &Log, name: &str, mode: PassMode) -> Vec<(Mat4, usize)> {
        log.borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Draw {
                    name: n,
                    mode: m,
                    transform,
                    depth,
                } if *n == name && *m == mode => Some((*transform, *depth)),
                _ => None,
            })
            .collect()
    }

    fn light_enables(frame: &Frame) -> Vec<Vec3> {
        frame
            .commands()
            .iter()
            .filter_map(|c| match c {
                FrameCommand::EnableLight { eye_position } => Some(*eye_position),
                _ => None,
            })
            .collect()
    }

    fn camera_matrix(scene: &Scene<RecordingContext>) -> Mat4 {
        let mut stack = TransformStack::new();
        scene.camera().apply(&mut stack);
        stack.current()
    }

    fn approx_mat(a: Mat4, b: Mat4) -> bool {
        a.abs_diff_eq(b, EPS)
    }

    #[test]
    fn init_enters_ready_state() {
        let (mut scene, log) = new_scene();
        assert!(!scene.is_ready());
        scene
            .init(1280, 720, || Ok(RecordingContext::default()))
            .unwrap();

        assert!(scene.is_ready());
        assert_eq!(scene.pose(), WorldPose::initial());
        assert_eq!(scene.projection().viewport(), (1280, 720));
        assert_eq!(
            *log.borrow(),
            vec![
                Event::Init("skyscraper"),
                Event::Init("skybox"),
                Event::Init("helicopter")
            ]
        );
        // Three collaborators plus the light marker.
        assert_eq!(scene.context().map(|c| c.uploads), Some(4));
    }

    #[test]
    fn failed_init_leaves_scene_inert() {
        let (mut scene, log) = new_scene();
        let result = scene.init(800, 600, || Err(InitError::NoAdapter));
        assert!(matches!(result, Err(InitError::NoAdapter)));
        assert!(scene.is_failed());

        scene.activate_throttle(ThrottleStick::ASCEND);
        let before = scene.pose();
        assert!(scene.draw().is_ok());
        assert_eq!(scene.pose(), before);
        assert!(!log
            .borrow()
            .iter()
            .any(|e| matches!(e, Event::Draw { .. } | Event::Init(_))));

        let retry = scene.init(800, 600, || Ok(RecordingContext::default()));
        assert!(matches!(retry, Err(InitError::NoContext)));
        assert!(!scene.is_ready());
    }

    #[test]
    fn draw_before_init_does_nothing() {
        let (mut scene, log) = new_scene();
        assert!(scene.draw().is_ok());
        assert!(log.borrow().is_empty());
        assert!(scene.context().is_none());
    }

    #[test]
    fn teardown_releases_context() {
        let (mut scene, log) = ready_scene();
        scene.draw().unwrap();
        scene.teardown();
        assert!(scene.context().is_none());

        log.borrow_mut().clear();
        assert!(scene.draw().is_ok());
        assert!(log.borrow().is_empty());

        let retry = scene.init(800, 600, || Ok(RecordingContext::default()));
        assert!(matches!(retry, Err(InitError::NoContext)));
    }

    #[test]
    fn zoom_is_clamped() {
        let (mut scene, _log) = ready_scene();
        assert_eq!(scene.projection().fovy_degrees(), 75.0);

        for _ in 0..50 {
            scene.change_look_distance(LookDistance::Closer);
        }
        assert_eq!(scene.projection().fovy_degrees(), 45.0);

        for _ in 0..100 {
            scene.change_look_distance(LookDistance::Further);
        }
        assert_eq!(scene.projection().fovy_degrees(), 90.0);
        scene.change_look_distance(LookDistance::Further);
        assert_eq!(scene.projection().fovy_degrees(), 90.0);
    }

    #[test]
    fn presents_with_current_projection() {
        let (mut scene, _log) = ready_scene();
        scene.change_look_distance(LookDistance::Closer);
        scene.draw().unwrap();
        let context = scene.context().unwrap();
        assert_eq!(context.presented.len(), 1);
        assert_eq!(context.presented[0].1, scene.projection().matrix());
        assert!(context.presented[0].0.clears());
    }

    #[test]
    fn helicopter_reflection_threshold() {
        let (mut scene, log) = ready_scene();

        scene.set_pose(WorldPose::new(Vec3::new(0.0, 0.0, -1.0), 0.0));
        scene.draw().unwrap();
        assert_eq!(helicopter_reflections(&log), 0);

        log.borrow_mut().clear();
        scene.set_pose(WorldPose::new(Vec3::new(0.0, 0.0, -1.0001), 0.0));
        scene.draw().unwrap();
        assert_eq!(helicopter_reflections(&log), 1);
    }

    #[test]
    fn light_position_survives_reflection_pass() {
        for z in [30.0_f32, -12.5, 0.0] {
            let (mut scene, log) = ready_scene();
            scene.set_light_position(Vec3::new(3.0, 40.0, z));
            scene.draw().unwrap();

            assert_eq!(scene.light().position().z.to_bits(), z.to_bits());
            let passed: Vec<Vec3> = log
                .borrow()
                .iter()
                .filter_map(|e| match e {
                    Event::Reflection { light, .. } | Event::ComponentReflection { light, .. } => {
                        Some(*light)
                    }
                    _ => None,
                })
                .collect();
            assert!(!passed.is_empty());
            assert!(passed.iter().all(|p| p.z.to_bits() == z.to_bits()));
        }
    }

    #[test]
    fn light_enabled_mirrored_then_restored() {
        let (mut scene, _log) = ready_scene();
        let position = Vec3::new(2.0, 40.0, 30.0);
        scene.set_light_position(position);
        let pose = WorldPose::new(Vec3::new(-7.0, -3.0, -10.0), 20.0);
        scene.set_pose(pose);
        scene.draw().unwrap();

        let camera = camera_matrix(&scene);
        let mut world = camera;
        world *= Mat4::from_rotation_y(20f32.to_radians()) * Mat4::from_translation(pose.translation);

        let frame = &scene.context().unwrap().presented[0].0;
        let enables = light_enables(frame);
        assert_eq!(enables.len(), 3);
        let yawed = camera * Mat4::from_rotation_y(20f32.to_radians());
        assert!((enables[0] - yawed.transform_point3(position)).length() < EPS);
        assert!((enables[1] - camera.transform_point3(Vec3::new(2.0, 40.0, -30.0))).length() < EPS);
        assert!((enables[2] - world.transform_point3(position)).length() < EPS);
        assert!(scene.light().is_enabled());
    }

    #[test]
    fn transform_stack_is_balanced() {
        let (mut scene, _log) = ready_scene();
        scene.draw().unwrap();
        assert_eq!(scene.transforms().depth(), 0);
        // Pass scope plus the host's own scope.
        assert_eq!(scene.transforms().max_depth(), 2);

        scene.draw().unwrap();
        assert_eq!(scene.transforms().depth(), 0);
    }

    #[test]
    fn opaque_pass_sees_no_pass_leakage() {
        let (mut scene, log) = ready_scene();
        let pose = WorldPose::new(Vec3::new(-4.0, -2.0, -6.0), 35.0);
        scene.set_pose(pose);
        scene.draw().unwrap();

        let camera = camera_matrix(&scene);
        let mut expected = TransformStack::new();
        scene.camera().apply(&mut expected);
        pose.apply_world(&mut expected);

        let skyscraper = draws_of(&log, "skyscraper", PassMode::Direct);
        assert_eq!(skyscraper.len(), 1);
        assert!(approx_mat(skyscraper[0].0, expected.current()));
        assert_eq!(skyscraper[0].1, 0);

        // Skybox: world yaw, but no translation.
        let skybox = draws_of(&log, "skybox", PassMode::Direct);
        let yawed = camera * Mat4::from_rotation_y(35f32.to_radians());
        assert!(approx_mat(skybox[0].0, yawed));

        // Helicopter: back at the camera origin.
        let helicopter = draws_of(&log, "helicopter", PassMode::Direct);
        assert!(approx_mat(helicopter[0].0, camera));
    }

    #[test]
    fn shadow_pass_uses_explicit_placement() {
        let (mut scene, log) = ready_scene();
        let pose = WorldPose::new(Vec3::new(-5.0, -3.0, -8.0), 15.0);
        scene.set_pose(pose);
        scene.draw().unwrap();

        let shadows: Vec<(Placement, Vec3)> = log
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Shadows { placement, light } => Some((*placement, *light)),
                _ => None,
            })
            .collect();
        assert_eq!(shadows, vec![(pose.helicopter_placement(), scene.light().position())]);

        let shadow_draws = draws_of(&log, "helicopter", PassMode::Shadow);
        assert_eq!(shadow_draws.len(), 1);
        assert_eq!(shadow_draws[0].1, 2);
    }

    fn world_matrix(scene: &Scene<RecordingContext>, pose: WorldPose) -> Mat4 {
        camera_matrix(scene)
            * Mat4::from_rotation_y(pose.yaw_degrees.to_radians())
            * Mat4::from_translation(pose.translation)
    }

    #[test]
    fn reflections_get_inverse_placements() {
        let (mut scene, log) = ready_scene();
        let pose = WorldPose::new(Vec3::new(-4.0, -2.0, -6.0), 35.0);
        scene.set_pose(pose);
        scene.draw().unwrap();

        let placements: Vec<Placement> = log
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::ComponentReflection { placement, .. } => Some(*placement),
                _ => None,
            })
            .collect();
        assert_eq!(
            placements,
            vec![pose.skybox_placement(), pose.helicopter_placement()]
        );
        assert_eq!(placements[0].translation, -pose.translation);
        assert_eq!(placements[0].rotation_degrees, Vec3::ZERO);
        assert_eq!(placements[1].translation, -pose.translation);
        assert_eq!(placements[1].rotation_degrees, Vec3::new(0.0, -35.0, 0.0));
    }

    #[test]
    fn reflected_draws_are_mirrored_in_world_space() {
        let (mut scene, log) = ready_scene();
        let pose = WorldPose::new(Vec3::new(-4.0, -2.0, -6.0), 35.0);
        scene.set_pose(pose);
        scene.draw().unwrap();

        let mirrored = world_matrix(&scene, pose) * mirror_z();
        let skyscraper = draws_of(&log, "skyscraper", PassMode::Reflected);
        assert!(approx_mat(skyscraper[0].0, world_matrix(&scene, pose)));

        let skybox = draws_of(&log, "skybox", PassMode::Reflected);
        assert_eq!(skybox.len(), 1);
        let expected = mirrored * Mat4::from_translation(-pose.translation);
        assert!(approx_mat(skybox[0].0, expected));

        let helicopter = draws_of(&log, "helicopter", PassMode::Reflected);
        assert_eq!(helicopter.len(), 1);
        let expected = mirrored
            * Mat4::from_translation(-pose.translation)
            * Mat4::from_rotation_y((-35f32).to_radians());
        assert!(approx_mat(helicopter[0].0, expected));
    }

    #[test]
    fn light_marker_sits_at_light_in_world_space() {
        let (mut scene, _log) = ready_scene();
        let light = Vec3::new(5.0, 40.0, 30.0);
        let pose = WorldPose::new(Vec3::new(-7.0, -3.0, -10.0), 20.0);
        scene.set_light_position(light);
        scene.set_light_source_drawing(true);
        scene.set_pose(pose);
        scene.draw().unwrap();

        let frame = &scene.context().unwrap().presented[0].0;
        let markers: Vec<Mat4> = frame
            .draws()
            .filter(|d| d.material == Material::Unlit)
            .map(|d| d.model_view)
            .collect();
        assert_eq!(markers.len(), 1);

        let expected = world_matrix(&scene, pose) * Mat4::from_translation(light);
        let centre = markers[0].transform_point3(Vec3::ZERO);
        assert!((centre - expected.transform_point3(Vec3::ZERO)).length() < EPS);
        // Marker is a small cube, not a world-sized one.
        let edge = markers[0].transform_vector3(Vec3::X).length();
        assert!(edge > 0.0 && edge < 1.0);
    }

    #[test]
    fn passes_run_in_order() {
        let (mut scene, log) = ready_scene();
        scene.draw().unwrap();

        let sequence: Vec<String> = log
            .borrow()
            .iter()
            .map(|e| match e {
                Event::Draw { name, mode, .. } => format!("draw {name} {mode:?}"),
                Event::Reflection { name, .. } => format!("reflect {name}"),
                Event::ComponentReflection { .. } => "component reflection".to_string(),
                Event::Shadows { .. } => "shadows".to_string(),
                Event::Advance => "advance".to_string(),
                Event::Init(name) => format!("init {name}"),
                Event::Sticks(_) => "sticks".to_string(),
            })
            .collect();
        assert_eq!(
            sequence,
            vec![
                "advance",
                "reflect skyscraper",
                "draw skyscraper Reflected",
                "component reflection",
                "reflect skybox",
                "draw skybox Reflected",
                "component reflection",
                "reflect helicopter",
                "draw helicopter Reflected",
                "draw skyscraper Direct",
                "draw skybox Direct",
                "draw helicopter Direct",
                "shadows",
                "draw helicopter Shadow",
            ]
        );

        let frame = &scene.context().unwrap().presented[0].0;
        assert_eq!(frame.commands()[0], FrameCommand::Clear);
        assert!(matches!(frame.commands()[1], FrameCommand::EnableLight { .. }));
    }

    #[test]
    fn light_marker_follows_toggle() {
        let (mut scene, _log) = ready_scene();
        scene.draw().unwrap();
        scene.handle_event(StickEvent::ToggleLightSource);
        assert!(scene.is_drawing_light_source());
        scene.draw().unwrap();

        let presented = &scene.context().unwrap().presented;
        let unlit = |frame: &Frame| frame.draws().filter(|d| d.material == Material::Unlit).count();
        assert_eq!(unlit(&presented[0].0), 0);
        assert_eq!(unlit(&presented[1].0), 1);
    }

    #[test]
    fn sticks_move_world_and_reach_helicopter() {
        let (mut scene, log) = ready_scene();
        scene.handle_event(StickEvent::ActivateThrottle(ThrottleStick::ASCEND));
        scene.handle_event(StickEvent::ActivateDirection(DirectionStick::FORWARD));

        let forwarded: Vec<StickState> = log
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Sticks(s) => Some(*s),
                _ => None,
            })
            .collect();
        assert_eq!(forwarded.len(), 2);
        assert_eq!(forwarded[1].throttle, ThrottleStick::ASCEND);
        assert_eq!(forwarded[1].direction, DirectionStick::FORWARD);

        scene.draw().unwrap();
        let pose = scene.pose();
        assert!((pose.translation.y - -3.2).abs() < EPS);
        assert!((pose.translation.z - -9.8).abs() < EPS);

        scene.handle_event(StickEvent::DeactivateThrottle(ThrottleStick::ASCEND));
        scene.handle_event(StickEvent::DeactivateDirection(DirectionStick::FORWARD));
        assert!(scene.sticks().is_idle());
        scene.draw().unwrap();
        assert_eq!(scene.pose(), pose);
    }

    #[test]
    fn resize_updates_projection_and_context() {
        let (mut scene, _log) = ready_scene();
        scene.resize(1920, 1080);
        assert_eq!(scene.projection().viewport(), (1920, 1080));
        assert!((scene.projection().aspect() - 1920.0 / 1080.0).abs() < EPS);
        assert_eq!(scene.context().and_then(|c| c.size), Some((1920, 1080)));
    }

    #[test]
    fn camera_setters_change_view() {
        let (mut scene, log) = ready_scene();
        scene.set_eye_x(4.0);
        scene.set_center_y(1.0);
        scene.set_pose(WorldPose::default());
        scene.draw().unwrap();

        let mut expected = TransformStack::new();
        expected.translate(Vec3::new(0.0, 0.0, -5.0));
        expected.look_at(Vec3::new(4.0, 1.5, 6.0), Vec3::new(0.0, 1.0, 0.0), Vec3::Y);
        let helicopter = draws_of(&log, "helicopter", PassMode::Direct);
        assert!(approx_mat(helicopter[0].0, expected.current()));
    }
}
