//! Heliflight - first-person helicopter flight over a mirrored skyline

mod config;
mod helicopter;
mod skybox;
mod skyscraper;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use engine_core::Time;
use input::{InputState, StickEvent};
use renderer::Renderer;
use scene::Scene;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use config::FlightConfig;
use helicopter::Helicopter;
use skybox::SkyBox;
use skyscraper::Skyscraper;

/// Everything that lives as long as the window.
struct FlightState {
    window: Arc<Window>,
    scene: Scene<Renderer>,
    input: InputState,
    time: Time,
}

impl FlightState {
    fn new(window: Arc<Window>, config: &FlightConfig) -> Self {
        let mut scene: Scene<Renderer> = Scene::new(
            Box::new(Skyscraper::new()),
            Box::new(SkyBox::new()),
            Box::new(Helicopter::new()),
        );
        scene.set_camera(config.camera.pose());
        scene.set_light_position(config.light_position());
        scene.set_light_source_drawing(config.show_light_source);

        let size = window.inner_size();
        let vsync = config.vsync;
        let surface_window = window.clone();
        let connected = scene.init(size.width, size.height, move || {
            let mut renderer = pollster::block_on(Renderer::new(surface_window, vsync))?;
            let [r, g, b, a] = SkyBox::color();
            renderer.set_clear_color(wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: a as f64,
            });
            log::debug!("Surface configured at {:?}", renderer.dimensions());
            Ok(renderer)
        });
        if connected.is_err() {
            log::warn!("Running without a graphics context; close the window to exit");
        }

        Self {
            window,
            scene,
            input: InputState::new(),
            time: Time::with_rate(config.frame_rate),
        }
    }

    /// Handle a window event. Returns true if the app should exit.
    fn handle_window_event(&mut self, event: WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => {
                self.scene.teardown();
                true
            }
            WindowEvent::Resized(size) => {
                self.scene.resize(size.width, size.height);
                false
            }
            WindowEvent::Focused(false) => {
                for event in self.input.release_all() {
                    self.scene.handle_event(event);
                }
                false
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(key) = event.physical_key else {
                    return false;
                };
                match self.input.process_keyboard(key, event.state) {
                    Some(StickEvent::Quit) => {
                        self.scene.teardown();
                        true
                    }
                    Some(stick_event) => {
                        self.scene.handle_event(stick_event);
                        false
                    }
                    None => false,
                }
            }
            WindowEvent::RedrawRequested => {
                if !self.time.take_due_frame() {
                    return false;
                }
                if let Err(e) = self.scene.draw() {
                    log::error!("Render error: {}", e);
                    self.scene.teardown();
                    return true;
                }
                false
            }
            _ => false,
        }
    }

    /// Request a redraw when the next fixed frame is due, otherwise sleep until it is.
    fn pace(&mut self, event_loop: &ActiveEventLoop) {
        self.time.update();
        if self.time.schedule_frame() {
            self.window.request_redraw();
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(
            Instant::now() + self.time.until_next_frame(),
        ));
        if self.time.frame_count() % 600 == 1 {
            log::trace!("{:.1} fps", self.time.fps());
        }
    }
}

/// Application handler for winit.
struct App {
    config: FlightConfig,
    state: Option<FlightState>,
}

impl App {
    fn new(config: FlightConfig) -> Self {
        Self { config, state: None }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_none() {
            let window_attrs = Window::default_attributes()
                .with_title("Heliflight")
                .with_inner_size(winit::dpi::LogicalSize::new(
                    self.config.window_width,
                    self.config.window_height,
                ));

            let window = match event_loop.create_window(window_attrs) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            self.state = Some(FlightState::new(window, &self.config));
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(state) = &mut self.state {
            if state.handle_window_event(event) {
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(state) = &mut self.state {
            state.pace(event_loop);
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║                           Heliflight                             ║");
    println!("╠══════════════════════════════════════════════════════════════════╣");
    println!("║  CONTROLS:                                                       ║");
    println!("║    W / S      - Forward / back │  A / D      - Strafe left/right ║");
    println!("║    Up / Down  - Ascend/descend │  Left/Right - Turn              ║");
    println!("║    PgUp / =   - Zoom in        │  PgDn / -   - Zoom out          ║");
    println!("║    L          - Show light     │  Escape     - Quit              ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");

    let config = FlightConfig::load();
    log::info!(
        "Starting Heliflight at {}x{}, {} Hz",
        config.window_width,
        config.window_height,
        config.frame_rate
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
