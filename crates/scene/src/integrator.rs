//! Turns held stick flags into per-frame motion of the world pose.

use engine_core::WorldPose;
use input::{DirectionStick, StickState, ThrottleStick};

/// Distance moved per frame along any held direction.
pub const TRANSLATE_STEP: f32 = 0.2;
/// Heading change per frame while a throttle turn is held, in degrees.
pub const YAW_STEP_DEGREES: f32 = 1.0;

/// Holds the stick flags and applies a fixed delta per held flag once per frame.
///
/// Every held flag contributes independently, so combinations such as ascend + forward or
/// forward + right add up within the same frame. Nothing is clamped.
#[derive(Debug, Clone, Copy, Default)]
pub struct StickIntegrator {
    sticks: StickState,
}

impl StickIntegrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sticks(&self) -> StickState {
        self.sticks
    }

    pub fn activate_throttle(&mut self, flags: ThrottleStick) {
        self.sticks.activate_throttle(flags);
    }

    pub fn deactivate_throttle(&mut self, flags: ThrottleStick) {
        self.sticks.deactivate_throttle(flags);
    }

    pub fn activate_direction(&mut self, flags: DirectionStick) {
        self.sticks.activate_direction(flags);
    }

    pub fn deactivate_direction(&mut self, flags: DirectionStick) {
        self.sticks.deactivate_direction(flags);
    }

    /// Advance `pose` by one frame.
    pub fn integrate(&self, pose: &mut WorldPose) {
        self.integrate_throttle(pose);
        self.integrate_direction(pose);
    }

    fn integrate_throttle(&self, pose: &mut WorldPose) {
        let throttle = self.sticks.throttle;
        if throttle.contains(ThrottleStick::ASCEND) {
            pose.translation.y -= TRANSLATE_STEP;
        }
        if throttle.contains(ThrottleStick::DESCEND) {
            pose.translation.y += TRANSLATE_STEP;
        }
        if throttle.contains(ThrottleStick::RIGHT) {
            pose.yaw_degrees += YAW_STEP_DEGREES;
        }
        if throttle.contains(ThrottleStick::LEFT) {
            pose.yaw_degrees -= YAW_STEP_DEGREES;
        }
    }

    // Uses the heading as updated by the throttle this frame.
    fn integrate_direction(&self, pose: &mut WorldPose) {
        let direction = self.sticks.direction;
        if direction.is_empty() {
            return;
        }
        let (sin, cos) = pose.yaw_radians().sin_cos();
        let forward = (-sin * TRANSLATE_STEP, cos * TRANSLATE_STEP);
        let right = (-cos * TRANSLATE_STEP, -sin * TRANSLATE_STEP);

        if direction.contains(DirectionStick::FORWARD) {
            pose.translation.x += forward.0;
            pose.translation.z += forward.1;
        }
        if direction.contains(DirectionStick::BACKWARD) {
            pose.translation.x -= forward.0;
            pose.translation.z -= forward.1;
        }
        if direction.contains(DirectionStick::RIGHT) {
            pose.translation.x += right.0;
            pose.translation.z += right.1;
        }
        if direction.contains(DirectionStick::LEFT) {
            pose.translation.x -= right.0;
            pose.translation.z -= right.1;
        }
    }
}
