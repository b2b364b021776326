//! Stick flag sets and the commands the input layer emits.

use bitflags::bitflags;

bitflags! {
    /// Held directions on the throttle stick. Ascend/descend move vertically; left/right yaw.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ThrottleStick: u8 {
        const ASCEND = 1 << 0;
        const DESCEND = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
    }
}

bitflags! {
    /// Held directions on the direction stick, relative to the current heading.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DirectionStick: u8 {
        const FORWARD = 1 << 0;
        const BACKWARD = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
    }
}

/// Zoom request: widen or narrow the field of view by one degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookDistance {
    Further,
    Closer,
}

/// A discrete change reported by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StickEvent {
    ActivateThrottle(ThrottleStick),
    DeactivateThrottle(ThrottleStick),
    ActivateDirection(DirectionStick),
    DeactivateDirection(DirectionStick),
    ChangeLookDistance(LookDistance),
    ToggleLightSource,
    Quit,
}

/// Both sticks' held flags. Activation is per flag, so diagonal motion composes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StickState {
    pub throttle: ThrottleStick,
    pub direction: DirectionStick,
}

impl StickState {
    pub fn activate_throttle(&mut self, flags: ThrottleStick) {
        self.throttle.insert(flags);
    }

    pub fn deactivate_throttle(&mut self, flags: ThrottleStick) {
        self.throttle.remove(flags);
    }

    pub fn activate_direction(&mut self, flags: DirectionStick) {
        self.direction.insert(flags);
    }

    pub fn deactivate_direction(&mut self, flags: DirectionStick) {
        self.direction.remove(flags);
    }

    /// True when nothing is held on either stick.
    pub fn is_idle(&self) -> bool {
        self.throttle.is_empty() && self.direction.is_empty()
    }
}
