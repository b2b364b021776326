//! Keyboard input mapped onto the helicopter's throttle and direction sticks.

pub mod sticks;

pub use sticks::*;

use std::collections::HashSet;

/// What a bound key does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Binding {
    Throttle(ThrottleStick),
    Direction(DirectionStick),
    Zoom(LookDistance),
    ToggleLightSource,
    Quit,
}

fn binding_for(key: KeyCode) -> Option<Binding> {
    let binding = match key {
        KeyCode::KeyW => Binding::Direction(DirectionStick::FORWARD),
        KeyCode::KeyS => Binding::Direction(DirectionStick::BACKWARD),
        KeyCode::KeyA => Binding::Direction(DirectionStick::LEFT),
        KeyCode::KeyD => Binding::Direction(DirectionStick::RIGHT),
        KeyCode::ArrowUp => Binding::Throttle(ThrottleStick::ASCEND),
        KeyCode::ArrowDown => Binding::Throttle(ThrottleStick::DESCEND),
        KeyCode::ArrowLeft => Binding::Throttle(ThrottleStick::LEFT),
        KeyCode::ArrowRight => Binding::Throttle(ThrottleStick::RIGHT),
        KeyCode::PageUp | KeyCode::Equal | KeyCode::NumpadAdd => {
            Binding::Zoom(LookDistance::Closer)
        }
        KeyCode::PageDown | KeyCode::Minus | KeyCode::NumpadSubtract => {
            Binding::Zoom(LookDistance::Further)
        }
        KeyCode::KeyL => Binding::ToggleLightSource,
        KeyCode::Escape => Binding::Quit,
        _ => return None,
    };
    Some(binding)
}

/// Turns raw key transitions into stick events.
///
/// Stick keys only report their first press and their release, so OS key repeat never
/// produces duplicate activations. Zoom keys report every press, repeats included.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a keyboard event, returning the stick event it produces, if any.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) -> Option<StickEvent> {
        let binding = binding_for(key)?;
        match state {
            ElementState::Pressed => {
                let first_press = self.keys_held.insert(key);
                match binding {
                    Binding::Zoom(distance) => Some(StickEvent::ChangeLookDistance(distance)),
                    _ if !first_press => None,
                    Binding::Throttle(flags) => Some(StickEvent::ActivateThrottle(flags)),
                    Binding::Direction(flags) => Some(StickEvent::ActivateDirection(flags)),
                    Binding::ToggleLightSource => Some(StickEvent::ToggleLightSource),
                    Binding::Quit => Some(StickEvent::Quit),
                }
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
                match binding {
                    Binding::Throttle(flags) => Some(StickEvent::DeactivateThrottle(flags)),
                    Binding::Direction(flags) => Some(StickEvent::DeactivateDirection(flags)),
                    _ => None,
                }
            }
        }
    }

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Release everything held, e.g. when the window loses focus. Returns the deactivations
    /// the scene must apply so no stick stays stuck on.
    pub fn release_all(&mut self) -> Vec<StickEvent> {
        let events: Vec<StickEvent> = self
            .keys_held
            .drain()
            .filter_map(|key| match binding_for(key) {
                Some(Binding::Throttle(flags)) => Some(StickEvent::DeactivateThrottle(flags)),
                Some(Binding::Direction(flags)) => Some(StickEvent::DeactivateDirection(flags)),
                _ => None,
            })
            .collect();
        if !events.is_empty() {
            log::debug!("Released {} held stick keys", events.len());
        }
        events
    }
}

// Re-export for convenience
pub use winit::event::ElementState;
pub use winit::keyboard::KeyCode;
