//! The per-frame draw list.
//!
//! Passes and collaborators never talk to the GPU directly. They append commands to a
//! [`Frame`] in the order the scene issues them, and the graphics context replays that list.
//! Keeping the list on the CPU is what makes the pass ordering observable in tests.

use glam::{Mat4, Vec3};

/// Handle to a mesh uploaded through a [`crate::MeshStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub u32);

/// How a surface is shaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Material {
    /// Diffuse-lit by the active light.
    Lit,
    /// Backdrop seen from inside; unlit and never culled.
    Sky,
    /// Flat colour, ignores the light (markers).
    Unlit,
    /// Translucent reflective surface blended over what is behind it.
    Glass,
}

/// Which pass a draw belongs to. Set on the frame by whoever owns the pass, so a
/// collaborator's ordinary `draw` can be replayed mirrored or flattened into a shadow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PassMode {
    #[default]
    Direct,
    /// Drawn through a mirror matrix; triangle winding is reversed.
    Reflected,
    /// Flattened onto a receiving plane and darkened.
    Shadow,
}

/// One mesh instance with its fully composed model-view matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub mesh: MeshId,
    pub material: Material,
    pub mode: PassMode,
    pub model_view: Mat4,
    pub color: [f32; 4],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameCommand {
    /// Clear colour, depth and stencil.
    Clear,
    /// Switch the light on at an eye-space position. Applies to every later draw.
    EnableLight { eye_position: Vec3 },
    DisableLight,
    Draw(DrawCall),
}

/// A draw call paired with the light state in effect when it was recorded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedDraw {
    pub call: DrawCall,
    pub light: Option<Vec3>,
}

/// Ordered list of commands for one frame.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    commands: Vec<FrameCommand>,
    mode: PassMode,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.push(FrameCommand::Clear);
    }

    pub fn enable_light(&mut self, eye_position: Vec3) {
        self.commands.push(FrameCommand::EnableLight { eye_position });
    }

    pub fn disable_light(&mut self) {
        self.commands.push(FrameCommand::DisableLight);
    }

    /// Record a draw in the frame's current pass mode.
    pub fn draw(&mut self, mesh: MeshId, material: Material, model_view: Mat4, color: [f32; 4]) {
        self.commands.push(FrameCommand::Draw(DrawCall {
            mesh,
            material,
            mode: self.mode,
            model_view,
            color,
        }));
    }

    /// The pass mode new draws are tagged with.
    pub fn mode(&self) -> PassMode {
        self.mode
    }

    /// Run `f` with draws tagged as `mode`, restoring the previous mode afterwards.
    pub fn with_mode<R>(&mut self, mode: PassMode, f: impl FnOnce(&mut Frame) -> R) -> R {
        let previous = std::mem::replace(&mut self.mode, mode);
        let result = f(self);
        self.mode = previous;
        result
    }

    pub fn commands(&self) -> &[FrameCommand] {
        &self.commands
    }

    /// True if the frame starts by clearing its targets.
    pub fn clears(&self) -> bool {
        matches!(self.commands.first(), Some(FrameCommand::Clear))
    }

    pub fn draws(&self) -> impl Iterator<Item = &DrawCall> {
        self.commands.iter().filter_map(|command| match command {
            FrameCommand::Draw(call) => Some(call),
            _ => None,
        })
    }

    /// Pair every draw with the light active at that point in the list.
    pub fn resolved_draws(&self) -> Vec<ResolvedDraw> {
        let mut light = None;
        let mut resolved = Vec::new();
        for command in &self.commands {
            match *command {
                FrameCommand::Clear => {}
                FrameCommand::EnableLight { eye_position } => light = Some(eye_position),
                FrameCommand::DisableLight => light = None,
                FrameCommand::Draw(call) => resolved.push(ResolvedDraw { call, light }),
            }
        }
        resolved
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
