//! Drawing contract between the simulation and whatever displays it.
//!
//! The simulation never owns a window or a GPU context. Each frame it issues a
//! short sequence of calls against a [`Renderer`]: pick a color, open a
//! transform scope, draw a primitive, close the scope. [`CommandRecorder`] is
//! a headless implementation that simply records those calls.

use crate::math::{Quat, Vec3};

/// RGB color with components in `[0, 1]`.
pub type Color = Vec3;

/// Primitive drawing and transform-stack operations.
pub trait Renderer {
    /// Sets the color for subsequent primitives
    fn set_color(&mut self, color: Color);

    /// Saves the current transform
    fn push_transform(&mut self);

    /// Restores the transform saved by the matching [`Renderer::push_transform`]
    fn pop_transform(&mut self);

    /// Post-multiplies a translation onto the current transform
    fn translate(&mut self, offset: Vec3);

    /// Post-multiplies a rotation onto the current transform
    fn rotate(&mut self, rotation: Quat);

    /// Draws a sphere, shaded if `surface` is set and wireframe otherwise
    fn draw_sphere(&mut self, center: Vec3, radius: f32, surface: bool);

    /// Draws an axis-aligned box spanning `min..max`
    fn draw_box(&mut self, min: Vec3, max: Vec3, surface: bool);

    /// Draws an arrow from `origin` along `direction`
    fn draw_arrow(&mut self, origin: Vec3, direction: Vec3, thickness: f32);
}

/// Runs `draw` inside a pushed transform placed at `position` / `rotation`.
///
/// The scope is always popped, so the caller's transform is left untouched.
pub fn with_transform<R, F>(renderer: &mut R, position: Vec3, rotation: Quat, draw: F)
where
    R: Renderer + ?Sized,
    F: FnOnce(&mut R),
{
    renderer.push_transform();
    renderer.translate(position);
    renderer.rotate(rotation);
    draw(&mut *renderer);
    renderer.pop_transform();
}

/// Toggles for how bodies are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawOptions {
    /// Shaded surfaces instead of wireframes
    pub surface: bool,
    /// Angular velocity / angular momentum debug arrows
    pub arrows: bool,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            surface: true,
            arrows: false,
        }
    }
}

/// One recorded [`Renderer`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    SetColor(Color),
    PushTransform,
    PopTransform,
    Translate(Vec3),
    Rotate(Quat),
    Sphere {
        center: Vec3,
        radius: f32,
        surface: bool,
    },
    Box {
        min: Vec3,
        max: Vec3,
        surface: bool,
    },
    Arrow {
        origin: Vec3,
        direction: Vec3,
        thickness: f32,
    },
}

/// Headless renderer that keeps every call in order.
#[derive(Debug, Default, Clone)]
pub struct CommandRecorder {
    commands: Vec<DrawCommand>,
    depth: usize,
    max_depth: usize,
}

impl CommandRecorder {
    /// Creates an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded commands in call order
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Current transform stack depth (0 when every push was popped)
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Deepest transform nesting seen so far
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Forgets recorded commands, e.g. between frames
    pub fn clear(&mut self) {
        self.commands.clear();
        self.depth = 0;
        self.max_depth = 0;
    }
}

impl Renderer for CommandRecorder {
    fn set_color(&mut self, color: Color) {
        self.commands.push(DrawCommand::SetColor(color));
    }

    fn push_transform(&mut self) {
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
        self.commands.push(DrawCommand::PushTransform);
    }

    fn pop_transform(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.commands.push(DrawCommand::PopTransform);
    }

    fn translate(&mut self, offset: Vec3) {
        self.commands.push(DrawCommand::Translate(offset));
    }

    fn rotate(&mut self, rotation: Quat) {
        self.commands.push(DrawCommand::Rotate(rotation));
    }

    fn draw_sphere(&mut self, center: Vec3, radius: f32, surface: bool) {
        self.commands.push(DrawCommand::Sphere {
            center,
            radius,
            surface,
        });
    }

    fn draw_box(&mut self, min: Vec3, max: Vec3, surface: bool) {
        self.commands.push(DrawCommand::Box { min, max, surface });
    }

    fn draw_arrow(&mut self, origin: Vec3, direction: Vec3, thickness: f32) {
        self.commands.push(DrawCommand::Arrow {
            origin,
            direction,
            thickness,
        });
    }
}
