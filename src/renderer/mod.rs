//! Rendering seam
//!
//! The simulation never draws. Scenes are turned into draw calls against the
//! [`Renderer`] trait; a window backend implements it, and [`FrameRecorder`]
//! captures the calls for headless runs and tests.

pub mod scene;

pub use scene::{DrawStyle, draw_scene};

use glam::DVec2;

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from hue in degrees (wrapped) and saturation/value in [0, 1]
    pub fn from_hsv(hue: f64, saturation: f64, value: f64) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let s = saturation.clamp(0.0, 1.0);
        let v = value.clamp(0.0, 1.0);
        let c = v * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let m = v - c;
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let to_u8 = |f: f64| ((f + m) * 255.0).round() as u8;
        Self::rgb(to_u8(r), to_u8(g), to_u8(b))
    }
}

/// Colors for scene elements
pub mod colors {
    use super::Color;

    pub const BACKGROUND: Color = Color::rgb(0, 0, 0);
    pub const LATTICE: Color = Color::rgb(255, 255, 255);
    pub const POINTER: Color = Color::rgb(100, 100, 100);
    pub const FIELD_LINE: Color = Color::rgb(255, 255, 255);
    pub const PLAYER: Color = Color::rgb(0, 0, 255);
}

/// Images a renderer is expected to provide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sprite {
    /// The gear image used for the ball
    Ball,
}

/// Draw-call sink
pub trait Renderer {
    fn clear(&mut self, color: Color);
    fn circle(&mut self, center: DVec2, radius: f64, color: Color);
    fn line(&mut self, from: DVec2, to: DVec2, width: f64, color: Color);
    /// Draw `sprite` scaled to `size` and rotated counter-clockwise by `rotation_degrees`
    fn sprite(&mut self, sprite: Sprite, center: DVec2, size: f64, rotation_degrees: f64);
    /// Outline-only circle; renderers without outlines may fall back to a filled one
    fn ring(&mut self, center: DVec2, radius: f64, width: f64, color: Color) {
        let _ = width;
        self.circle(center, radius, color);
    }
}

/// A recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Circle {
        center: DVec2,
        radius: f64,
        color: Color,
    },
    Ring {
        center: DVec2,
        radius: f64,
        width: f64,
        color: Color,
    },
    Line {
        from: DVec2,
        to: DVec2,
        width: f64,
        color: Color,
    },
    Sprite {
        sprite: Sprite,
        center: DVec2,
        size: f64,
        rotation_degrees: f64,
    },
}

/// Records draw calls for one frame
#[derive(Debug, Clone, Default)]
pub struct FrameRecorder {
    pub commands: Vec<DrawCommand>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the previous frame's commands
    pub fn begin_frame(&mut self) {
        self.commands.clear();
    }

    pub fn circles(&self) -> usize {
        self.count(|c| matches!(c, DrawCommand::Circle { .. }))
    }

    pub fn lines(&self) -> usize {
        self.count(|c| matches!(c, DrawCommand::Line { .. }))
    }

    pub fn sprites(&self) -> usize {
        self.count(|c| matches!(c, DrawCommand::Sprite { .. }))
    }

    fn count(&self, f: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| f(*c)).count()
    }
}

impl Renderer for FrameRecorder {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn circle(&mut self, center: DVec2, radius: f64, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn ring(&mut self, center: DVec2, radius: f64, width: f64, color: Color) {
        self.commands.push(DrawCommand::Ring {
            center,
            radius,
            width,
            color,
        });
    }

    fn line(&mut self, from: DVec2, to: DVec2, width: f64, color: Color) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn sprite(&mut self, sprite: Sprite, center: DVec2, size: f64, rotation_degrees: f64) {
        self.commands.push(DrawCommand::Sprite {
            sprite,
            center,
            size,
            rotation_degrees,
        });
    }
}
