//! Scene composition: simulation state to draw calls

use glam::DVec2;

use super::{Color, Renderer, Sprite, colors};
use crate::sim::{ResponsiveLattice, Scene, SimState, Soccer, Wanderer};

const POINT_RADIUS: f64 = 5.0;
const GRID_LINE_WIDTH: f64 = 1.0;
const FIELD_LINE_WIDTH: f64 = 5.0;
const PLAYER_RADIUS: f64 = 10.0;
const TRAIL_WIDTH: f64 = 5.0;

/// Presentation options that do not affect the simulation
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawStyle {
    /// Connect lattice points to their left and above neighbours
    pub draw_lines: bool,
}

/// Draw the current frame; `sources` are the positions fed to the last tick
pub fn draw_scene(state: &SimState, sources: &[DVec2], style: DrawStyle, out: &mut dyn Renderer) {
    out.clear(colors::BACKGROUND);
    match &state.scene {
        Scene::Grid(lattice) => draw_grid(lattice, sources, style, out),
        Scene::Soccer(soccer) => draw_soccer(soccer, sources, out),
        Scene::Particles { wanderers, .. } => draw_wanderers(wanderers, out),
    }
}

fn draw_grid(lattice: &ResponsiveLattice, sources: &[DVec2], style: DrawStyle, out: &mut dyn Renderer) {
    for &source in sources {
        out.circle(source, POINT_RADIUS, colors::POINTER);
    }
    for point in lattice.points() {
        out.circle(point.displaced, POINT_RADIUS, colors::LATTICE);
    }
    if style.draw_lines {
        for target in lattice.render_targets() {
            if let Some(left) = target.left {
                out.line(target.point, left, GRID_LINE_WIDTH, colors::LATTICE);
            }
            if let Some(above) = target.above {
                out.line(target.point, above, GRID_LINE_WIDTH, colors::LATTICE);
            }
        }
    }
}

fn draw_soccer(soccer: &Soccer, players: &[DVec2], out: &mut dyn Renderer) {
    let ball = &soccer.ball;
    let field = ball.bounds;
    let center = field.center();

    out.ring(center, field.height() / 6.0, FIELD_LINE_WIDTH, colors::FIELD_LINE);
    out.line(
        DVec2::new(center.x, field.bottom),
        DVec2::new(center.x, field.top),
        FIELD_LINE_WIDTH,
        colors::FIELD_LINE,
    );

    for &player in players {
        out.circle(player, PLAYER_RADIUS, colors::PLAYER);
    }

    // Spin is accumulated in whole-degree steps for the sprite
    out.sprite(Sprite::Ball, ball.position, 2.0 * ball.radius, ball.spin_angle.trunc());
}

fn draw_wanderers(wanderers: &[Wanderer], out: &mut dyn Renderer) {
    for w in wanderers {
        let color = Color::from_hsv(w.hue, 1.0, 1.0);
        out.line(w.previous, w.position, TRAIL_WIDTH, color);
        out.circle(w.position, POINT_RADIUS, color);
    }
}
