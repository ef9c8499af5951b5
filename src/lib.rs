//! Floor Physics - position-driven simulations for projected floor games
//!
//! Core modules:
//! - `sim`: Deterministic simulation (force field, lattice, ball, collisions)
//! - `source`: Position providers (pointer, lidar feed, simulated walkers)
//! - `renderer`: Draw-call seam and scene composition
//! - `settings`: Configuration loaded from JSON

pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod source;

pub use error::{ConfigError, FeedError, LatticeError};
pub use settings::{ScreenConfig, Settings};

use glam::DVec2;

/// Simulation configuration constants
pub mod consts {
    /// Render resolution
    pub const SCREEN_WIDTH: f64 = 1920.0;
    pub const SCREEN_HEIGHT: f64 = 1080.0;

    /// Grid defaults (5 * 9 rows by 5 * 16 columns keeps cells square at 16:9)
    pub const GRID_ROWS: usize = 5 * 9;
    pub const GRID_COLUMNS: usize = 5 * 16;
    /// Scale applied to the accumulated field direction
    pub const FIELD_GAIN: f64 = 100.0;
    /// Distances below this are clamped before taking the reciprocal
    pub const MIN_DISTANCE: f64 = 1e-9;

    /// Ball defaults
    pub const BALL_RADIUS: f64 = 75.0;
    pub const BALL_MAX_SPEED: f64 = 10.0;
    /// Extra reach beyond the ball radius at which a player counts as touching it
    pub const COLLISION_MARGIN: f64 = 25.0;
    /// Spin decay per tick (translation is undamped)
    pub const SPIN_DAMPING: f64 = 0.99;
    pub const INITIAL_SPIN_VELOCITY: f64 = 0.1;
    /// Kicks assign a spin in [-SPIN_IMPULSE, SPIN_IMPULSE)
    pub const SPIN_IMPULSE: f64 = 10.0;
    /// Fixed vertical speed after touching the top or bottom edge
    pub const VERTICAL_BOUNCE_SPEED: f64 = 1.0;

    /// Tick rates
    pub const GRID_TICK_HZ: u32 = 60;
    pub const SOCCER_TICK_HZ: u32 = 120;
    pub const PARTICLES_TICK_HZ: u32 = 60;
    /// Walker producer period in milliseconds
    pub const WALKER_PERIOD_MS: u64 = 25;

    /// Real-world size of the projected field in metres
    pub const FIELD_SIZE_M: (f64, f64) = (3.0, 2.0);
    pub const NUM_PEOPLE: usize = 2;
    pub const NUM_WANDERERS: usize = 100;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f64) -> f64 {
    use std::f64::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f64, theta: f64) -> DVec2 {
    DVec2::new(r * theta.cos(), r * theta.sin())
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: DVec2, b: DVec2) -> f64 {
    (a - b).length()
}

/// Angle of the vector from `from` to `to`
#[inline]
pub fn angle_to(from: DVec2, to: DVec2) -> f64 {
    let diff = to - from;
    diff.y.atan2(diff.x)
}

/// Clamp `value` into `[lower, upper]`
///
/// Unlike `f64::clamp` this never panics on inverted bounds; `lower` wins.
#[inline]
pub fn constrain(value: f64, lower: f64, upper: f64) -> f64 {
    if value < lower {
        lower
    } else if value > upper {
        upper
    } else {
        value
    }
}
