//! Wandering particles
//!
//! Each wanderer walks at constant speed with a jittering heading and turns
//! around at the screen edges, leaving a short colored segment every tick.

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

use crate::polar_to_cartesian;

/// Maximum heading change per tick is half of this
const HEADING_JITTER: f64 = 1.0;
/// Hue drift per tick is below this
const HUE_DRIFT: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wanderer {
    pub position: DVec2,
    /// Position before the last step, for drawing the trail segment
    pub previous: DVec2,
    pub speed: f64,
    pub heading: f64,
    /// Hue in degrees, unbounded (render with `% 360`)
    pub hue: f64,
}

impl Wanderer {
    pub fn new<R: Rng + ?Sized>(start: DVec2, speed: f64, rng: &mut R) -> Self {
        Self {
            position: start,
            previous: start,
            speed,
            hue: rng.random::<f64>() * 360.0,
            heading: rng.random::<f64>() * TAU,
        }
    }

    /// Take one step inside the `size` screen
    pub fn step<R: Rng + ?Sized>(&mut self, size: DVec2, rng: &mut R) {
        self.heading += (rng.random::<f64>() - 0.5) * HEADING_JITTER;
        self.previous = self.position;
        self.position += polar_to_cartesian(self.speed, self.heading);

        if self.position.x > size.x {
            self.position.x = size.x;
            self.heading -= PI;
        } else if self.position.x < 0.0 {
            self.position.x = 0.0;
            self.heading += PI;
        }

        if self.position.y > size.y {
            self.position.y = size.y;
            self.heading -= PI;
        } else if self.position.y < 0.0 {
            self.position.y = 0.0;
            self.heading += PI;
        }

        self.hue += rng.random::<f64>() * HUE_DRIFT;
    }
}

/// Spawn `count` wanderers at the centre of `size` with speeds in [1, 6)
pub fn spawn_wanderers<R: Rng + ?Sized>(count: usize, size: DVec2, rng: &mut R) -> Vec<Wanderer> {
    let center = size * 0.5;
    (0..count)
        .map(|_| {
            let speed = rng.random::<f64>() * 5.0 + 1.0;
            Wanderer::new(center, speed, rng)
        })
        .collect()
}
