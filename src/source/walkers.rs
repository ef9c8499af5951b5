//! Simulated people walking around the play area
//!
//! Stands in for the lidar tracker. Walkers move in metres; as a
//! [`PositionSource`] the crowd reports pixels, and `write_feed` produces
//! the same file the tracker would.

use std::io::Write;
use std::path::Path;

use glam::DVec2;
use rand::Rng;
use rand_distr::StandardNormal;
use std::f64::consts::PI;

use super::PositionSource;
use crate::error::FeedError;
use crate::{angle_to, polar_to_cartesian};

/// Per-step probability of picking a new heading and speed
const TURN_CHANCE: f64 = 0.025;
/// Probability that a new heading aims at the field centre
const CENTER_BIAS: f64 = 0.9;
/// Standard deviation of a new walking speed, metres per step
const SPEED_SCALE: f64 = 0.025;
/// Speed decay per step
const SPEED_DAMPING: f64 = 0.99;

/// One simulated person, in metres
#[derive(Debug, Clone, PartialEq)]
pub struct WalkingPerson {
    pub position: DVec2,
    /// Heading in radians
    pub direction: f64,
    /// Signed speed in metres per step
    pub velocity: f64,
}

impl WalkingPerson {
    /// Place a person uniformly at random on a field of `field_size` metres
    pub fn new<R: Rng + ?Sized>(field_size: DVec2, rng: &mut R) -> Self {
        Self {
            position: DVec2::new(
                rng.random::<f64>() * field_size.x,
                rng.random::<f64>() * field_size.y,
            ),
            direction: 0.0,
            velocity: 1.0,
        }
    }

    /// Move a little; occasionally pick a new heading and speed
    pub fn step<R: Rng + ?Sized>(&mut self, field_size: DVec2, rng: &mut R) {
        if rng.random::<f64>() < TURN_CHANCE {
            self.direction = rng.random_range(-PI..PI);

            // Heading from the centre through the walker, as the tracker demo does
            let center = field_size * 0.5;
            if rng.random::<f64>() < CENTER_BIAS {
                self.direction = angle_to(center, self.position);
            }

            let n: f64 = rng.sample(StandardNormal);
            self.velocity = n * SPEED_SCALE;
            log::debug!(
                "Walker updated to direction {:.2}, with velocity {:.2}",
                self.direction,
                self.velocity
            );
        }

        self.position += polar_to_cartesian(self.velocity, self.direction);
        self.velocity *= SPEED_DAMPING;

        if self.position.x > field_size.x {
            self.position.x = field_size.x;
            self.velocity = -self.velocity;
        } else if self.position.x < 0.0 {
            self.position.x = 0.0;
            self.velocity = -self.velocity;
        }

        if self.position.y > field_size.y {
            self.position.y = field_size.y;
            self.velocity = -self.velocity;
        } else if self.position.y < 0.0 {
            self.position.y = 0.0;
            self.velocity = -self.velocity;
        }
    }
}

/// A group of walkers sharing one field and RNG
#[derive(Debug, Clone)]
pub struct WalkerCrowd<R> {
    pub people: Vec<WalkingPerson>,
    field_size: DVec2,
    /// Pixels per metre
    scale: DVec2,
    rng: R,
}

impl<R: Rng> WalkerCrowd<R> {
    /// `field_resolution` in pixels, `field_size` in metres
    pub fn new(field_resolution: DVec2, field_size: DVec2, num_people: usize, mut rng: R) -> Self {
        log::info!(
            "Creating walker crowd with field resolution of ({}, {}) and field size of ({:.2}m, {:.2}m) with {} people",
            field_resolution.x,
            field_resolution.y,
            field_size.x,
            field_size.y,
            num_people
        );
        let people = (0..num_people)
            .map(|_| WalkingPerson::new(field_size, &mut rng))
            .collect();
        Self {
            people,
            field_size,
            scale: field_resolution / field_size,
            rng,
        }
    }

    pub fn field_size(&self) -> DVec2 {
        self.field_size
    }

    /// Advance every walker one step
    pub fn step(&mut self) {
        for person in &mut self.people {
            person.step(self.field_size, &mut self.rng);
        }
    }

    /// Positions in metres
    pub fn positions_m(&self) -> Vec<DVec2> {
        self.people.iter().map(|p| p.position).collect()
    }

    /// Feed text: one `y,x` line per person, six decimals
    pub fn feed_text(&self) -> String {
        self.people
            .iter()
            .map(|p| format!("{:.6},{:.6}\n", p.position.y, p.position.x))
            .collect()
    }

    /// Write the feed file atomically (temp file then rename)
    pub fn write_feed(&self, path: &Path) -> Result<(), FeedError> {
        let io_err = |source| FeedError::Io {
            path: path.to_path_buf(),
            source,
        };
        let tmp = path.with_extension("tmp");
        let mut file = std::fs::File::create(&tmp).map_err(io_err)?;
        file.write_all(self.feed_text().as_bytes()).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        drop(file);
        std::fs::rename(&tmp, path).map_err(io_err)?;
        Ok(())
    }
}

impl<R: Rng> PositionSource for WalkerCrowd<R> {
    /// Steps the crowd once, then reports pixel positions
    fn positions(&mut self) -> Vec<DVec2> {
        self.step();
        self.people.iter().map(|p| p.position * self.scale).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::parse_feed;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn crowd(n: usize, seed: u64) -> WalkerCrowd<Pcg32> {
        WalkerCrowd::new(
            DVec2::new(1920.0, 1080.0),
            DVec2::new(3.0, 2.0),
            n,
            Pcg32::seed_from_u64(seed),
        )
    }

    #[test]
    fn test_walkers_stay_on_field() {
        let mut crowd = crowd(5, 1);
        for _ in 0..5000 {
            crowd.step();
            for p in crowd.positions_m() {
                assert!(p.x >= 0.0 && p.x <= 3.0);
                assert!(p.y >= 0.0 && p.y <= 2.0);
            }
        }
    }

    #[test]
    fn test_wall_flips_velocity() {
        let field = DVec2::new(3.0, 2.0);
        // Find a seed whose first draw does not trigger a re-aim
        let mut rng = (0..)
            .map(Pcg32::seed_from_u64)
            .find(|rng| rng.clone().random::<f64>() >= TURN_CHANCE)
            .unwrap();
        let mut person = WalkingPerson {
            position: DVec2::new(2.999, 1.0),
            direction: 0.0,
            velocity: 0.5,
        };
        person.step(field, &mut rng);
        assert_eq!(person.position.x, 3.0);
        assert!((person.velocity + 0.5 * SPEED_DAMPING).abs() < 1e-12);
    }

    #[test]
    fn test_pixel_positions_are_scaled() {
        let mut crowd = crowd(3, 3);
        let pixels = crowd.positions();
        for (px, m) in pixels.iter().zip(crowd.positions_m()) {
            assert!((px.x - m.x * 640.0).abs() < 1e-9);
            assert!((px.y - m.y * 540.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_feed_round_trip_through_parser() {
        let crowd = crowd(4, 4);
        let text = crowd.feed_text();
        assert_eq!(text.lines().count(), 4);
        let parsed = parse_feed(&text, DVec2::ONE);
        for (a, b) in parsed.iter().zip(crowd.positions_m()) {
            assert!((*a - b).length() < 1e-5);
        }
    }

    #[test]
    fn test_write_feed() {
        let crowd = crowd(2, 5);
        let path = std::env::temp_dir().join(format!("walkers_{}.txt", std::process::id()));
        crowd.write_feed(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, crowd.feed_text());
        assert!(!path.with_extension("tmp").exists());
        std::fs::remove_file(&path).unwrap();
    }
}
