//! Ball vs. player collision response
//!
//! Players are point obstacles. Every player within reach kicks the ball
//! straight away from itself at full speed; when several are in reach the
//! last one in iteration order decides the outcome.

use glam::DVec2;
use rand::Rng;
use std::f64::consts::PI;

use crate::consts::SPIN_IMPULSE;
use crate::{angle_to, distance, polar_to_cartesian};

/// Outcome of the player checks for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResponse {
    /// Velocity pointing away from `obstacle` at full speed
    pub velocity: DVec2,
    /// New spin velocity in [-SPIN_IMPULSE, SPIN_IMPULSE)
    pub spin_velocity: f64,
    /// The obstacle that produced this response
    pub obstacle: DVec2,
    /// How many obstacles were in reach this tick
    pub hits: usize,
}

/// Whether `obstacle` is strictly closer than `threshold` to `position`
#[inline]
pub fn in_range(position: DVec2, threshold: f64, obstacle: DVec2) -> bool {
    distance(position, obstacle) < threshold
}

/// Velocity of magnitude `speed` pointing from `obstacle` through `position`
#[inline]
pub fn bounce_velocity(position: DVec2, obstacle: DVec2, speed: f64) -> DVec2 {
    polar_to_cartesian(speed, PI + angle_to(position, obstacle))
}

/// Apply every qualifying obstacle in order, keeping the last response
///
/// A spin impulse is drawn for each qualifying obstacle, so the RNG advances
/// once per hit. Non-finite obstacles are skipped.
pub fn resolve_obstacles<R: Rng + ?Sized>(
    position: DVec2,
    threshold: f64,
    max_speed: f64,
    obstacles: &[DVec2],
    rng: &mut R,
) -> Option<CollisionResponse> {
    let mut response: Option<CollisionResponse> = None;
    for &obstacle in obstacles {
        if !obstacle.is_finite() || !in_range(position, threshold, obstacle) {
            continue;
        }
        let hits = response.map_or(0, |r| r.hits) + 1;
        response = Some(CollisionResponse {
            velocity: bounce_velocity(position, obstacle, max_speed),
            spin_velocity: rng.random::<f64>() * 2.0 * SPIN_IMPULSE - SPIN_IMPULSE,
            obstacle,
            hits,
        });
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_in_range_is_strict() {
        assert!(in_range(DVec2::ZERO, 100.0, DVec2::new(99.9, 0.0)));
        assert!(!in_range(DVec2::ZERO, 100.0, DVec2::new(100.0, 0.0)));
    }

    #[test]
    fn test_bounce_away_from_obstacle() {
        let v = bounce_velocity(DVec2::ZERO, DVec2::new(0.0, 50.0), 10.0);
        assert!((v - DVec2::new(0.0, -10.0)).length() < 1e-9);
    }

    #[test]
    fn test_no_obstacles_in_range() {
        let mut rng = Pcg32::seed_from_u64(1);
        let far = [DVec2::new(500.0, 500.0)];
        assert!(resolve_obstacles(DVec2::ZERO, 100.0, 10.0, &far, &mut rng).is_none());
        assert!(resolve_obstacles(DVec2::ZERO, 100.0, 10.0, &[], &mut rng).is_none());
    }

    #[test]
    fn test_last_obstacle_wins() {
        let mut rng = Pcg32::seed_from_u64(2);
        // Nearest first, then a farther one still in range: the farther one wins
        let obstacles = [DVec2::new(10.0, 0.0), DVec2::new(0.0, 90.0)];
        let r = resolve_obstacles(DVec2::ZERO, 100.0, 10.0, &obstacles, &mut rng).unwrap();
        assert_eq!(r.obstacle, obstacles[1]);
        assert_eq!(r.hits, 2);
        assert!((r.velocity - DVec2::new(0.0, -10.0)).length() < 1e-9);
    }

    #[test]
    fn test_spin_impulse_range() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..1000 {
            let r = resolve_obstacles(DVec2::ZERO, 10.0, 10.0, &[DVec2::new(1.0, 1.0)], &mut rng)
                .unwrap();
            assert!(r.spin_velocity >= -SPIN_IMPULSE && r.spin_velocity < SPIN_IMPULSE);
        }
    }

    #[test]
    fn test_coincident_obstacle_is_finite() {
        let mut rng = Pcg32::seed_from_u64(4);
        let r = resolve_obstacles(DVec2::ZERO, 10.0, 10.0, &[DVec2::ZERO], &mut rng).unwrap();
        assert!(r.velocity.is_finite());
        assert!((r.velocity.length() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_nan_obstacle_ignored() {
        let mut rng = Pcg32::seed_from_u64(5);
        let obstacles = [DVec2::new(f64::NAN, 0.0)];
        assert!(resolve_obstacles(DVec2::ZERO, 10.0, 10.0, &obstacles, &mut rng).is_none());
    }
}
