//! The ball: a single bounded body
//!
//! Explicit Euler motion with undamped translation and decaying spin. The
//! left/right edges are goals (the ball is re-served from the centre), the
//! top/bottom edges send it back at a fixed slow speed.

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::resolve_obstacles;
use crate::consts::*;
use crate::constrain;

/// Axis-aligned rectangle in screen coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Whether `p` is inside the rectangle shrunk by `inset` on every side
    pub fn contains_inset(&self, p: DVec2, inset: f64) -> bool {
        p.x >= self.left + inset
            && p.x <= self.right - inset
            && p.y >= self.top + inset
            && p.y <= self.bottom - inset
    }
}

/// Construction parameters for a [`BoundedBody`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyParams {
    pub radius: f64,
    pub max_speed: f64,
    /// Extra reach beyond `radius` for obstacle contact
    pub collision_margin: f64,
    pub spin_damping: f64,
    pub bounds: Rect,
    /// Start position; centre of `bounds` when absent
    pub initial_position: Option<DVec2>,
    /// Start velocity; random when absent
    pub initial_velocity: Option<DVec2>,
}

impl Default for BodyParams {
    fn default() -> Self {
        Self {
            radius: BALL_RADIUS,
            max_speed: BALL_MAX_SPEED,
            collision_margin: COLLISION_MARGIN,
            spin_damping: SPIN_DAMPING,
            bounds: Rect::new(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT),
            initial_position: None,
            initial_velocity: None,
        }
    }
}

/// Which side edge the ball crossed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Left,
    Right,
}

/// What happened to the ball during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BodyEvents {
    /// Crossed the left or right edge and was re-served
    pub reset: Option<Edge>,
    /// Touched the top or bottom edge
    pub wall_bounce: bool,
    /// Number of obstacles that touched the ball
    pub kicks: usize,
    /// Tick produced non-finite state and was rolled back
    pub rejected: bool,
}

/// A moving, spinning body confined to `bounds`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundedBody {
    pub position: DVec2,
    pub velocity: DVec2,
    /// Accumulated rotation (degrees when rendered)
    pub spin_angle: f64,
    pub spin_velocity: f64,
    pub radius: f64,
    pub max_speed: f64,
    pub collision_margin: f64,
    pub spin_damping: f64,
    pub bounds: Rect,
}

impl BoundedBody {
    pub fn new<R: Rng + ?Sized>(params: BodyParams, rng: &mut R) -> Self {
        let velocity = params.initial_velocity.unwrap_or_else(|| {
            DVec2::new(
                rng.random::<f64>() * params.max_speed,
                rng.random::<f64>() * params.max_speed / 5.0,
            )
        });
        Self {
            position: params
                .initial_position
                .unwrap_or_else(|| params.bounds.center()),
            velocity,
            spin_angle: 0.0,
            spin_velocity: INITIAL_SPIN_VELOCITY,
            radius: params.radius,
            max_speed: params.max_speed,
            collision_margin: params.collision_margin,
            spin_damping: params.spin_damping,
            bounds: params.bounds,
        }
    }

    /// Distance at which an obstacle touches the body
    #[inline]
    pub fn reach(&self) -> f64 {
        self.radius + self.collision_margin
    }

    /// Serve from the centre of the field with a random velocity
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.position = self.bounds.center();
        self.velocity = DVec2::new(
            (rng.random::<f64>() - 0.5) * self.max_speed,
            (rng.random::<f64>() - 0.5) * self.max_speed,
        );
    }

    /// Advance one tick against the current obstacle positions
    pub fn tick<R: Rng + ?Sized>(&mut self, obstacles: &[DVec2], rng: &mut R) -> BodyEvents {
        let snapshot = self.clone();
        let mut events = BodyEvents::default();

        self.position += self.velocity;
        self.spin_angle += self.spin_velocity;
        self.spin_velocity *= self.spin_damping;

        let b = self.bounds;
        let crossed = if self.position.x < b.left + self.radius {
            Some(Edge::Left)
        } else if self.position.x > b.right - self.radius {
            Some(Edge::Right)
        } else {
            None
        };
        if crossed.is_some() {
            self.velocity.x = -self.velocity.x;
            self.reset(rng);
            events.reset = crossed;
        }

        if self.position.y < b.top + self.radius {
            self.velocity.y = VERTICAL_BOUNCE_SPEED;
            events.wall_bounce = true;
        } else if self.position.y > b.bottom - self.radius {
            self.velocity.y = -VERTICAL_BOUNCE_SPEED;
            events.wall_bounce = true;
        }

        self.velocity.x = constrain(self.velocity.x, -self.max_speed, self.max_speed);
        self.velocity.y = constrain(self.velocity.y, -self.max_speed, self.max_speed);

        if let Some(hit) =
            resolve_obstacles(self.position, self.reach(), self.max_speed, obstacles, rng)
        {
            self.velocity = hit.velocity;
            self.spin_velocity = hit.spin_velocity;
            events.kicks = hit.hits;
        }

        if !self.is_finite() {
            log::warn!("Ball state became non-finite, keeping previous state");
            *self = snapshot;
            return BodyEvents {
                rejected: true,
                ..BodyEvents::default()
            };
        }

        events
    }

    fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.velocity.is_finite()
            && self.spin_angle.is_finite()
            && self.spin_velocity.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::f64::consts::PI;

    fn ball_at(position: DVec2, velocity: DVec2) -> BoundedBody {
        let mut rng = Pcg32::seed_from_u64(0);
        BoundedBody::new(
            BodyParams {
                initial_position: Some(position),
                initial_velocity: Some(velocity),
                ..BodyParams::default()
            },
            &mut rng,
        )
    }

    #[test]
    fn test_random_launch_velocity() {
        let mut rng = Pcg32::seed_from_u64(11);
        let ball = BoundedBody::new(BodyParams::default(), &mut rng);
        assert!(ball.velocity.x >= 0.0 && ball.velocity.x < BALL_MAX_SPEED);
        assert!(ball.velocity.y >= 0.0 && ball.velocity.y < BALL_MAX_SPEED / 5.0);
        assert_eq!(ball.position, DVec2::new(960.0, 540.0));
    }

    #[test]
    fn test_integrates_and_damps_spin() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ball = ball_at(DVec2::new(500.0, 500.0), DVec2::new(3.0, -2.0));
        let events = ball.tick(&[], &mut rng);
        assert_eq!(events, BodyEvents::default());
        assert_eq!(ball.position, DVec2::new(503.0, 498.0));
        assert_eq!(ball.velocity, DVec2::new(3.0, -2.0));
        assert!((ball.spin_angle - INITIAL_SPIN_VELOCITY).abs() < 1e-12);
        assert!((ball.spin_velocity - INITIAL_SPIN_VELOCITY * SPIN_DAMPING).abs() < 1e-12);
    }

    #[test]
    fn test_left_edge_resets_to_centre() {
        let mut rng = Pcg32::seed_from_u64(2);
        let x = BALL_RADIUS - 1e-6;
        let mut ball = ball_at(DVec2::new(x, 540.0), DVec2::new(-1.0, 0.0));
        let events = ball.tick(&[], &mut rng);
        assert_eq!(events.reset, Some(Edge::Left));
        assert_eq!(ball.position, ball.bounds.center());
        assert!(ball.velocity.x.abs() <= BALL_MAX_SPEED / 2.0);
        assert!(ball.velocity.y.abs() <= BALL_MAX_SPEED / 2.0);
    }

    #[test]
    fn test_right_edge_resets_to_centre() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut ball = ball_at(DVec2::new(1920.0 - BALL_RADIUS, 300.0), DVec2::new(5.0, 0.0));
        assert_eq!(ball.tick(&[], &mut rng).reset, Some(Edge::Right));
        assert_eq!(ball.position, DVec2::new(960.0, 540.0));
    }

    #[test]
    fn test_top_edge_fixed_bounce() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut ball = ball_at(DVec2::new(500.0, BALL_RADIUS + 2.0), DVec2::new(4.0, -8.0));
        let events = ball.tick(&[], &mut rng);
        assert!(events.wall_bounce && events.reset.is_none());
        assert_eq!(ball.velocity, DVec2::new(4.0, 1.0));
        // Not re-centred, only the vertical speed changes
        assert_eq!(ball.position, DVec2::new(504.0, BALL_RADIUS - 6.0));
    }

    #[test]
    fn test_bottom_edge_fixed_bounce() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut ball = ball_at(DVec2::new(500.0, 1080.0 - BALL_RADIUS), DVec2::new(0.0, 9.0));
        ball.tick(&[], &mut rng);
        assert_eq!(ball.velocity.y, -1.0);
    }

    #[test]
    fn test_velocity_clamped() {
        let mut rng = Pcg32::seed_from_u64(6);
        let mut ball = ball_at(DVec2::new(500.0, 500.0), DVec2::new(40.0, -40.0));
        ball.tick(&[], &mut rng);
        assert_eq!(ball.velocity, DVec2::new(BALL_MAX_SPEED, -BALL_MAX_SPEED));
    }

    #[test]
    fn test_collision_bounces_away_at_max_speed() {
        let mut rng = Pcg32::seed_from_u64(7);
        let start = DVec2::new(800.0, 500.0);
        for theta in [0.0, 0.7, PI / 2.0, 2.5, -1.2] {
            let mut ball = ball_at(start, DVec2::ZERO);
            let obstacle = start + crate::polar_to_cartesian(BALL_RADIUS + 10.0, theta);
            let events = ball.tick(&[obstacle], &mut rng);
            assert_eq!(events.kicks, 1);
            assert!((ball.velocity.length() - BALL_MAX_SPEED).abs() < 1e-9);
            let heading = ball.velocity.y.atan2(ball.velocity.x);
            let diff = crate::normalize_angle(heading - (theta + PI));
            assert!(diff.abs() < 1e-9, "theta {theta}: heading {heading}");
            assert!(ball.spin_velocity >= -SPIN_IMPULSE && ball.spin_velocity < SPIN_IMPULSE);
        }
    }

    #[test]
    fn test_obstacle_out_of_reach() {
        let mut rng = Pcg32::seed_from_u64(8);
        let start = DVec2::new(800.0, 500.0);
        let mut ball = ball_at(start, DVec2::ZERO);
        let events = ball.tick(&[start + DVec2::new(BALL_RADIUS + 25.0, 0.0)], &mut rng);
        assert_eq!(events.kicks, 0);
        assert_eq!(ball.velocity, DVec2::ZERO);
    }

    #[test]
    fn test_last_player_wins() {
        let mut rng = Pcg32::seed_from_u64(9);
        let start = DVec2::new(800.0, 500.0);
        let mut ball = ball_at(start, DVec2::ZERO);
        let left = start - DVec2::new(20.0, 0.0);
        let above = start - DVec2::new(0.0, 90.0);
        ball.tick(&[left, above], &mut rng);
        // Kicked downward by the player above, not rightward by the nearer one
        assert!((ball.velocity - DVec2::new(0.0, BALL_MAX_SPEED)).length() < 1e-9);
    }

    #[test]
    fn test_non_finite_tick_rolled_back() {
        let mut rng = Pcg32::seed_from_u64(10);
        let mut ball = ball_at(DVec2::new(500.0, 500.0), DVec2::new(1.0, 1.0));
        ball.spin_velocity = f64::INFINITY;
        ball.spin_damping = 0.0;
        let before = ball.clone();
        let events = ball.tick(&[], &mut rng);
        assert!(events.rejected);
        assert_eq!(ball, before);
    }

    proptest! {
        #[test]
        fn prop_speed_always_clamped(
            seed in any::<u64>(),
            vx in -100f64..100.0,
            vy in -100f64..100.0,
            players in proptest::collection::vec((0f64..1920.0, 0f64..1080.0), 0..8),
            ticks in 1usize..200,
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut ball = ball_at(DVec2::new(960.0, 540.0), DVec2::new(vx, vy));
            let players: Vec<DVec2> = players.into_iter().map(|(x, y)| DVec2::new(x, y)).collect();
            for _ in 0..ticks {
                ball.tick(&players, &mut rng);
                prop_assert!(ball.velocity.x.abs() <= ball.max_speed);
                prop_assert!(ball.velocity.y.abs() <= ball.max_speed);
            }
        }
    }
}
