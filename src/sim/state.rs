//! Simulation state and core scene types
//!
//! Everything that persists between ticks lives here; sources do not.

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::body::{BodyParams, BoundedBody, Edge};
use super::lattice::ResponsiveLattice;
use super::wander::{Wanderer, spawn_wanderers};
use crate::error::LatticeError;
use crate::settings::Settings;

/// Which simulation is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    Grid,
    Soccer,
    Particles,
}

impl SceneKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SceneKind::Grid => "grid",
            SceneKind::Soccer => "soccer",
            SceneKind::Particles => "particles",
        }
    }

    /// Fixed tick rate the scene was tuned for
    pub fn tick_hz(&self) -> u32 {
        use crate::consts::*;
        match self {
            SceneKind::Grid => GRID_TICK_HZ,
            SceneKind::Soccer => SOCCER_TICK_HZ,
            SceneKind::Particles => PARTICLES_TICK_HZ,
        }
    }
}

/// Ball plus goal tally
#[derive(Debug, Clone, PartialEq)]
pub struct Soccer {
    pub ball: BoundedBody,
    /// Goals for the left and right side. Crossing the left edge scores for the right side.
    pub scores: [u32; 2],
}

impl Soccer {
    pub fn record_goal(&mut self, edge: Edge) {
        match edge {
            Edge::Left => self.scores[1] += 1,
            Edge::Right => self.scores[0] += 1,
        }
    }
}

/// Scene-specific persistent state
#[derive(Debug, Clone)]
pub enum Scene {
    Grid(ResponsiveLattice),
    Soccer(Soccer),
    Particles { wanderers: Vec<Wanderer>, size: DVec2 },
}

impl Scene {
    pub fn kind(&self) -> SceneKind {
        match self {
            Scene::Grid(_) => SceneKind::Grid,
            Scene::Soccer(_) => SceneKind::Soccer,
            Scene::Particles { .. } => SceneKind::Particles,
        }
    }
}

/// Complete simulation state (deterministic given the seed and inputs)
#[derive(Debug, Clone)]
pub struct SimState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub scene: Scene,
}

impl SimState {
    fn with_scene(seed: u64, rng: Pcg32, scene: Scene) -> Self {
        log::info!("Created {} scene with seed {}", scene.kind().as_str(), seed);
        Self {
            seed,
            rng,
            time_ticks: 0,
            scene,
        }
    }

    /// Build the requested scene from settings
    pub fn new(kind: SceneKind, settings: &Settings) -> Result<Self, LatticeError> {
        match kind {
            SceneKind::Grid => Self::grid(settings),
            SceneKind::Soccer => Ok(Self::soccer(settings)),
            SceneKind::Particles => Ok(Self::particles(settings)),
        }
    }

    pub fn grid(settings: &Settings) -> Result<Self, LatticeError> {
        let lattice = ResponsiveLattice::new(
            settings.grid.rows,
            settings.grid.columns,
            settings.screen.size(),
        )?
        .with_gain(settings.grid.gain);
        let rng = Pcg32::seed_from_u64(settings.seed);
        Ok(Self::with_scene(settings.seed, rng, Scene::Grid(lattice)))
    }

    pub fn soccer(settings: &Settings) -> Self {
        let mut rng = Pcg32::seed_from_u64(settings.seed);
        let s = &settings.soccer;
        let params = BodyParams {
            radius: s.ball_radius,
            max_speed: s.max_speed,
            collision_margin: s.collision_margin,
            spin_damping: s.spin_damping,
            bounds: settings.screen.bounds(),
            initial_position: None,
            initial_velocity: s.initial_velocity.map(|(x, y)| DVec2::new(x, y)),
        };
        let ball = BoundedBody::new(params, &mut rng);
        Self::with_scene(
            settings.seed,
            rng,
            Scene::Soccer(Soccer {
                ball,
                scores: [0, 0],
            }),
        )
    }

    pub fn particles(settings: &Settings) -> Self {
        let mut rng = Pcg32::seed_from_u64(settings.seed);
        let size = settings.screen.size();
        let wanderers = spawn_wanderers(settings.num_wanderers, size, &mut rng);
        Self::with_scene(settings.seed, rng, Scene::Particles { wanderers, size })
    }

    pub fn kind(&self) -> SceneKind {
        self.scene.kind()
    }

    pub fn lattice(&self) -> Option<&ResponsiveLattice> {
        match &self.scene {
            Scene::Grid(lattice) => Some(lattice),
            _ => None,
        }
    }

    pub fn soccer_state(&self) -> Option<&Soccer> {
        match &self.scene {
            Scene::Soccer(soccer) => Some(soccer),
            _ => None,
        }
    }
}
