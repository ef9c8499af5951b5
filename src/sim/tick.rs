//! Fixed-step simulation tick
//!
//! One call advances the scene by exactly one frame. The caller decides the
//! cadence; nothing here reads a clock.

use glam::DVec2;

use super::body::Edge;
use super::state::{Scene, SimState};

/// Inputs for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Distortion sources or players, in screen pixels
    pub sources: Vec<DVec2>,
}

impl TickInput {
    pub fn new(sources: Vec<DVec2>) -> Self {
        Self { sources }
    }
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    /// Ball crossed a side edge and was re-served
    Goal { edge: Edge },
    /// Ball touched the top or bottom edge
    WallBounce,
    /// Ball was kicked by this many players
    Kick { players: usize },
    /// Ball update produced non-finite state and was discarded
    Rejected,
}

/// Advance the simulation by one step
pub fn tick(state: &mut SimState, input: &TickInput) -> Vec<SimEvent> {
    state.time_ticks += 1;
    let mut events = Vec::new();

    match &mut state.scene {
        Scene::Grid(lattice) => {
            lattice.update(&input.sources);
        }

        Scene::Soccer(soccer) => {
            let ball = soccer.ball.tick(&input.sources, &mut state.rng);
            if ball.rejected {
                events.push(SimEvent::Rejected);
            }
            if let Some(edge) = ball.reset {
                soccer.record_goal(edge);
                log::info!(
                    "Goal at {:?} edge (tick {}), score {}:{}",
                    edge,
                    state.time_ticks,
                    soccer.scores[0],
                    soccer.scores[1]
                );
                events.push(SimEvent::Goal { edge });
            }
            if ball.wall_bounce {
                events.push(SimEvent::WallBounce);
            }
            if ball.kicks > 0 {
                log::debug!("Ball kicked by {} players", ball.kicks);
                events.push(SimEvent::Kick {
                    players: ball.kicks,
                });
            }
        }

        Scene::Particles { wanderers, size } => {
            for wanderer in wanderers.iter_mut() {
                wanderer.step(*size, &mut state.rng);
            }
        }
    }

    events
}
