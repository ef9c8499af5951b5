//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - One fixed step per tick, no clock reads
//! - Seeded RNG only
//! - Stable iteration order (sources are applied in the order given)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod field;
pub mod lattice;
pub mod state;
pub mod tick;
pub mod wander;

pub use body::{BodyEvents, BodyParams, BoundedBody, Edge, Rect};
pub use collision::{CollisionResponse, in_range, resolve_obstacles};
pub use field::{compute_displacement, field_direction};
pub use lattice::{LatticePoint, Neighbors, RenderTarget, ResponsiveLattice};
pub use state::{Scene, SceneKind, SimState, Soccer};
pub use tick::{SimEvent, TickInput, tick};
pub use wander::{Wanderer, spawn_wanderers};
