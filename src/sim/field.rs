//! Inverse-distance force field
//!
//! Each source contributes `(s - p) / |s - p|`, a unit vector toward the
//! source. Contributions are summed, not averaged, so two sources pull twice
//! as hard as one.

use glam::DVec2;

use crate::consts::MIN_DISTANCE;

/// Net pull on `point` from every source, scaled by `gain`
///
/// The result points toward the sources. Callers subtract it from the rest
/// position so lattice points are pushed away.
///
/// A source coinciding with `point` contributes nothing: its distance is
/// clamped to [`MIN_DISTANCE`] and the delta is zero. Non-finite sources
/// are ignored.
pub fn compute_displacement(point: DVec2, sources: &[DVec2], gain: f64) -> DVec2 {
    gain * field_direction(point, sources)
}

/// Unscaled accumulated direction, `Σ (s - p) / max(|s - p|, MIN_DISTANCE)`
pub fn field_direction(point: DVec2, sources: &[DVec2]) -> DVec2 {
    sources
        .iter()
        .filter(|s| s.is_finite())
        .fold(DVec2::ZERO, |direction, &source| {
            let delta = source - point;
            let force = 1.0 / delta.length().max(MIN_DISTANCE);
            direction + delta * force
        })
}
