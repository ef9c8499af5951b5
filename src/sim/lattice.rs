//! Responsive lattice
//!
//! A fixed grid of points with rest positions at cell centres. Each update
//! pushes every point away from the current sources using the force field.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::field::compute_displacement;
use crate::consts::FIELD_GAIN;
use crate::error::LatticeError;

/// One node of the lattice
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatticePoint {
    rest: DVec2,
    /// Position after this tick's distortion (not interpolated between ticks)
    pub displaced: DVec2,
}

impl LatticePoint {
    pub fn new(rest: DVec2) -> Self {
        Self {
            rest,
            displaced: rest,
        }
    }

    /// Undistorted position, fixed at construction
    #[inline]
    pub fn rest(&self) -> DVec2 {
        self.rest
    }
}

/// Flat indices of a point's left and above neighbours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Neighbors {
    pub left: Option<usize>,
    pub above: Option<usize>,
}

/// A point plus the displaced neighbours it connects to when lines are drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderTarget {
    pub index: usize,
    pub point: DVec2,
    pub left: Option<DVec2>,
    pub above: Option<DVec2>,
}

/// Row-major grid of lattice points covering a `region`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsiveLattice {
    rows: usize,
    columns: usize,
    gain: f64,
    points: Vec<LatticePoint>,
}

impl ResponsiveLattice {
    /// Build a `rows x columns` lattice with one point at the centre of each cell
    pub fn new(rows: usize, columns: usize, region: DVec2) -> Result<Self, LatticeError> {
        if rows == 0 || columns == 0 {
            return Err(LatticeError::EmptyDimension { rows, columns });
        }

        let cell_w = region.x / columns as f64;
        let cell_h = region.y / rows as f64;
        let mut points = Vec::with_capacity(rows * columns);
        for r in 0..rows {
            for c in 0..columns {
                let x = c as f64 * cell_w + cell_w * 0.5;
                let y = r as f64 * cell_h + cell_h * 0.5;
                points.push(LatticePoint::new(DVec2::new(x, y)));
            }
        }

        log::debug!("Lattice {}x{} over {:?}", rows, columns, region);
        Ok(Self {
            rows,
            columns,
            gain: FIELD_GAIN,
            points,
        })
    }

    pub fn with_gain(mut self, gain: f64) -> Self {
        self.gain = gain;
        self
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }

    pub fn set_gain(&mut self, gain: f64) {
        self.gain = gain;
    }

    pub fn points(&self) -> &[LatticePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Row-major flat index of `(row, column)`
    #[inline]
    pub fn index(&self, row: usize, column: usize) -> usize {
        row * self.columns + column
    }

    /// Recompute every displaced position from the rest positions
    ///
    /// Costs O(points * sources). A point whose result is not finite keeps
    /// its previous displaced position.
    pub fn update(&mut self, sources: &[DVec2]) {
        let gain = self.gain;
        let mut skipped = 0usize;
        for point in &mut self.points {
            let displaced = point.rest - compute_displacement(point.rest, sources, gain);
            if displaced.is_finite() {
                point.displaced = displaced;
            } else {
                skipped += 1;
            }
        }
        if skipped > 0 {
            log::warn!("Lattice update skipped {} non-finite points", skipped);
        }
    }

    /// Left neighbour when not in the first column, above neighbour when not in the first row
    pub fn neighbors(&self, index: usize) -> Neighbors {
        if index >= self.points.len() {
            return Neighbors::default();
        }
        Neighbors {
            left: (index % self.columns > 0).then(|| index - 1),
            above: index.checked_sub(self.columns),
        }
    }

    /// Points that get connecting lines, with their left and above neighbours
    ///
    /// Uses the gate `left > 0 && above > 0 && index % columns > 0`, which
    /// also rejects `above == 0` and `left == 0`. With more than one column
    /// those cases already fall on the first row or column, so the result is
    /// every point with both neighbours. A single-column lattice gets no lines.
    pub fn render_targets(&self) -> Vec<RenderTarget> {
        let columns = self.columns as isize;
        self.points
            .iter()
            .enumerate()
            .filter(|(index, _)| {
                let index = *index as isize;
                let left_index = index - 1;
                let above_index = index - columns;
                left_index > 0 && above_index > 0 && index % columns > 0
            })
            .map(|(index, point)| {
                let n = self.neighbors(index);
                RenderTarget {
                    index,
                    point: point.displaced,
                    left: n.left.map(|i| self.points[i].displaced),
                    above: n.above.map(|i| self.points[i].displaced),
                }
            })
            .collect()
    }
}
