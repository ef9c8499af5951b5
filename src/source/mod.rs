//! Position sources
//!
//! Anything that can report the tracked positions for the current tick:
//! - `PointerSource`: a single pointer position (mouse stand-in)
//! - `FeedSource`: the lidar tracker's text file, re-read every tick
//! - `WalkerCrowd`: simulated people walking around the field

pub mod feed;
pub mod walkers;

pub use feed::{FeedSource, parse_feed};
pub use walkers::{WalkerCrowd, WalkingPerson};

use glam::DVec2;

/// Supplies the external positions for one tick, in screen pixels
///
/// An empty result means "no sources this tick"; it is never an error.
pub trait PositionSource {
    fn positions(&mut self) -> Vec<DVec2>;
}

/// A fixed pointer position that callers may move between ticks
#[derive(Debug, Clone, Default)]
pub struct PointerSource {
    pub position: Option<DVec2>,
}

impl PointerSource {
    pub fn at(position: DVec2) -> Self {
        Self {
            position: Some(position),
        }
    }

    pub fn move_to(&mut self, position: DVec2) {
        self.position = Some(position);
    }

    /// Pointer left the window
    pub fn release(&mut self) {
        self.position = None;
    }
}

impl PositionSource for PointerSource {
    fn positions(&mut self) -> Vec<DVec2> {
        self.position.into_iter().collect()
    }
}

/// Parse a `"width:height"` pair such as `1920:1080` or `3:2.5`
pub fn parse_pair(s: &str) -> Result<(f64, f64), String> {
    let (a, b) = s
        .split_once(':')
        .ok_or_else(|| format!("expected 'width:height', got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid number '{v}': {e}"))
    };
    Ok((parse(a)?, parse(b)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_source() {
        let mut pointer = PointerSource::at(DVec2::new(3.0, 4.0));
        assert_eq!(pointer.positions(), vec![DVec2::new(3.0, 4.0)]);
        pointer.release();
        assert!(pointer.positions().is_empty());
        pointer.move_to(DVec2::new(1.0, 1.0));
        assert_eq!(pointer.positions().len(), 1);
    }

    #[test]
    fn test_parse_pair() {
        assert_eq!(parse_pair("1920:1080"), Ok((1920.0, 1080.0)));
        assert_eq!(parse_pair("3:2.5"), Ok((3.0, 2.5)));
        assert!(parse_pair("1920x1080").is_err());
        assert!(parse_pair("a:1").is_err());
    }
}
