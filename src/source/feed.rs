//! Lidar feed file
//!
//! The tracker rewrites a text file every producer tick with one `y,x` line
//! per person, in metres. Positions are scaled to pixels per axis.

use std::path::{Path, PathBuf};

use glam::DVec2;

use super::PositionSource;
use crate::error::FeedError;

/// Parse one `y,x` line into a point in metres
fn parse_line(line_no: usize, line: &str) -> Result<DVec2, FeedError> {
    let malformed = |reason: String| FeedError::Malformed {
        line: line_no,
        reason,
    };
    let (y, x) = line
        .split_once(',')
        .ok_or_else(|| malformed(format!("expected 'y,x', got '{line}'")))?;
    let y: f64 = y
        .trim()
        .parse()
        .map_err(|e| malformed(format!("bad y '{y}': {e}")))?;
    let x: f64 = x
        .trim()
        .parse()
        .map_err(|e| malformed(format!("bad x '{x}': {e}")))?;
    let p = DVec2::new(x, y);
    if !p.is_finite() {
        return Err(malformed("non-finite coordinate".to_string()));
    }
    Ok(p)
}

/// Parse feed text into pixel positions, skipping blank and malformed lines
///
/// `scale` is pixels per metre on each axis. Malformed lines are logged and
/// dropped so one bad line never hides the rest of the crowd.
pub fn parse_feed(text: &str, scale: DVec2) -> Vec<DVec2> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(i, line)| match parse_line(i + 1, line) {
            Ok(metres) => Some(metres * scale),
            Err(e) => {
                log::debug!("Skipping feed line: {}", e);
                None
            }
        })
        .collect()
}

/// Reads the lidar output file on every call
#[derive(Debug, Clone)]
pub struct FeedSource {
    path: PathBuf,
    scale: DVec2,
    /// Set while the file is unreadable so the outage is logged once
    unavailable: bool,
}

impl FeedSource {
    /// `scale` is `resolution / field_size` in pixels per metre
    pub fn new(path: impl Into<PathBuf>, scale: DVec2) -> Self {
        Self {
            path: path.into(),
            scale,
            unavailable: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the file once
    pub fn read(&self) -> Result<Vec<DVec2>, FeedError> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| FeedError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(parse_feed(&text, self.scale))
    }
}

impl PositionSource for FeedSource {
    fn positions(&mut self) -> Vec<DVec2> {
        match self.read() {
            Ok(positions) => {
                if self.unavailable {
                    log::info!("Feed {} is readable again", self.path.display());
                    self.unavailable = false;
                }
                positions
            }
            Err(e) => {
                if !self.unavailable {
                    log::warn!("{}; treating as no positions", e);
                    self.unavailable = true;
                }
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_swaps_and_scales() {
        let scale = DVec2::new(640.0, 540.0);
        let positions = parse_feed("1.000000,0.500000\n0.0,3.0\n", scale);
        assert_eq!(positions, vec![DVec2::new(320.0, 540.0), DVec2::new(1920.0, 0.0)]);
    }

    #[test]
    fn test_parse_skips_bad_lines() {
        let text = "1.0,1.0\n\ngarbage\n2.0,abc\nnan,1.0\n 0.5 , 0.25 \n";
        let positions = parse_feed(text, DVec2::ONE);
        assert_eq!(positions, vec![DVec2::new(1.0, 1.0), DVec2::new(0.25, 0.5)]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_feed("", DVec2::ONE).is_empty());
    }

    #[test]
    fn test_malformed_line_number() {
        match parse_line(7, "1.0;2.0") {
            Err(FeedError::Malformed { line, .. }) => assert_eq!(line, 7),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let mut source = FeedSource::new("/nonexistent/lidar_output.txt", DVec2::ONE);
        assert!(source.read().is_err());
        assert!(source.positions().is_empty());
        assert!(source.positions().is_empty());
    }

    #[test]
    fn test_reads_file() {
        let path = std::env::temp_dir().join(format!("feed_test_{}.txt", std::process::id()));
        std::fs::write(&path, "0.5,1.5\n").unwrap();
        let mut source = FeedSource::new(&path, DVec2::new(2.0, 4.0));
        assert_eq!(source.positions(), vec![DVec2::new(3.0, 2.0)]);
        std::fs::remove_file(&path).unwrap();
        assert!(source.positions().is_empty());
    }
}
