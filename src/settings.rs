//! Simulation settings
//!
//! Loaded from an optional JSON file; every field has a default so partial
//! files are fine.

use std::path::{Path, PathBuf};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::body::Rect;

/// Render region in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
        }
    }
}

impl ScreenConfig {
    pub fn size(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }

    pub fn center(&self) -> DVec2 {
        self.size() * 0.5
    }

    /// Full screen as a body bounds rectangle
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Distortion grid settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub rows: usize,
    pub columns: usize,
    pub gain: f64,
    /// Connect each point to its left and above neighbours
    pub draw_lines: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            rows: GRID_ROWS,
            columns: GRID_COLUMNS,
            gain: FIELD_GAIN,
            draw_lines: false,
        }
    }
}

/// Soccer ball settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SoccerSettings {
    pub ball_radius: f64,
    pub max_speed: f64,
    pub collision_margin: f64,
    pub spin_damping: f64,
    /// Fixed launch velocity; random when absent
    pub initial_velocity: Option<(f64, f64)>,
}

impl Default for SoccerSettings {
    fn default() -> Self {
        Self {
            ball_radius: BALL_RADIUS,
            max_speed: BALL_MAX_SPEED,
            collision_margin: COLLISION_MARGIN,
            spin_damping: SPIN_DAMPING,
            initial_velocity: None,
        }
    }
}

/// Lidar feed file settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedSettings {
    pub path: PathBuf,
    /// Real-world size of the projected field in metres (width, height)
    pub field_size: (f64, f64),
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("lidar_output.txt"),
            field_size: FIELD_SIZE_M,
        }
    }
}

/// Simulated walker crowd settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkerSettings {
    pub num_people: usize,
    pub period_ms: u64,
}

impl Default for WalkerSettings {
    fn default() -> Self {
        Self {
            num_people: NUM_PEOPLE,
            period_ms: WALKER_PERIOD_MS,
        }
    }
}

/// Top-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed for reproducible runs
    pub seed: u64,
    pub screen: ScreenConfig,
    pub grid: GridSettings,
    pub soccer: SoccerSettings,
    pub feed: FeedSettings,
    pub walkers: WalkerSettings,
    pub num_wanderers: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            screen: ScreenConfig::default(),
            grid: GridSettings::default(),
            soccer: SoccerSettings::default(),
            feed: FeedSettings::default(),
            walkers: WalkerSettings::default(),
            num_wanderers: NUM_WANDERERS,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON string and validate them
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load from `path` when given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                log::info!("Using default settings");
                Ok(Self::default())
            }
        }
    }

    /// Check value ranges that the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a positive number, got {value}"),
                })
            }
        }

        positive("screen.width", self.screen.width)?;
        positive("screen.height", self.screen.height)?;
        positive("soccer.ball_radius", self.soccer.ball_radius)?;
        positive("soccer.max_speed", self.soccer.max_speed)?;
        positive("feed.field_size.0", self.feed.field_size.0)?;
        positive("feed.field_size.1", self.feed.field_size.1)?;

        if self.grid.rows == 0 || self.grid.columns == 0 {
            return Err(ConfigError::Invalid {
                field: "grid",
                reason: "rows and columns must be at least 1".to_string(),
            });
        }
        if !self.grid.gain.is_finite() {
            return Err(ConfigError::Invalid {
                field: "grid.gain",
                reason: "must be finite".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.soccer.spin_damping) {
            return Err(ConfigError::Invalid {
                field: "soccer.spin_damping",
                reason: format!("must be within [0, 1], got {}", self.soccer.spin_damping),
            });
        }
        if 2.0 * self.soccer.ball_radius >= self.screen.width.min(self.screen.height) {
            return Err(ConfigError::Invalid {
                field: "soccer.ball_radius",
                reason: "ball does not fit on the screen".to_string(),
            });
        }
        Ok(())
    }

    /// Pixels per metre on each axis for the lidar feed
    pub fn feed_scale(&self) -> DVec2 {
        self.screen.size() / DVec2::new(self.feed.field_size.0, self.feed.field_size.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.grid.rows, 45);
        assert_eq!(settings.grid.columns, 80);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "grid": { "rows": 9, "draw_lines": true } }"#)
            .expect("valid settings");
        assert_eq!(settings.grid.rows, 9);
        assert_eq!(settings.grid.columns, GRID_COLUMNS);
        assert!(settings.grid.draw_lines);
        assert_eq!(settings.screen, ScreenConfig::default());
    }

    #[test]
    fn test_rejects_zero_columns() {
        let err = Settings::from_json(r#"{ "grid": { "columns": 0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "grid", .. }));
    }

    #[test]
    fn test_rejects_bad_json() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_feed_scale() {
        let settings = Settings::default();
        let scale = settings.feed_scale();
        assert!((scale.x - 640.0).abs() < 1e-9);
        assert!((scale.y - 540.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_file() {
        let err = Settings::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
