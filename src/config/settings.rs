//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from built-in defaults, an optional config file
//! and environment variables.

use std::path::PathBuf;
use std::time::Duration;
use serde::{Deserialize, Serialize};

use crate::draw::animation::{AnimationSpec, Easing};
use crate::draw::reel::ReelGeometry;

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub reel: ReelConfig,
    pub animation: AnimationConfig,
}

/// Where classes and question sets are persisted
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub data_dir: String,
    pub class_file: String,
    pub question_file: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for a daily rolling log file; stderr only when unset
    pub file_path: Option<String>,
}

/// Reel geometry, in pixels
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReelConfig {
    pub item_size: f64,
    pub viewport_height: f64,
    pub frame_interval_ms: u64,
}

/// Per-reel animation tuning
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnimationConfig {
    pub group: ReelAnimationConfig,
    pub pool: ReelAnimationConfig,
    pub student: ReelAnimationConfig,
    pub question: ReelAnimationConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReelAnimationConfig {
    pub duration_ms: u64,
    /// Cubic bezier control points `[x1, y1, x2, y2]`
    pub easing: [f32; 4],
}

impl ReelAnimationConfig {
    fn new(duration_ms: u64, easing: [f32; 4]) -> Self {
        Self { duration_ms, easing }
    }

    pub fn to_spec(&self, frame_interval: Duration) -> AnimationSpec {
        let [x1, y1, x2, y2] = self.easing;
        AnimationSpec {
            duration: Duration::from_millis(self.duration_ms),
            easing: Easing::CubicBezier(x1, y1, x2, y2),
            frame_interval,
        }
    }
}

impl Settings {
    /// Load settings from defaults, config file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("LUCKYDRAW").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::LuckyDrawError> {
        super::validation::validate_settings(self)
    }

    pub fn class_store_path(&self) -> PathBuf {
        PathBuf::from(&self.storage.data_dir).join(&self.storage.class_file)
    }

    pub fn question_store_path(&self) -> PathBuf {
        PathBuf::from(&self.storage.data_dir).join(&self.storage.question_file)
    }

    pub fn reel_geometry(&self) -> ReelGeometry {
        ReelGeometry {
            item_size: self.reel.item_size,
            viewport_height: self.reel.viewport_height,
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.reel.frame_interval_ms)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                data_dir: "data".to_string(),
                class_file: "class.json".to_string(),
                question_file: "question.json".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
            },
            reel: ReelConfig {
                item_size: 64.0,
                viewport_height: 160.0,
                frame_interval_ms: 16,
            },
            animation: AnimationConfig {
                group: ReelAnimationConfig::new(8000, [0.4, 0.0, 0.2, 1.0]),
                pool: ReelAnimationConfig::new(5000, [0.12, 0.0, 0.39, 0.0]),
                student: ReelAnimationConfig::new(3000, [0.33, 1.0, 0.68, 1.0]),
                question: ReelAnimationConfig::new(8000, [0.4, 0.0, 0.2, 1.0]),
            },
        }
    }
}
