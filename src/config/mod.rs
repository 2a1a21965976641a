//! Configuration management module
//!
//! This module handles loading and validation of application configuration
//! from defaults, config files and environment variables.

pub mod settings;
pub mod validation;

pub use settings::{Settings, StorageConfig, LoggingConfig, ReelConfig, AnimationConfig, ReelAnimationConfig};
