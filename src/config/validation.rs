//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{LuckyDrawError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_storage_config(&settings.storage)?;
    validate_logging_config(&settings.logging)?;
    validate_reel_config(&settings.reel)?;

    let animation = &settings.animation;
    validate_animation_config("group", &animation.group)?;
    validate_animation_config("pool", &animation.pool)?;
    validate_animation_config("student", &animation.student)?;
    validate_animation_config("question", &animation.question)?;

    Ok(())
}

/// Validate storage configuration
fn validate_storage_config(config: &super::StorageConfig) -> Result<()> {
    if config.data_dir.trim().is_empty() {
        return Err(LuckyDrawError::Config(
            "Data directory is required".to_string()
        ));
    }

    if config.class_file.trim().is_empty() || config.question_file.trim().is_empty() {
        return Err(LuckyDrawError::Config(
            "Class and question file names are required".to_string()
        ));
    }

    if config.class_file == config.question_file {
        return Err(LuckyDrawError::Config(
            "Class and question sets must be stored in different files".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(LuckyDrawError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(LuckyDrawError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}

/// Validate reel geometry
fn validate_reel_config(config: &super::ReelConfig) -> Result<()> {
    if !(config.item_size > 0.0) || !(config.viewport_height > 0.0) {
        return Err(LuckyDrawError::Config(
            "Reel item size and viewport height must be greater than 0".to_string()
        ));
    }

    // The item just below the top one must be the first to reach the center line,
    // and one trailing item past a landing must fill the lower half of the viewport.
    if config.viewport_height <= config.item_size || config.viewport_height > 3.0 * config.item_size {
        return Err(LuckyDrawError::Config(format!(
            "Reel viewport height {} must be above the item size {} and at most three times it",
            config.viewport_height, config.item_size
        )));
    }

    if config.frame_interval_ms == 0 {
        return Err(LuckyDrawError::Config(
            "Frame interval must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate one reel's animation tuning
fn validate_animation_config(reel: &str, config: &super::ReelAnimationConfig) -> Result<()> {
    if config.duration_ms == 0 {
        return Err(LuckyDrawError::Config(
            format!("Animation duration for the {} reel must be greater than 0", reel)
        ));
    }

    let [x1, _, x2, _] = config.easing;
    if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
        return Err(LuckyDrawError::Config(
            format!("Easing x control points for the {} reel must lie in [0, 1]", reel)
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(validate_settings(&Settings::default()).is_ok());
    }

    #[test]
    fn test_rejects_viewport_outside_item_bounds() {
        let mut settings = Settings::default();
        settings.reel.viewport_height = settings.reel.item_size * 4.0;
        assert!(validate_settings(&settings).is_err());

        settings.reel.viewport_height = settings.reel.item_size;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_rejects_bad_level_and_easing() {
        let mut settings = Settings::default();
        settings.logging.level = "loud".to_string();
        assert!(validate_settings(&settings).is_err());

        let mut settings = Settings::default();
        settings.animation.pool.easing = [1.5, 0.0, 0.2, 1.0];
        assert!(validate_settings(&settings).is_err());

        let mut settings = Settings::default();
        settings.animation.question.duration_ms = 0;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_rejects_shared_store_file() {
        let mut settings = Settings::default();
        settings.storage.question_file = settings.storage.class_file.clone();
        assert!(validate_settings(&settings).is_err());
    }
}
