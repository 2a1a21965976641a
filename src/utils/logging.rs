//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the LuckyDraw application.

use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::utils::errors::{LuckyDrawError, Result};

/// Initialize logging based on configuration
///
/// The returned guard flushes the file writer and must live as long as the
/// application.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .map_err(|e| LuckyDrawError::Config(format!("Invalid log filter: {}", e)))?;

    let (file_layer, guard) = match &config.file_path {
        Some(path) => {
            let file_appender = tracing_appender::rolling::daily(path, "lucky-draw.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .map_err(|e| LuckyDrawError::Config(format!("Logging already initialized: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log a change to the persisted class or question set lists
pub fn log_library_change(collection: &str, action: &str, index: Option<usize>, name: Option<&str>) {
    info!(
        collection = collection,
        action = action,
        index = index,
        name = name,
        "Library changed"
    );
}

/// Log a pick orchestrator event
pub fn log_pick_event(event: &str, picked_count: u32, details: Option<&str>) {
    info!(
        event = event,
        picked_count = picked_count,
        details = details,
        "Pick event"
    );
}

/// Log a reel coming to rest on an item
pub fn log_reel_settled(reel: &str, logical_index: usize, text: &str) {
    debug!(
        reel = reel,
        logical_index = logical_index,
        text = text,
        "Reel settled"
    );
}

/// Log a rejected user action
pub fn log_rejected_action(action: &str, reason: &str) {
    warn!(action = action, reason = reason, "Action rejected");
}
