//! Error handling for LuckyDraw
//!
//! This module defines the main error type used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for the LuckyDraw application
#[derive(Error, Debug)]
pub enum LuckyDrawError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration loading error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid roster text: {0}")]
    InvalidRoster(String),

    #[error("Cannot pick from an empty {what}")]
    EmptyList { what: &'static str },

    #[error("{what} index {index} out of range (len {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Not drawable: {0}")]
    NotDrawable(String),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("A draw is already in progress")]
    DrawInProgress,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for LuckyDraw operations
pub type Result<T> = std::result::Result<T, LuckyDrawError>;

impl LuckyDrawError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            LuckyDrawError::Config(_) => false,
            LuckyDrawError::ConfigLoad(_) => false,
            LuckyDrawError::Serialization(_) => false,
            LuckyDrawError::Io(_) => true,
            LuckyDrawError::InvalidRoster(_) => true,
            LuckyDrawError::EmptyList { .. } => false,
            LuckyDrawError::IndexOutOfRange { .. } => true,
            LuckyDrawError::NotDrawable(_) => true,
            LuckyDrawError::InvalidStateTransition { .. } => true,
            LuckyDrawError::DrawInProgress => true,
            LuckyDrawError::InvalidInput(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            LuckyDrawError::Config(_) => ErrorSeverity::Critical,
            LuckyDrawError::ConfigLoad(_) => ErrorSeverity::Critical,
            LuckyDrawError::Serialization(_) => ErrorSeverity::Critical,
            LuckyDrawError::EmptyList { .. } => ErrorSeverity::Error,
            LuckyDrawError::DrawInProgress => ErrorSeverity::Warning,
            LuckyDrawError::InvalidStateTransition { .. } => ErrorSeverity::Warning,
            LuckyDrawError::InvalidRoster(_) => ErrorSeverity::Info,
            LuckyDrawError::InvalidInput(_) => ErrorSeverity::Info,
            LuckyDrawError::IndexOutOfRange { .. } => ErrorSeverity::Info,
            LuckyDrawError::NotDrawable(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
