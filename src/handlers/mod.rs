//! Command line handlers
//!
//! Parses `lucky-draw` arguments into a [`Command`] and runs it against the
//! library. Handlers write to any async writer and the draw handler reads
//! its key presses from any async line reader.

pub mod commands;

// Re-export commonly used handler items
pub use commands::{handle_command, Command, USAGE};
