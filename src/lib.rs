//! LuckyDraw
//!
//! A classroom lucky-draw engine. Classes of student groups and sets of
//! questions are kept in JSON files; a draw spins synchronized looping reels
//! to pick a group, one of its students and a question, group by group.

pub mod config;
pub mod draw;
pub mod handlers;
pub mod models;
pub mod roster;
pub mod storage;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{LuckyDrawError, Result};

// Re-export main components for easy access
pub use draw::{PickAction, PickOrchestrator, PickOutcome, PickSession};
pub use storage::{JsonListStore, Library};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
