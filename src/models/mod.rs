//! Data models module
//!
//! This module contains all data structures persisted by the application

pub mod class;
pub mod question_set;

// Re-export commonly used models
pub use class::{Class, Group, Student, all_students};
pub use question_set::{QuestionSet, Question, parse_questions};
