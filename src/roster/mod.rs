//! Roster text format
//!
//! Converts pasted class roster text into groups and back.

pub mod parser;

pub use parser::{
    parse_groups, parse_group, is_valid_groups, is_valid_group,
    format_group, format_groups, normalize_tabs,
};
