//! Test helpers module
//!
//! Shared setup for the integration tests.

pub mod test_context;

pub use test_context::*;
