//! Storage module
//!
//! JSON file stores and the library of classes and question sets

pub mod json_store;
pub mod library;

pub use json_store::JsonListStore;
pub use library::{Library, LibraryEvent};
