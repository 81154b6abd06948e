//! Utility functions for string formatting and manipulation.

pub mod format;

pub use format::{avatar_letter, truncate_string};
