//! Shared utilities

pub mod error;
pub mod prompt;
pub mod validation;
