//! Core domain types and logic.

pub mod field;
pub mod snapshot;
pub mod rule;
pub mod engine;
pub mod validation;
pub mod format;
pub mod form;
pub mod settings;
pub mod config_validation;
pub mod error;
