//! Concrete adapter implementations for ports.

pub mod csv_edit_adapter;
pub mod file_config_adapter;
