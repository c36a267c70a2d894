//! CLI module - command handlers for the entry point

pub mod commands;

pub use commands::{set_config, show_config};
