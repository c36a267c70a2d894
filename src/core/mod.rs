//! Core module - shared infrastructure for Speedwatch
//!
//! This module contains foundational types, configuration, and error handling
//! used throughout the application.

pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, LogLevel};
pub use error::{Result, WatchError};
pub use types::*;
