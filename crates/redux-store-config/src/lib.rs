//! Configuration for redux-store
//!
//! This crate provides:
//! - Configuration file discovery (TOML)
//! - Store configuration (`StoreConfig`, `LoggingConfig`)
//! - Typed configuration errors

pub mod config_file;
pub mod error;
pub mod store_config;

pub use config_file::{config_candidates, load_config_file, read_first, CONFIG_FILE};
pub use error::ConfigError;
pub use store_config::{LoggingConfig, StoreConfig};
