//! # Configuration System
//!
//! Centralized configuration management for the Ovation workspace.
//!
//! This crate provides:
//! - Configuration structures for the mirror store, the Hostware endpoint
//!   and observability
//! - Environment variable loading (12-factor app principles)
//! - Configuration file loading (TOML)
//! - Configuration validation via the `validator` crate

pub mod config;
pub mod file_loader;
pub mod loader;

pub use config::{Config, HostwareConfig, ObservabilityConfig, StorageConfig};
pub use file_loader::{ConfigFileError, load_from_file, load_from_toml};
pub use loader::load_from_env;
pub use validator::Validate;
