//! # promptlab-core
//!
//! Core types, configuration, and utilities for Promptlab.
//!
//! This crate provides shared functionality used across all Promptlab crates:
//!
//! - **Configuration**: Loading, validation, and persistence of `promptlab.json5`
//! - **Secrets**: [`SecretString`], a zeroize-on-drop string for API keys
//! - **Utilities**: Path resolution and environment handling

pub mod config;
pub mod env;
pub mod error;
pub mod paths;
pub mod secret;

// Re-exports for convenience
pub use config::Config;
pub use error::ConfigError;
pub use secret::SecretString;
