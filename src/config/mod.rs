//! Configuration module for vsdkx-model
//!
//! Loads config from `$XDG_CONFIG_HOME/vsdkx/config.toml` or `~/.config/vsdkx/config.toml`.
//! Falls back to built-in defaults if the file doesn't exist.
//! Partial configs are merged with defaults using serde's default attributes.
//!
//! # Example
//!
//! ```no_run
//! use vsdkx_model::config::Config;
//!
//! let config = Config::load(None).expect("Failed to load config");
//! println!("pip program: {}", config.package_manager.program);
//! ```

pub mod schema;

pub use schema::{Config, MissingKeyPolicy};
