pub mod commands;
pub mod config;
pub mod credentials;
pub mod error;
pub mod naming;
pub mod package;
pub mod profile;
pub mod project;
pub mod store;
pub mod weights;

pub use commands::{AddOutcome, ModelCommands};
pub use error::{ObjectStoreError, Result, VsdkxError};
