//! Google Chat Desktop core library
//!
//! Shared types, errors, configuration and window placement persistence.

pub mod config;
pub mod error;
pub mod placement;
pub mod types;

pub use config::ShellConfig;
pub use error::{ShellError, ShellResult};
pub use types::TrayIconState;
