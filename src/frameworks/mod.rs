// Frameworks layer: process bootstrap and configuration.

pub mod config;
pub mod runtime;

pub use config::{ConfigError, RuntimeConfig};
