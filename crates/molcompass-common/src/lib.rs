//! molcompass-common — Shared types, errors, and configuration used across
//! all Molecular Compass crates.

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::{Config, DepictionSettings, GeneratorConfig, ServerConfig};
pub use error::{CompassError, Result};
