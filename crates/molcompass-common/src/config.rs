//! Configuration loading for Molecular Compass.
//! Reads molcompass.toml from the current directory or path in MOLCOMPASS_CONFIG env var.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub depiction: DepictionSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 3001 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Probability that a generated fragment gets a modifier group appended.
    #[serde(default = "default_mutation_probability")]
    pub mutation_probability: f64,
}

fn default_mutation_probability() -> f64 { 0.5 }

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self { mutation_probability: default_mutation_probability() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepictionSettings {
    #[serde(default = "default_canvas")]
    pub width: u32,
    #[serde(default = "default_canvas")]
    pub height: u32,
}

fn default_canvas() -> u32 { 400 }

impl Default for DepictionSettings {
    fn default() -> Self {
        Self { width: default_canvas(), height: default_canvas() }
    }
}

impl Config {
    /// Load configuration from molcompass.toml.
    /// Checks MOLCOMPASS_CONFIG env var first, then the current directory.
    /// A missing file is not an error: the demo runs fine on defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("MOLCOMPASS_CONFIG")
            .unwrap_or_else(|_| "molcompass.toml".to_string());

        if !Path::new(&path).exists() {
            debug!("No config file at {}, using defaults", path);
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        info!("Loaded configuration from {}", path);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_usable() {
        let config = Config::default();
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.depiction.width, 400);
        assert!(config.generator.mutation_probability >= 0.0);
        assert!(config.generator.mutation_probability <= 1.0);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[server]\nport = 8080\n").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.depiction.height, 400);
    }

    #[test]
    fn test_load_with_missing_file_falls_back_to_defaults() {
        std::env::set_var("MOLCOMPASS_CONFIG", "/nonexistent/molcompass-missing.toml");
        let config = Config::load().unwrap();
        std::env::remove_var("MOLCOMPASS_CONFIG");
        assert_eq!(config.server.port, default_port());
        assert_eq!(config.generator.mutation_probability, default_mutation_probability());
        assert_eq!(config.depiction.width, default_canvas());
    }

    #[test]
    fn test_empty_toml_is_all_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.host, default_host());
        assert_eq!(config.generator.mutation_probability, 0.5);
    }
}
