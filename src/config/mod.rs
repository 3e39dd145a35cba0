//! Configuration module for the readaloud server
//!
//! This module handles server configuration from two sources: YAML files and
//! environment variables. The configuration is split into logical submodules.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable loading
//! - `merge`: Merging YAML and environment configurations
//! - `validation`: Configuration validation logic
//! - `utils`: Utility functions for configuration parsing
//!
//! # Example
//! ```rust,no_run
//! use readaloud::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from YAML file, falling back to environment variables
//! let config_path = PathBuf::from("config.yaml");
//! let config = ServerConfig::from_file(&config_path)?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use crate::core::tts::edge::{EDGE_TTS_URL, EDGE_VOICES_URL, EdgeEndpoints, OutputFormat};

mod env;
mod merge;
mod utils;
mod validation;
mod yaml;

pub use utils::locale_filter;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_VOICE: &str = "en-US-ChristopherNeural";
pub const DEFAULT_VOICES_LOCALE: &str = "en-US";

/// Locale filter value that disables filtering on `GET /voices`.
pub const ALL_LOCALES: &str = "all";

/// Server configuration
///
/// Contains all configuration needed to run the readaloud server:
/// - Server settings (host, port)
/// - Synthesis defaults (voice, output format)
/// - Voice catalog default locale filter
/// - Service endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    // Synthesis defaults
    pub default_voice: String,
    pub output_format: OutputFormat,
    pub voices_locale: String,

    // Service endpoints
    pub synthesis_url: String,
    pub voices_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            default_voice: DEFAULT_VOICE.to_string(),
            output_format: OutputFormat::default(),
            voices_locale: DEFAULT_VOICES_LOCALE.to_string(),
            synthesis_url: EDGE_TTS_URL.to_string(),
            voices_url: EDGE_VOICES_URL.to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a YAML file with environment variable fallback
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables
    /// 3. Default values
    ///
    /// After loading and merging, performs validation on the final configuration.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - Environment variables have invalid formats
    /// - Configuration validation fails
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        // The YAML file is the source of truth here; .env is not loaded.
        let yaml_config = yaml::YamlConfig::from_file(path)?;
        let config = merge::merge_config(Some(yaml_config))?;
        validation::validate_endpoints(&config.synthesis_url, &config.voices_url)?;
        Ok(config)
    }

    /// Get the server address as a string
    ///
    /// Returns the address in the format "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Endpoints handed to every [`EdgeTTS`](crate::core::tts::EdgeTTS) session.
    pub fn edge_endpoints(&self) -> EdgeEndpoints {
        EdgeEndpoints {
            synthesis_url: self.synthesis_url.clone(),
            voices_url: self.voices_url.clone(),
        }
    }

    /// Default catalog filter, or `None` when filtering is disabled.
    pub fn voices_locale_filter(&self) -> Option<&str> {
        utils::locale_filter(&self.voices_locale)
    }
}
