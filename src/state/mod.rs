use std::sync::Arc;

use crate::config::ServerConfig;
use crate::core::tts::{EdgeTTS, MetadataOptions, OutputFormat, TTSResult};

/// Application state that can be shared across handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: ServerConfig,
    /// Shared HTTP client for voice catalog requests
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            http: reqwest::Client::new(),
        })
    }

    /// Creates a synthesis session pointed at the configured endpoints.
    pub fn tts_session(&self, voice: &str, output_format: OutputFormat) -> TTSResult<EdgeTTS> {
        Ok(
            EdgeTTS::new(voice, output_format, Some(MetadataOptions::default()))?
                .with_endpoints(self.config.edge_endpoints())
                .with_http_client(self.http.clone()),
        )
    }
}
