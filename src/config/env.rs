use super::ServerConfig;
use super::merge::merge_config;
use super::validation::validate_endpoints;

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// Reads configuration from environment variables, with sensible defaults.
    /// Also loads from .env file if present using dotenvy.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `HOST` | `0.0.0.0` |
    /// | `PORT` | `3001` |
    /// | `TTS_DEFAULT_VOICE` | `en-US-ChristopherNeural` |
    /// | `TTS_OUTPUT_FORMAT` | `audio-24khz-96kbitrate-mono-mp3` |
    /// | `TTS_VOICES_LOCALE` | `en-US` (`all` disables filtering) |
    /// | `TTS_SYNTHESIS_URL` | public read-aloud WebSocket endpoint |
    /// | `TTS_VOICES_URL` | public read-aloud voice list endpoint |
    ///
    /// # Errors
    /// Returns an error if:
    /// - `PORT` is not a valid port number
    /// - `TTS_OUTPUT_FORMAT` is not a supported format
    /// - Either endpoint URL is malformed or uses the wrong scheme
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        let config = merge_config(None)?;
        validate_endpoints(&config.synthesis_url, &config.voices_url)?;

        Ok(config)
    }
}
