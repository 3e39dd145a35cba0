//! Synthesis session: one voice and output format, many synthesis calls.

use std::sync::Arc;

use tracing::{debug, info};

use super::config::{
    EDGE_TTS_URL, EDGE_VOICES_URL, MetadataOptions, OutputFormat, ProsodyOptions, infer_locale,
};
use super::connection::{ConnectionManager, Connector, WsConnector};
use super::request::{EdgeRequestBuilder, RandomRequestIds, RequestIdSource};
use super::stream::AudioStream;
use super::voices::{Voice, fetch_voices};
use crate::core::tts::base::{TTSError, TTSResult};

/// Endpoints a session talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeEndpoints {
    pub synthesis_url: String,
    pub voices_url: String,
}

impl Default for EdgeEndpoints {
    fn default() -> Self {
        Self {
            synthesis_url: EDGE_TTS_URL.to_string(),
            voices_url: EDGE_VOICES_URL.to_string(),
        }
    }
}

/// Client for the Edge read-aloud synthesis service.
///
/// A session fixes the voice, output format and metadata options at
/// construction. Every call to [`EdgeTTS::synthesize`] opens its own
/// connection and returns its own [`AudioStream`]; sessions share nothing.
///
/// # Example
///
/// ```rust,no_run
/// use readaloud::core::tts::edge::{EdgeTTS, OutputFormat, ProsodyOptions};
///
/// # async fn run() -> readaloud::core::tts::TTSResult<()> {
/// let tts = EdgeTTS::new(
///     "en-US-ChristopherNeural",
///     OutputFormat::Audio24Khz96KbitrateMonoMp3,
///     None,
/// )?;
///
/// let prosody = ProsodyOptions::new().with_rate("+10%");
/// let audio = tts.synthesize("Hello there", Some(prosody)).await?.collect_audio().await?;
/// println!("{} bytes of mp3", audio.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct EdgeTTS {
    output_format: OutputFormat,
    metadata: MetadataOptions,
    request: EdgeRequestBuilder,
    endpoints: EdgeEndpoints,
    connector: Arc<dyn Connector>,
    request_ids: Arc<dyn RequestIdSource>,
    http: reqwest::Client,
}

impl EdgeTTS {
    /// Creates a session.
    ///
    /// Fails with [`TTSError::LocaleInference`] when `metadata` carries no
    /// locale and none can be read from `voice_name`.
    pub fn new(
        voice_name: impl Into<String>,
        output_format: OutputFormat,
        metadata: Option<MetadataOptions>,
    ) -> TTSResult<Self> {
        let voice_name = voice_name.into();
        let metadata = metadata.unwrap_or_default();
        let voice_locale = infer_locale(&voice_name, metadata.voice_locale.as_deref())?;

        debug!(voice = %voice_name, locale = %voice_locale, format = %output_format, "Created TTS session");

        Ok(Self {
            output_format,
            metadata,
            request: EdgeRequestBuilder::new(voice_name, voice_locale),
            endpoints: EdgeEndpoints::default(),
            connector: Arc::new(WsConnector),
            request_ids: Arc::new(RandomRequestIds),
            http: reqwest::Client::new(),
        })
    }

    pub fn with_endpoints(mut self, endpoints: EdgeEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_connector(mut self, connector: Arc<dyn Connector>) -> Self {
        self.connector = connector;
        self
    }

    pub fn with_request_ids(mut self, request_ids: Arc<dyn RequestIdSource>) -> Self {
        self.request_ids = request_ids;
        self
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn voice_name(&self) -> &str {
        self.request.voice_name()
    }

    pub fn voice_locale(&self) -> &str {
        self.request.voice_locale()
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    pub fn metadata(&self) -> &MetadataOptions {
        &self.metadata
    }

    pub fn endpoints(&self) -> &EdgeEndpoints {
        &self.endpoints
    }

    /// Starts synthesizing `text`.
    ///
    /// Opens a connection, sends the `speech.config` handshake and then the
    /// SSML frame, and returns the stream of audio chunks. Connection and
    /// handshake failures are returned here as [`TTSError::Connection`];
    /// failures after that are delivered through the stream.
    pub async fn synthesize(
        &self,
        text: &str,
        prosody: Option<ProsodyOptions>,
    ) -> TTSResult<AudioStream> {
        let prosody = prosody.unwrap_or_default();
        let ssml = self.request.build_ssml(text, &prosody);
        let config_frame =
            EdgeRequestBuilder::build_config_frame(self.output_format, &self.metadata);

        let mut connection = ConnectionManager::open(
            self.connector.as_ref(),
            &self.endpoints.synthesis_url,
            config_frame,
        )
        .await?;

        let request_id = self.request_ids.next_id();
        let frame = EdgeRequestBuilder::build_synthesis_frame(&ssml, &request_id);
        if let Err(e) = connection.send(frame).await {
            connection.close().await;
            return Err(TTSError::Connection(format!(
                "failed to send synthesis request: {e}"
            )));
        }

        info!(
            request_id = %request_id,
            voice = %self.voice_name(),
            chars = text.chars().count(),
            "Synthesis request sent"
        );

        Ok(AudioStream::new(connection, request_id))
    }

    /// Lists catalog voices, optionally restricted to one exact locale.
    pub async fn list_voices(&self, locale: Option<&str>) -> TTSResult<Vec<Voice>> {
        fetch_voices(&self.http, &self.endpoints.voices_url, locale).await
    }
}

impl std::fmt::Debug for EdgeTTS {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdgeTTS")
            .field("voice_name", &self.voice_name())
            .field("voice_locale", &self.voice_locale())
            .field("output_format", &self.output_format)
            .field("metadata", &self.metadata)
            .field("endpoints", &self.endpoints)
            .finish()
    }
}
