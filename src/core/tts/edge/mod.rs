//! Edge read-aloud neural text-to-speech client.
//!
//! # Protocol overview
//!
//! Each synthesis call uses its own WebSocket connection:
//!
//! 1. connect to [`EDGE_TTS_URL`]
//! 2. send a `speech.config` text frame choosing the [`OutputFormat`]
//! 3. send an `ssml` text frame with a fresh `X-RequestId`
//! 4. read `turn.start`, any number of binary `audio` frames, then `turn.end`
//!
//! Frames are `key:value` header lines, a blank line, then the body. Binary
//! audio frames carry `Path:audio\r\n` immediately followed by encoded audio.
//!
//! # Module layout
//!
//! - [`config`]: endpoints, output formats, prosody and metadata options
//! - [`request`]: outbound frame and SSML construction
//! - [`connection`]: transport seams and the WebSocket implementation
//! - [`frames`]: inbound frame classification state machine
//! - [`stream`]: the pull-based [`AudioStream`]
//! - [`session`]: [`EdgeTTS`], the public entry point
//! - [`voices`]: the voice catalog

pub mod config;
pub mod connection;
pub mod frames;
pub mod request;
pub mod session;
pub mod stream;
pub mod voices;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{
    AUDIO_MARKER, DEFAULT_PITCH, DEFAULT_RATE, DEFAULT_VOLUME, EDGE_TTS_URL, EDGE_VOICES_URL,
    HEADER_DELIMITER, MetadataOptions, OutputFormat, ProsodyOptions, TRUSTED_CLIENT_TOKEN,
    infer_locale,
};
pub use connection::{ConnectionManager, Connector, SpeechTransport, WsConnector, WsTransport};
pub use frames::{Frame, FrameHeader, FrameParser, ParseEvent, ParserState};
pub use request::{
    EdgeRequestBuilder, RandomRequestIds, RequestIdSource, escape_xml, new_request_id,
};
pub use session::{EdgeEndpoints, EdgeTTS};
pub use stream::AudioStream;
pub use voices::{PublicVoice, Voice, VoiceTag, fetch_voices, filter_by_locale};
