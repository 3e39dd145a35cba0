//! Configuration types for the Edge read-aloud synthesis service.
//!
//! This module contains:
//! - Endpoint constants and the public trusted-client token
//! - The closed set of output formats and their file extensions
//! - Prosody and metadata option objects with their defaults
//! - Voice locale inference from voice names

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::tts::base::{TTSError, TTSResult};

macro_rules! trusted_client_token {
    () => {
        "6A5AA1D4EAFF4E9FB37E23D68491D6F4"
    };
}

/// Public token the read-aloud endpoints expect on every request.
///
/// It is identical for all clients and is not a secret.
pub const TRUSTED_CLIENT_TOKEN: &str = trusted_client_token!();

/// WebSocket endpoint used for synthesis.
pub const EDGE_TTS_URL: &str = concat!(
    "wss://speech.platform.bing.com/consumer/speech/synthesize/readaloud/edge/v1?TrustedClientToken=",
    trusted_client_token!()
);

/// HTTP endpoint serving the static voice catalog.
pub const EDGE_VOICES_URL: &str = concat!(
    "https://speech.platform.bing.com/consumer/speech/synthesize/readaloud/voices/list?trustedclienttoken=",
    trusted_client_token!()
);

/// Separates a frame's header block from its body.
pub const HEADER_DELIMITER: &str = "\r\n\r\n";

/// Marker that precedes the binary payload of an audio frame.
pub const AUDIO_MARKER: &[u8] = b"Path:audio\r\n";

pub const DEFAULT_VOLUME: &str = "medium";
pub const DEFAULT_PITCH: &str = "+0%";
pub const DEFAULT_RATE: &str = "+0%";

static VOICE_LOCALE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z]{2}-[A-Za-z]{2}").expect("locale pattern is valid"));

// =============================================================================
// Output Format
// =============================================================================

/// Audio output formats accepted by the synthesis service.
///
/// The service only understands these 18 literals. Each one maps to exactly
/// one file extension.
///
/// # Example
///
/// ```rust
/// use readaloud::core::tts::edge::OutputFormat;
///
/// let format = OutputFormat::Audio24Khz96KbitrateMonoMp3;
/// assert_eq!(format.as_str(), "audio-24khz-96kbitrate-mono-mp3");
/// assert_eq!(format.extension(), "mp3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum OutputFormat {
    // MP3
    Audio16Khz32KbitrateMonoMp3,
    Audio16Khz64KbitrateMonoMp3,
    Audio16Khz128KbitrateMonoMp3,
    Audio24Khz48KbitrateMonoMp3,
    #[default]
    Audio24Khz96KbitrateMonoMp3,
    Audio24Khz160KbitrateMonoMp3,
    Audio48Khz96KbitrateMonoMp3,
    Audio48Khz192KbitrateMonoMp3,
    // Raw PCM
    Raw16Khz16BitMonoPcm,
    Raw24Khz16BitMonoPcm,
    Raw48Khz16BitMonoPcm,
    // Telephony
    Raw8Khz8BitMonoMulaw,
    Raw8Khz8BitMonoAlaw,
    // WebM / Opus
    Webm16Khz16BitMonoOpus,
    Webm24Khz16BitMonoOpus,
    // Ogg / Opus
    Ogg16Khz16BitMonoOpus,
    Ogg24Khz16BitMonoOpus,
    Ogg48Khz16BitMonoOpus,
}

impl OutputFormat {
    /// Every supported format, in catalog order.
    pub const ALL: [OutputFormat; 18] = [
        Self::Audio16Khz32KbitrateMonoMp3,
        Self::Audio16Khz64KbitrateMonoMp3,
        Self::Audio16Khz128KbitrateMonoMp3,
        Self::Audio24Khz48KbitrateMonoMp3,
        Self::Audio24Khz96KbitrateMonoMp3,
        Self::Audio24Khz160KbitrateMonoMp3,
        Self::Audio48Khz96KbitrateMonoMp3,
        Self::Audio48Khz192KbitrateMonoMp3,
        Self::Raw16Khz16BitMonoPcm,
        Self::Raw24Khz16BitMonoPcm,
        Self::Raw48Khz16BitMonoPcm,
        Self::Raw8Khz8BitMonoMulaw,
        Self::Raw8Khz8BitMonoAlaw,
        Self::Webm16Khz16BitMonoOpus,
        Self::Webm24Khz16BitMonoOpus,
        Self::Ogg16Khz16BitMonoOpus,
        Self::Ogg24Khz16BitMonoOpus,
        Self::Ogg48Khz16BitMonoOpus,
    ];

    /// Returns the literal the service expects in the `speech.config` frame.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Audio16Khz32KbitrateMonoMp3 => "audio-16khz-32kbitrate-mono-mp3",
            Self::Audio16Khz64KbitrateMonoMp3 => "audio-16khz-64kbitrate-mono-mp3",
            Self::Audio16Khz128KbitrateMonoMp3 => "audio-16khz-128kbitrate-mono-mp3",
            Self::Audio24Khz48KbitrateMonoMp3 => "audio-24khz-48kbitrate-mono-mp3",
            Self::Audio24Khz96KbitrateMonoMp3 => "audio-24khz-96kbitrate-mono-mp3",
            Self::Audio24Khz160KbitrateMonoMp3 => "audio-24khz-160kbitrate-mono-mp3",
            Self::Audio48Khz96KbitrateMonoMp3 => "audio-48khz-96kbitrate-mono-mp3",
            Self::Audio48Khz192KbitrateMonoMp3 => "audio-48khz-192kbitrate-mono-mp3",
            Self::Raw16Khz16BitMonoPcm => "raw-16khz-16bit-mono-pcm",
            Self::Raw24Khz16BitMonoPcm => "raw-24khz-16bit-mono-pcm",
            Self::Raw48Khz16BitMonoPcm => "raw-48khz-16bit-mono-pcm",
            Self::Raw8Khz8BitMonoMulaw => "raw-8khz-8bit-mono-mulaw",
            Self::Raw8Khz8BitMonoAlaw => "raw-8khz-8bit-mono-alaw",
            Self::Webm16Khz16BitMonoOpus => "webm-16khz-16bit-mono-opus",
            Self::Webm24Khz16BitMonoOpus => "webm-24khz-16bit-mono-opus",
            Self::Ogg16Khz16BitMonoOpus => "ogg-16khz-16bit-mono-opus",
            Self::Ogg24Khz16BitMonoOpus => "ogg-24khz-16bit-mono-opus",
            Self::Ogg48Khz16BitMonoOpus => "ogg-48khz-16bit-mono-opus",
        }
    }

    /// Returns the file extension for audio produced in this format.
    ///
    /// ```rust
    /// use readaloud::core::tts::edge::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::Raw16Khz16BitMonoPcm.extension(), "pcm");
    /// assert_eq!(OutputFormat::Ogg48Khz16BitMonoOpus.extension(), "ogg");
    /// ```
    #[inline]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Audio16Khz32KbitrateMonoMp3
            | Self::Audio16Khz64KbitrateMonoMp3
            | Self::Audio16Khz128KbitrateMonoMp3
            | Self::Audio24Khz48KbitrateMonoMp3
            | Self::Audio24Khz96KbitrateMonoMp3
            | Self::Audio24Khz160KbitrateMonoMp3
            | Self::Audio48Khz96KbitrateMonoMp3
            | Self::Audio48Khz192KbitrateMonoMp3 => "mp3",
            Self::Raw16Khz16BitMonoPcm | Self::Raw24Khz16BitMonoPcm | Self::Raw48Khz16BitMonoPcm => {
                "pcm"
            }
            Self::Raw8Khz8BitMonoMulaw => "mulaw",
            Self::Raw8Khz8BitMonoAlaw => "alaw",
            Self::Webm16Khz16BitMonoOpus | Self::Webm24Khz16BitMonoOpus => "webm",
            Self::Ogg16Khz16BitMonoOpus
            | Self::Ogg24Khz16BitMonoOpus
            | Self::Ogg48Khz16BitMonoOpus => "ogg",
        }
    }

    /// Returns the MIME type used when serving this audio over HTTP.
    #[inline]
    pub fn content_type(&self) -> &'static str {
        match self.extension() {
            "mp3" => "audio/mpeg",
            "pcm" => "audio/pcm",
            "mulaw" => "audio/basic",
            "alaw" => "audio/alaw",
            "webm" => "audio/webm",
            _ => "audio/ogg",
        }
    }

    /// Returns the sample rate in Hz.
    #[inline]
    pub fn sample_rate(&self) -> u32 {
        match self {
            Self::Raw8Khz8BitMonoMulaw | Self::Raw8Khz8BitMonoAlaw => 8000,

            Self::Audio16Khz32KbitrateMonoMp3
            | Self::Audio16Khz64KbitrateMonoMp3
            | Self::Audio16Khz128KbitrateMonoMp3
            | Self::Raw16Khz16BitMonoPcm
            | Self::Webm16Khz16BitMonoOpus
            | Self::Ogg16Khz16BitMonoOpus => 16000,

            Self::Audio24Khz48KbitrateMonoMp3
            | Self::Audio24Khz96KbitrateMonoMp3
            | Self::Audio24Khz160KbitrateMonoMp3
            | Self::Raw24Khz16BitMonoPcm
            | Self::Webm24Khz16BitMonoOpus
            | Self::Ogg24Khz16BitMonoOpus => 24000,

            Self::Audio48Khz96KbitrateMonoMp3
            | Self::Audio48Khz192KbitrateMonoMp3
            | Self::Raw48Khz16BitMonoPcm
            | Self::Ogg48Khz16BitMonoOpus => 48000,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = TTSError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == wanted)
            .ok_or_else(|| TTSError::UnsupportedFormat(s.to_string()))
    }
}

impl TryFrom<String> for OutputFormat {
    type Error = TTSError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OutputFormat> for &'static str {
    fn from(format: OutputFormat) -> Self {
        format.as_str()
    }
}

// =============================================================================
// Prosody
// =============================================================================

/// Caller-supplied prosody settings.
///
/// Every field is optional; unset fields fall back to the service defaults
/// (`volume="medium"`, `pitch="+0%"`, `rate="+0%"`) one field at a time. The
/// values are passed through untouched, so anything the service grammar
/// accepts (`"x-loud"`, `"-20%"`, `"+5Hz"`) works and anything it rejects is
/// rejected remotely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProsodyOptions {
    pub volume: Option<String>,
    pub pitch: Option<String>,
    pub rate: Option<String>,
}

impl ProsodyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_volume(mut self, volume: impl Into<String>) -> Self {
        self.volume = Some(volume.into());
        self
    }

    pub fn with_pitch(mut self, pitch: impl Into<String>) -> Self {
        self.pitch = Some(pitch.into());
        self
    }

    pub fn with_rate(mut self, rate: impl Into<String>) -> Self {
        self.rate = Some(rate.into());
        self
    }

    /// Effective volume after applying the default.
    #[inline]
    pub fn volume(&self) -> &str {
        self.volume.as_deref().unwrap_or(DEFAULT_VOLUME)
    }

    /// Effective pitch after applying the default.
    #[inline]
    pub fn pitch(&self) -> &str {
        self.pitch.as_deref().unwrap_or(DEFAULT_PITCH)
    }

    /// Effective rate after applying the default.
    #[inline]
    pub fn rate(&self) -> &str {
        self.rate.as_deref().unwrap_or(DEFAULT_RATE)
    }
}

// =============================================================================
// Metadata
// =============================================================================

/// Session-level options sent in the `speech.config` handshake.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataOptions {
    /// Locale for the SSML root. Inferred from the voice name when absent.
    pub voice_locale: Option<String>,
    /// Ask the service for sentence boundary metadata frames.
    pub sentence_boundary_enabled: bool,
    /// Ask the service for word boundary metadata frames.
    pub word_boundary_enabled: bool,
}

impl MetadataOptions {
    pub fn with_voice_locale(mut self, locale: impl Into<String>) -> Self {
        self.voice_locale = Some(locale.into());
        self
    }
}

// =============================================================================
// Locale Inference
// =============================================================================

/// Resolves the locale used in the SSML `xml:lang` attribute.
///
/// An explicit locale always wins. Otherwise the first `xx-YY` run in the
/// voice name is used.
///
/// ```rust
/// use readaloud::core::tts::edge::infer_locale;
///
/// assert_eq!(infer_locale("en-US-ChristopherNeural", None).unwrap(), "en-US");
/// assert_eq!(infer_locale("Narrator", Some("fr-FR")).unwrap(), "fr-FR");
/// assert!(infer_locale("Narrator", None).is_err());
/// ```
pub fn infer_locale(voice_name: &str, explicit_locale: Option<&str>) -> TTSResult<String> {
    if let Some(locale) = explicit_locale.filter(|l| !l.is_empty()) {
        return Ok(locale.to_string());
    }

    VOICE_LOCALE_PATTERN
        .find(voice_name)
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| TTSError::LocaleInference {
            voice_name: voice_name.to_string(),
        })
}
