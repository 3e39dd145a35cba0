//! Outbound frame construction for the read-aloud protocol.
//!
//! The client sends exactly two text frames per synthesis call:
//!
//! 1. a `speech.config` frame selecting the output format and metadata options
//! 2. an `ssml` frame carrying the request id and the SSML document
//!
//! Both follow the same grammar: `key:value` header lines separated by
//! `\r\n`, a blank line, then the body.

use rand::RngCore;
use serde_json::json;

use super::config::{HEADER_DELIMITER, MetadataOptions, OutputFormat, ProsodyOptions};

// =============================================================================
// Request Ids
// =============================================================================

/// Source of `X-RequestId` values.
///
/// Production code uses [`RandomRequestIds`]; tests substitute a
/// deterministic source to assert on exact frames.
pub trait RequestIdSource: Send + Sync {
    fn next_id(&self) -> String;
}

/// 16 bytes from the thread-local CSPRNG, hex encoded.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomRequestIds;

impl RequestIdSource for RandomRequestIds {
    fn next_id(&self) -> String {
        new_request_id()
    }
}

/// Generates a fresh request id: 32 lowercase hex characters.
pub fn new_request_id() -> String {
    let mut bytes = [0u8; 16];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

// =============================================================================
// Request Builder
// =============================================================================

/// Builds SSML documents and the two outbound wire frames.
#[derive(Debug, Clone)]
pub struct EdgeRequestBuilder {
    voice_name: String,
    voice_locale: String,
}

impl EdgeRequestBuilder {
    pub fn new(voice_name: impl Into<String>, voice_locale: impl Into<String>) -> Self {
        Self {
            voice_name: voice_name.into(),
            voice_locale: voice_locale.into(),
        }
    }

    pub fn voice_name(&self) -> &str {
        &self.voice_name
    }

    pub fn voice_locale(&self) -> &str {
        &self.voice_locale
    }

    /// Builds the `speech.config` handshake frame.
    ///
    /// The boundary flags are sent as the strings `"true"`/`"false"`, which is
    /// what the service expects.
    pub fn build_config_frame(output_format: OutputFormat, metadata: &MetadataOptions) -> String {
        let body = json!({
            "context": {
                "synthesis": {
                    "audio": {
                        "metadataoptions": {
                            "sentenceBoundaryEnabled": metadata.sentence_boundary_enabled.to_string(),
                            "wordBoundaryEnabled": metadata.word_boundary_enabled.to_string(),
                        },
                        "outputFormat": output_format.as_str(),
                    }
                }
            }
        });

        format!(
            "Content-Type:application/json; charset=utf-8\r\nPath:speech.config{HEADER_DELIMITER}{body}"
        )
    }

    /// Wraps `text` in a `<speak>`/`<voice>`/`<prosody>` document.
    ///
    /// The text is inserted verbatim. Callers that pass user input and want
    /// it read literally should run it through [`escape_xml`] first.
    pub fn build_ssml(&self, text: &str, prosody: &ProsodyOptions) -> String {
        format!(
            concat!(
                r#"<speak version="1.0" xmlns="http://www.w3.org/2001/10/synthesis" "#,
                r#"xmlns:mstts="https://www.w3.org/2001/mstts" xml:lang="{locale}">"#,
                r#"<voice name="{voice}">"#,
                r#"<prosody pitch="{pitch}" rate="{rate}" volume="{volume}">{text}</prosody>"#,
                r#"</voice></speak>"#
            ),
            locale = self.voice_locale,
            voice = self.voice_name,
            pitch = prosody.pitch(),
            rate = prosody.rate(),
            volume = prosody.volume(),
            text = text,
        )
    }

    /// Builds the `ssml` frame that starts a turn.
    pub fn build_synthesis_frame(ssml: &str, request_id: &str) -> String {
        format!(
            "X-RequestId:{request_id}\r\nContent-Type:application/ssml+xml\r\nPath:ssml{HEADER_DELIMITER}{ssml}"
        )
    }
}

/// Escape special XML characters.
///
/// Never applied automatically; SSML markup in synthesis text is passed
/// through to the service.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
