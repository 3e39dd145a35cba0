//! # TTS Base Types
//!
//! Shared error and result types for the synthesis client. Every fallible
//! operation in `core::tts` returns a [`TTSResult`], so callers only need to
//! match on one error enum regardless of whether the failure happened while
//! building a session, opening the socket, streaming audio, or fetching the
//! voice catalog.
//!
//! ## Error taxonomy
//!
//! | Variant | When | Recoverable |
//! |---------|------|-------------|
//! | `LocaleInference` | session construction | no, the caller must pass a locale |
//! | `Connection` | socket failed to open or the handshake failed | retry with a new call |
//! | `Stream` | transport failure after the stream started | retry with a new call |
//! | `CatalogFetch` | voice catalog answered with a non-2xx status | independent of synthesis |
//! | `CatalogRequest` | voice catalog request could not be sent or decoded | independent of synthesis |
//! | `UnsupportedFormat` | an output format literal is not one of the 18 known ones | no |

use bytes::Bytes;

/// One ordered piece of encoded audio as received from the service.
///
/// Chunks are handed to the consumer exactly as they arrived; they are never
/// merged or reordered.
pub type AudioChunk = Bytes;

/// TTS-specific error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TTSError {
    #[error(
        "Could not infer voice locale from voice name '{voice_name}', and no voice locale was specified"
    )]
    LocaleInference { voice_name: String },

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Failed to fetch voices: {status}")]
    CatalogFetch { status: u16 },

    #[error("Voice catalog request failed: {0}")]
    CatalogRequest(String),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

impl TTSError {
    /// Returns true for errors raised while building a session or request,
    /// before any network activity took place.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            TTSError::LocaleInference { .. } | TTSError::UnsupportedFormat(_)
        )
    }
}

/// Result type for TTS operations
pub type TTSResult<T> = Result<T, TTSError>;
