//! Voice catalog served by the read-aloud HTTP endpoint.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::tts::base::{TTSError, TTSResult};

/// Descriptive tags attached to some catalog entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VoiceTag {
    pub content_categories: Vec<String>,
    pub voice_personalities: Vec<String>,
}

/// One catalog entry, exactly as the service describes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Voice {
    pub name: String,
    pub short_name: String,
    pub gender: String,
    pub locale: String,
    pub suggested_codec: String,
    pub friendly_name: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_tag: Option<VoiceTag>,
}

/// Catalog entry as exposed over HTTP, without `Name`, `FriendlyName` and
/// `VoiceTag`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PublicVoice {
    pub short_name: String,
    pub gender: String,
    pub locale: String,
    pub suggested_codec: String,
    pub status: String,
}

impl From<Voice> for PublicVoice {
    fn from(voice: Voice) -> Self {
        Self {
            short_name: voice.short_name,
            gender: voice.gender,
            locale: voice.locale,
            suggested_codec: voice.suggested_codec,
            status: voice.status,
        }
    }
}

/// Keeps only voices whose locale equals `locale` exactly.
pub fn filter_by_locale(voices: Vec<Voice>, locale: Option<&str>) -> Vec<Voice> {
    match locale {
        Some(locale) => voices.into_iter().filter(|v| v.locale == locale).collect(),
        None => voices,
    }
}

/// Fetches the catalog with one GET and applies the optional locale filter.
///
/// A non-2xx response becomes [`TTSError::CatalogFetch`] carrying the status
/// code. Send and decode failures become [`TTSError::CatalogRequest`].
pub async fn fetch_voices(
    client: &reqwest::Client,
    url: &str,
    locale: Option<&str>,
) -> TTSResult<Vec<Voice>> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| TTSError::CatalogRequest(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        warn!(status = status.as_u16(), "Voice catalog request failed");
        return Err(TTSError::CatalogFetch {
            status: status.as_u16(),
        });
    }

    let voices: Vec<Voice> = response
        .json()
        .await
        .map_err(|e| TTSError::CatalogRequest(format!("invalid catalog body: {e}")))?;

    let total = voices.len();
    let voices = filter_by_locale(voices, locale);
    debug!(total, kept = voices.len(), ?locale, "Fetched voice catalog");
    Ok(voices)
}
