use axum::{
    body::Body,
    extract::{State, rejection::JsonRejection},
    http::{HeaderName, StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::core::tts::{OutputFormat, ProsodyOptions};
use crate::errors::{AppError, AppResult};
use crate::state::AppState;

/// Response header carrying the file extension of the audio body
pub const AUDIO_EXTENSION_HEADER: HeaderName = HeaderName::from_static("x-audio-extension");

/// Request body for `POST /tts`
///
/// `text` is kept as a raw JSON value so that a missing or non-string value
/// gets the same 400 response as an empty one. Whitespace-only text is
/// passed through to the service.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TtsRequest {
    pub text: Option<Value>,
    pub voice: Option<String>,
    pub rate: Option<String>,
    pub pitch: Option<String>,
    pub volume: Option<String>,
    pub format: Option<String>,
}

impl TtsRequest {
    fn text(&self) -> AppResult<&str> {
        match self.text.as_ref().and_then(Value::as_str) {
            Some(text) if !text.is_empty() => Ok(text),
            _ => Err(AppError::BadRequest("Text is required".to_string())),
        }
    }

    fn prosody(&self) -> ProsodyOptions {
        ProsodyOptions {
            volume: self.volume.clone(),
            pitch: self.pitch.clone(),
            rate: self.rate.clone(),
        }
    }
}

/// Text-to-speech handler
///
/// Synthesizes `text` and streams the audio back as it arrives.
pub async fn tts_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TtsRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let text = request.text()?;
    let voice = request
        .voice
        .as_deref()
        .filter(|v| !v.is_empty())
        .unwrap_or(state.config.default_voice.as_str());
    let format = match request.format.as_deref() {
        Some(format) => format.parse::<OutputFormat>()?,
        None => state.config.output_format,
    };

    info!(
        voice = %voice,
        format = %format,
        chars = text.chars().count(),
        "TTS request received"
    );

    let session = state.tts_session(voice, format)?;
    let stream = session.synthesize(text, Some(request.prosody())).await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, format.content_type()),
            (AUDIO_EXTENSION_HEADER, format.extension()),
        ],
        Body::from_stream(stream.into_stream()),
    )
        .into_response())
}
