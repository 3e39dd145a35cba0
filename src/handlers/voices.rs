use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::config::locale_filter;
use crate::core::tts::edge::{PublicVoice, fetch_voices};
use crate::errors::AppResult;
use crate::state::AppState;

/// Query parameters for `GET /voices`
#[derive(Debug, Default, Deserialize)]
pub struct VoicesQuery {
    /// Exact locale to keep, e.g. `en-GB`. `all` disables filtering.
    pub locale: Option<String>,
}

/// Voice listing handler
///
/// Returns the catalog filtered by `locale` (or the configured default),
/// without the `Name`, `FriendlyName` and `VoiceTag` fields.
pub async fn list_voices(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VoicesQuery>,
) -> AppResult<Json<Vec<PublicVoice>>> {
    let filter = match query.locale.as_deref() {
        Some(locale) => locale_filter(locale),
        None => state.config.voices_locale_filter(),
    };

    let voices = fetch_voices(&state.http, &state.config.voices_url, filter).await?;
    tracing::info!(count = voices.len(), locale = ?filter, "Listing voices");

    Ok(Json(voices.into_iter().map(PublicVoice::from).collect()))
}
