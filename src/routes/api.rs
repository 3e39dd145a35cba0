use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers::{api, speak, voices};
use crate::state::AppState;
use std::sync::Arc;

pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(api::health_check))
        .route("/voices", get(voices::list_voices))
        .route("/tts", post(speak::tts_handler))
        // Paths used by existing read-aloud clients
        .route("/api/tts/voices", get(voices::list_voices))
        .route("/api/tts", post(speak::tts_handler))
        .layer(TraceLayer::new_for_http())
}
