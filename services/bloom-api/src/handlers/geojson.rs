//! GeoJSON serving handler.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::Value;
use tracing::{info, warn};

use crate::mock::{random_collection, MOCK_FEATURE_COUNT};
use crate::state::AppState;

/// GET /geojson - Serve the generated bloom collection.
///
/// Falls back to synthetic random points when the processor has not
/// produced a file yet, so the map frontend always renders something.
pub async fn geojson_handler(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    match std::fs::read_to_string(&state.geojson_path) {
        Ok(text) => match text.parse::<Value>() {
            Ok(collection) => Json(collection).into_response(),
            Err(e) => {
                warn!(
                    path = %state.geojson_path.display(),
                    error = %e,
                    "Generated GeoJSON is unparseable"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({"error": "stored collection is invalid"})),
                )
                    .into_response()
            }
        },
        Err(_) => {
            info!(
                path = %state.geojson_path.display(),
                "No generated collection, serving mock points"
            );
            Json(random_collection(&state.mock_extent, MOCK_FEATURE_COUNT)).into_response()
        }
    }
}
