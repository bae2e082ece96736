//! Point time-series proxy handler.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::provider::{point_time_series, ProviderError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TimeSeriesQuery {
    pub lon: f64,
    pub lat: f64,
}

/// GET /timeseries?lon=&lat= - Resolve a mean index value via the
/// external task API.
pub async fn timeseries_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<TimeSeriesQuery>,
) -> impl IntoResponse {
    if !(-180.0..=180.0).contains(&query.lon) || !(-90.0..=90.0).contains(&query.lat) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "lon/lat out of range"})),
        )
            .into_response();
    }

    let Some(provider) = &state.provider else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"error": "time-series provider not configured"})),
        )
            .into_response();
    };

    match point_time_series(&state.http, provider, query.lon, query.lat).await {
        Ok(sample) => Json(sample).into_response(),
        Err(e) => {
            error!(error = %e, lon = query.lon, lat = query.lat, "Provider proxy failed");
            let status = match e {
                ProviderError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                _ => StatusCode::BAD_GATEWAY,
            };
            (status, Json(json!({"error": e.to_string()}))).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloom_common::BoundingBox;

    #[tokio::test]
    async fn test_unconfigured_provider_is_503() {
        let state = Arc::new(
            AppState::new(
                "missing.json".into(),
                BoundingBox::new(75.0, 9.9, 75.1, 10.0),
                None,
            )
            .unwrap(),
        );

        let response = timeseries_handler(
            Extension(state),
            Query(TimeSeriesQuery {
                lon: 75.05,
                lat: 9.95,
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_out_of_range_coordinates_are_400() {
        let state = Arc::new(
            AppState::new(
                "missing.json".into(),
                BoundingBox::new(75.0, 9.9, 75.1, 10.0),
                None,
            )
            .unwrap(),
        );

        let response = timeseries_handler(
            Extension(state),
            Query(TimeSeriesQuery {
                lon: 200.0,
                lat: 9.95,
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
