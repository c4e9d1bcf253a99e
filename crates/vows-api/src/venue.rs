use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::{error, warn};
use uuid::Uuid;

use vows_types::api::VenueResponse;

use crate::auth::AppState;

/// GET /venue — read-only singleton for the location section.
pub async fn get_venue(State(state): State<AppState>) -> Result<impl IntoResponse, StatusCode> {
    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || db.db.get_venue())
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|e| {
            error!("DB get_venue error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(VenueResponse {
        id: row.id.parse().unwrap_or_else(|e| {
            warn!("Corrupt venue id '{}': {}", row.id, e);
            Uuid::default()
        }),
        name: row.name,
        address: row.address,
        lat: row.lat,
        lng: row.lng,
    }))
}
