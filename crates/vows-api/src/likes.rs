use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::error;
use uuid::Uuid;

use vows_types::api::{ToggleLikeRequest, ToggleLikeResponse};
use vows_types::events::FeedEvent;

use crate::auth::AppState;

/// POST /media/{id}/likes — toggle this visitor's like.
///
/// The check-then-insert runs inside one DB transaction, and the
/// UNIQUE(media_id, actor_id) constraint backstops it, so two rapid toggles
/// cannot leave a duplicate row. The response carries the fresh count so the
/// client can reconcile its optimistic snapshot.
pub async fn toggle_like(
    State(state): State<AppState>,
    Path(media_id): Path<Uuid>,
    Json(req): Json<ToggleLikeRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let like_id = Uuid::new_v4();

    let db = state.clone();
    let mid = media_id.to_string();
    let exists = tokio::task::spawn_blocking(move || db.db.get_media(&mid))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|e| {
            error!("DB get_media error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .is_some();

    if !exists {
        return Err(StatusCode::NOT_FOUND);
    }

    let db = state.clone();
    let mid = media_id.to_string();
    let actor = req.actor_id.to_string();
    let (liked, likes_count) =
        tokio::task::spawn_blocking(move || db.db.toggle_like(&like_id.to_string(), &mid, &actor))
            .await
            .map_err(|e| {
                error!("spawn_blocking join error: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            })?
            .map_err(|e| {
                error!("DB toggle_like error: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            })?;

    state.dispatcher.broadcast(FeedEvent::LikeToggled {
        media_id,
        liked,
        likes_count,
    });

    Ok(Json(ToggleLikeResponse { liked, likes_count }))
}
