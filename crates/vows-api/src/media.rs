use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::{error, warn};
use uuid::Uuid;

use vows_db::models::{MediaRow, parse_timestamp};
use vows_types::api::{CreateMediaRequest, MediaResponse, UpdateMediaRequest};
use vows_types::events::FeedEvent;
use vows_types::models::MediaKind;

use crate::auth::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct MediaQuery {
    /// Optional filter — the story section asks for kind=text only.
    pub kind: Option<MediaKind>,
}

/// GET /media — gallery posts ordered by sort position.
pub async fn list_media(
    State(state): State<AppState>,
    Query(query): Query<MediaQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = state.clone();
    let kind = query.kind.map(|k| k.to_string());
    let rows = tokio::task::spawn_blocking(move || db.db.list_media(kind.as_deref()))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|e| {
            error!("DB list_media error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let assets: Vec<MediaResponse> = rows.into_iter().map(to_response).collect();
    Ok(Json(assets))
}

/// POST /media — admin creates a gallery post.
pub async fn create_media(
    State(state): State<AppState>,
    Json(req): Json<CreateMediaRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    // A text post needs content; image/video posts need a display URL
    let valid = match req.kind {
        MediaKind::Text => req.content.as_deref().is_some_and(|c| !c.trim().is_empty()),
        MediaKind::Image | MediaKind::Video => {
            req.url.as_deref().is_some_and(|u| !u.trim().is_empty())
        }
    };
    if !valid {
        return Err(StatusCode::BAD_REQUEST);
    }

    let media_id = Uuid::new_v4();
    let row = MediaRow {
        id: media_id.to_string(),
        kind: req.kind.to_string(),
        url: req.url,
        title: req.title,
        content: req.content,
        author_name: req.author_name,
        author_role: req.author_role.to_string(),
        likes_count: 0,
        sort_order: req.sort_order,
        created_at: String::new(),
    };

    let db = state.clone();
    let created = tokio::task::spawn_blocking(move || {
        db.db.insert_media(&row)?;
        db.db.get_media(&row.id)
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?
    .map_err(|e| {
        error!("DB insert_media error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?
    .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

    state
        .dispatcher
        .broadcast(FeedEvent::MediaCreated { media_id });

    Ok((StatusCode::CREATED, Json(to_response(created))))
}

/// PUT /media/{id} — admin edits a post; absent fields keep their value.
pub async fn update_media(
    State(state): State<AppState>,
    Path(media_id): Path<Uuid>,
    Json(req): Json<UpdateMediaRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = state.clone();
    let id = media_id.to_string();
    let updated = tokio::task::spawn_blocking(move || {
        let Some(mut row) = db.db.get_media(&id)? else {
            return Ok(None);
        };
        if let Some(v) = req.url {
            row.url = Some(v);
        }
        if let Some(v) = req.title {
            row.title = Some(v);
        }
        if let Some(v) = req.content {
            row.content = Some(v);
        }
        if let Some(v) = req.author_name {
            row.author_name = Some(v);
        }
        if let Some(v) = req.sort_order {
            row.sort_order = v;
        }
        db.db.update_media(&row)?;
        db.db.get_media(&id)
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?
    .map_err(|e| {
        error!("DB update_media error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?
    .ok_or(StatusCode::NOT_FOUND)?;

    state
        .dispatcher
        .broadcast(FeedEvent::MediaUpdated { media_id });

    Ok(Json(to_response(updated)))
}

/// DELETE /media/{id} — admin removes a post (likes/comments cascade).
pub async fn delete_media(
    State(state): State<AppState>,
    Path(media_id): Path<Uuid>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = state.clone();
    let id = media_id.to_string();
    let deleted = tokio::task::spawn_blocking(move || db.db.delete_media(&id))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|e| {
            error!("DB delete_media error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    if !deleted {
        return Err(StatusCode::NOT_FOUND);
    }

    state
        .dispatcher
        .broadcast(FeedEvent::MediaDeleted { media_id });

    Ok(StatusCode::NO_CONTENT)
}

pub(crate) fn to_response(row: MediaRow) -> MediaResponse {
    MediaResponse {
        id: row.id.parse().unwrap_or_else(|e| {
            warn!("Corrupt media id '{}': {}", row.id, e);
            Uuid::default()
        }),
        kind: row.kind.parse().unwrap_or_else(|e| {
            warn!("Corrupt media kind on '{}': {}", row.id, e);
            MediaKind::Image
        }),
        url: row.url,
        title: row.title,
        content: row.content,
        author_name: row.author_name,
        author_role: row.author_role.parse().unwrap_or_else(|e| {
            warn!("Corrupt author_role on media '{}': {}", row.id, e);
            vows_types::models::AuthorRole::Groom
        }),
        likes_count: row.likes_count,
        sort_order: row.sort_order,
        created_at: parse_timestamp(&row.created_at).unwrap_or_else(|| {
            warn!("Corrupt created_at '{}' on media '{}'", row.created_at, row.id);
            chrono::DateTime::default()
        }),
    }
}
