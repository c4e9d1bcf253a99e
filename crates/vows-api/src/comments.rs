use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use tracing::{error, warn};
use uuid::Uuid;

use vows_db::models::{CommentRow, parse_timestamp};
use vows_types::api::{CommentResponse, CreateCommentRequest, DeleteCommentRequest};
use vows_types::events::FeedEvent;

use crate::auth::AppState;
use crate::middleware::claims_from_headers;

/// GET /media/{id}/comments — oldest first.
pub async fn list_comments(
    State(state): State<AppState>,
    Path(media_id): Path<Uuid>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = state.clone();
    let mid = media_id.to_string();
    let rows = tokio::task::spawn_blocking(move || {
        if db.db.get_media(&mid)?.is_none() {
            return Ok(None);
        }
        db.db.list_comments(&mid).map(Some)
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?
    .map_err(|e| {
        error!("DB list_comments error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?
    .ok_or(StatusCode::NOT_FOUND)?;

    let comments: Vec<CommentResponse> = rows.into_iter().map(to_response).collect();
    Ok(Json(comments))
}

/// POST /media/{id}/comments — any visitor, identified by their local
/// commenter id for later deletion.
pub async fn create_comment(
    State(state): State<AppState>,
    Path(media_id): Path<Uuid>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    if req.writer.trim().is_empty() || req.content.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let comment_id = Uuid::new_v4();
    let row = CommentRow {
        id: comment_id.to_string(),
        media_id: media_id.to_string(),
        writer: req.writer.trim().to_string(),
        content: req.content.trim().to_string(),
        commenter_id: req.commenter_id.to_string(),
        created_at: String::new(),
    };

    let db = state.clone();
    let created = tokio::task::spawn_blocking(move || {
        if db.db.get_media(&row.media_id)?.is_none() {
            return Ok(None);
        }
        db.db.insert_comment(&row)?;
        db.db.get_comment(&row.id)
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?
    .map_err(|e| {
        error!("DB insert_comment error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?
    .ok_or(StatusCode::NOT_FOUND)?;

    state.dispatcher.broadcast(FeedEvent::CommentCreated {
        media_id,
        comment_id,
    });

    Ok((StatusCode::CREATED, Json(to_response(created))))
}

/// DELETE /comments/{id} — the owner (matching commenter id) or an admin
/// (Bearer token) may delete.
pub async fn delete_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<Uuid>,
    headers: HeaderMap,
    Json(req): Json<DeleteCommentRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let is_admin = claims_from_headers(&headers).is_some_and(|claims| claims.role.is_admin());

    let db = state.clone();
    let cid = comment_id.to_string();
    let comment = tokio::task::spawn_blocking(move || db.db.get_comment(&cid))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|e| {
            error!("DB get_comment error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    let is_owner = req
        .commenter_id
        .is_some_and(|actor| actor.to_string() == comment.commenter_id);

    if !is_admin && !is_owner {
        return Err(StatusCode::FORBIDDEN);
    }

    let media_id: Uuid = comment.media_id.parse().unwrap_or_else(|e| {
        warn!("Corrupt media_id on comment '{}': {}", comment.id, e);
        Uuid::default()
    });

    let db = state.clone();
    let cid = comment_id.to_string();
    tokio::task::spawn_blocking(move || db.db.delete_comment(&cid))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|e| {
            error!("DB delete_comment error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    state.dispatcher.broadcast(FeedEvent::CommentDeleted {
        media_id,
        comment_id,
    });

    Ok(StatusCode::NO_CONTENT)
}

fn to_response(row: CommentRow) -> CommentResponse {
    CommentResponse {
        id: row.id.parse().unwrap_or_else(|e| {
            warn!("Corrupt comment id '{}': {}", row.id, e);
            Uuid::default()
        }),
        media_id: row.media_id.parse().unwrap_or_else(|e| {
            warn!("Corrupt media_id on comment '{}': {}", row.id, e);
            Uuid::default()
        }),
        writer: row.writer,
        content: row.content,
        created_at: parse_timestamp(&row.created_at).unwrap_or_else(|| {
            warn!("Corrupt created_at '{}' on comment '{}'", row.created_at, row.id);
            chrono::DateTime::default()
        }),
    }
}
