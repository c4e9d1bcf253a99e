use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::{error, warn};

use vows_db::models::{MessageRow, parse_timestamp};
use vows_types::api::{CreateGuestMessageRequest, GuestMessagePage, GuestMessageResponse};
use vows_types::events::FeedEvent;
use vows_types::models::MessageTarget;

use crate::auth::AppState;

#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub target: MessageTarget,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    5
}

/// GET /messages?target=&page=&per_page= — newest first, with the total so
/// the client can build its 1..=ceil(total/per_page) page selector.
pub async fn get_messages(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let per_page = query.per_page.clamp(1, 50);
    let page = query.page.max(1);
    let offset = (page - 1).saturating_mul(per_page);
    let target = query.target.to_string();

    let db = state.clone();
    let (rows, total) = tokio::task::spawn_blocking(move || {
        let rows = db.db.list_messages(&target, per_page, offset)?;
        let total = db.db.count_messages(&target)?;
        Ok::<_, anyhow::Error>((rows, total))
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?
    .map_err(|e| {
        error!("DB list_messages error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let items: Vec<GuestMessageResponse> = rows.into_iter().map(to_response).collect();
    Ok(Json(GuestMessagePage { items, total }))
}

/// POST /messages — any visitor leaves a note for the groom or bride. The
/// edit password is argon2-hashed before it is stored; the plaintext never
/// leaves this handler.
pub async fn create_message(
    State(state): State<AppState>,
    Json(req): Json<CreateGuestMessageRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    if req.writer.trim().is_empty()
        || req.password.trim().is_empty()
        || req.content.trim().is_empty()
    {
        return Err(StatusCode::BAD_REQUEST);
    }

    let password_hash = crate::auth::hash_password(&req.password).map_err(|e| {
        error!("Password hashing failed: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let target = req.target;
    let writer = req.writer.trim().to_string();
    let content = req.content.trim().to_string();

    let db = state.clone();
    let target_str = target.to_string();
    let id = tokio::task::spawn_blocking(move || {
        db.db
            .insert_message(&target_str, &writer, &password_hash, &content)
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?
    .map_err(|e| {
        error!("DB insert_message error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let now = chrono::Utc::now();
    state.dispatcher.broadcast(FeedEvent::MessageCreated {
        target,
        timestamp: now,
    });

    Ok((
        StatusCode::CREATED,
        Json(GuestMessageResponse {
            id,
            target,
            writer: req.writer.trim().to_string(),
            content: req.content.trim().to_string(),
            created_at: now,
        }),
    ))
}

fn to_response(row: MessageRow) -> GuestMessageResponse {
    GuestMessageResponse {
        id: row.id,
        target: row.target.parse().unwrap_or_else(|e| {
            warn!("Corrupt target on message {}: {}", row.id, e);
            MessageTarget::Groom
        }),
        writer: row.writer,
        content: row.content,
        created_at: parse_timestamp(&row.created_at).unwrap_or_else(|| {
            warn!("Corrupt created_at '{}' on message {}", row.created_at, row.id);
            chrono::DateTime::default()
        }),
    }
}
