use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::{error, warn};
use uuid::Uuid;

use vows_db::models::{InvitationRow, parse_timestamp};
use vows_types::api::{InvitationResponse, UpdateInvitationRequest};
use vows_types::events::FeedEvent;

use crate::auth::AppState;

/// GET /invitation — the singleton every visitor reads on page load.
pub async fn get_invitation(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || db.db.get_invitation())
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|e| {
            error!("DB get_invitation error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(to_response(row)))
}

/// PUT /invitation — admin partial update; absent fields keep their value.
pub async fn update_invitation(
    State(state): State<AppState>,
    Json(req): Json<UpdateInvitationRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = state.clone();
    let updated = tokio::task::spawn_blocking(move || {
        let mut row = db.db.get_invitation()?;
        merge(&mut row, req);
        db.db.update_invitation(&row)?;
        db.db.get_invitation()
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?
    .map_err(|e| {
        error!("DB update_invitation error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    state.dispatcher.broadcast(FeedEvent::InvitationUpdated);

    Ok(Json(to_response(updated)))
}

fn merge(row: &mut InvitationRow, req: UpdateInvitationRequest) {
    if let Some(v) = req.couple_groom {
        row.couple_groom = v;
    }
    if let Some(v) = req.couple_bride {
        row.couple_bride = v;
    }
    if let Some(v) = req.groom_father {
        row.groom_father = Some(v);
    }
    if let Some(v) = req.groom_mother {
        row.groom_mother = Some(v);
    }
    if let Some(v) = req.bride_father {
        row.bride_father = Some(v);
    }
    if let Some(v) = req.bride_mother {
        row.bride_mother = Some(v);
    }
    if let Some(v) = req.hero_line1 {
        row.hero_line1 = v;
    }
    if let Some(v) = req.hero_line2 {
        row.hero_line2 = v;
    }
    if let Some(v) = req.hero_line3 {
        row.hero_line3 = v;
    }
    if let Some(v) = req.intro_text {
        row.intro_text = Some(v);
    }
    if let Some(v) = req.hero_video_url {
        row.hero_video_url = Some(v);
    }
    if let Some(v) = req.wedding_at {
        // Serde already rejected unparseable timestamps at the request edge
        row.wedding_at = v.to_rfc3339();
    }
}

fn to_response(row: InvitationRow) -> InvitationResponse {
    InvitationResponse {
        id: row.id.parse().unwrap_or_else(|e| {
            warn!("Corrupt invitation id '{}': {}", row.id, e);
            Uuid::default()
        }),
        couple_groom: row.couple_groom,
        couple_bride: row.couple_bride,
        groom_father: row.groom_father,
        groom_mother: row.groom_mother,
        bride_father: row.bride_father,
        bride_mother: row.bride_mother,
        hero_line1: row.hero_line1,
        hero_line2: row.hero_line2,
        hero_line3: row.hero_line3,
        intro_text: row.intro_text,
        hero_video_url: row.hero_video_url,
        wedding_at: parse_timestamp(&row.wedding_at).unwrap_or_else(|| {
            warn!("Corrupt wedding_at '{}'", row.wedding_at);
            chrono::DateTime::default()
        }),
        updated_at: parse_timestamp(&row.updated_at).unwrap_or_else(|| {
            warn!("Corrupt updated_at '{}'", row.updated_at);
            chrono::DateTime::default()
        }),
    }
}
