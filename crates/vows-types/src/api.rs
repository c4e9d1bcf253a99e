use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{AuthorRole, MediaKind, MessageTarget, Role};

// -- JWT Claims --

/// JWT claims shared between vows-api (REST middleware) and vows-server
/// (route wiring). Canonical definition lives here in vows-types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub role: Role,
    pub token: String,
}

/// The one place admin-ness is computed; every section of the page reads
/// this instead of re-deriving it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub role: Role,
    pub is_admin: bool,
}

// -- Invitation --

#[derive(Debug, Clone, Serialize)]
pub struct InvitationResponse {
    pub id: Uuid,
    pub couple_groom: String,
    pub couple_bride: String,
    pub groom_father: Option<String>,
    pub groom_mother: Option<String>,
    pub bride_father: Option<String>,
    pub bride_mother: Option<String>,
    pub hero_line1: String,
    pub hero_line2: String,
    pub hero_line3: String,
    pub intro_text: Option<String>,
    pub hero_video_url: Option<String>,
    pub wedding_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update: absent fields keep their current value.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateInvitationRequest {
    pub couple_groom: Option<String>,
    pub couple_bride: Option<String>,
    pub groom_father: Option<String>,
    pub groom_mother: Option<String>,
    pub bride_father: Option<String>,
    pub bride_mother: Option<String>,
    pub hero_line1: Option<String>,
    pub hero_line2: Option<String>,
    pub hero_line3: Option<String>,
    pub intro_text: Option<String>,
    pub hero_video_url: Option<String>,
    pub wedding_at: Option<DateTime<Utc>>,
}

// -- Venue --

#[derive(Debug, Clone, Serialize)]
pub struct VenueResponse {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}

// -- Media --

#[derive(Debug, Clone, Serialize)]
pub struct MediaResponse {
    pub id: Uuid,
    pub kind: MediaKind,
    pub url: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub author_name: Option<String>,
    pub author_role: AuthorRole,
    pub likes_count: i64,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateMediaRequest {
    pub kind: MediaKind,
    pub url: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub author_name: Option<String>,
    pub author_role: AuthorRole,
    #[serde(default)]
    pub sort_order: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateMediaRequest {
    pub url: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub author_name: Option<String>,
    pub sort_order: Option<i64>,
}

// -- Likes --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToggleLikeRequest {
    pub actor_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleLikeResponse {
    pub liked: bool,
    pub likes_count: i64,
}

// -- Comments --

#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub media_id: Uuid,
    pub writer: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateCommentRequest {
    pub writer: String,
    pub content: String,
    pub commenter_id: Uuid,
}

/// Owner deletion carries the visitor id; admins may omit it and rely on
/// their Bearer token instead.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteCommentRequest {
    pub commenter_id: Option<Uuid>,
}

// -- Guestbook messages --

#[derive(Debug, Clone, Serialize)]
pub struct GuestMessageResponse {
    pub id: i64,
    pub target: MessageTarget,
    pub writer: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateGuestMessageRequest {
    pub target: MessageTarget,
    pub writer: String,
    pub password: String,
    pub content: String,
}

/// One page of guestbook messages plus the total so the client can build
/// its page selector (1..=ceil(total/per_page)).
#[derive(Debug, Serialize)]
pub struct GuestMessagePage {
    pub items: Vec<GuestMessageResponse>,
    pub total: i64,
}

// -- Uploads --

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub file_id: String,
    pub url: String,
    pub size: u64,
}
