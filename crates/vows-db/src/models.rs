//! Database row types — these map directly to SQLite rows.
//! Distinct from the vows-types API models to keep the DB layer independent.

use chrono::{DateTime, NaiveDateTime, Utc};

pub struct UserRow {
    pub id: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub created_at: String,
}

pub struct InvitationRow {
    pub id: String,
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
    pub wedding_at: String,
    pub updated_at: String,
}

pub struct VenueRow {
    pub id: String,
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}

pub struct MediaRow {
    pub id: String,
    pub kind: String,
    pub url: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub author_name: Option<String>,
    pub author_role: String,
    pub likes_count: i64,
    pub sort_order: i64,
    pub created_at: String,
}

pub struct CommentRow {
    pub id: String,
    pub media_id: String,
    pub writer: String,
    pub content: String,
    pub commenter_id: String,
    pub created_at: String,
}

pub struct MessageRow {
    pub id: i64,
    pub target: String,
    pub writer: String,
    pub password_hash: String,
    pub content: String,
    pub created_at: String,
}

pub struct FileRow {
    pub id: String,
    pub uploader_id: String,
    pub size: i64,
    pub created_at: String,
}

/// Parse a stored timestamp. SQLite's datetime('now') default writes
/// "YYYY-MM-DD HH:MM:SS" without timezone; columns we write ourselves hold
/// RFC 3339. Accept both, treating the naive form as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .ok()
}
