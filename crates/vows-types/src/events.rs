use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::MessageTarget;

/// Events pushed over the public change feed WebSocket.
///
/// The feed is advisory: clients that care about a table re-fetch it when an
/// event for that table arrives. `LikeToggled` additionally carries the fresh
/// count so like badges can update without a round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum FeedEvent {
    /// A visitor liked or unliked a gallery post.
    LikeToggled {
        media_id: Uuid,
        liked: bool,
        likes_count: i64,
    },

    /// A comment was added to a gallery post.
    CommentCreated { media_id: Uuid, comment_id: Uuid },

    /// A comment was removed by its owner or an admin.
    CommentDeleted { media_id: Uuid, comment_id: Uuid },

    /// A guestbook message was posted.
    MessageCreated {
        target: MessageTarget,
        timestamp: DateTime<Utc>,
    },

    /// Gallery contents changed (admin upload/edit/delete).
    MediaCreated { media_id: Uuid },
    MediaUpdated { media_id: Uuid },
    MediaDeleted { media_id: Uuid },

    /// The invitation singleton was edited.
    InvitationUpdated,
}
