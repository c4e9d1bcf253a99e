//! Page-state engines for the invitation site.
//!
//! Each engine is a plain state machine with no timer of its own: the client
//! drives it from a single once-per-second (or per-animation-tick) clock and
//! tears it down by dropping it, so no reveal or blink can outlive its view.

pub mod countdown;
pub mod likes;
pub mod pager;
pub mod typewriter;

use std::fmt;

use uuid::Uuid;

/// Stable anonymous identity for one visitor, generated once at startup and
/// persisted locally by the client. Threaded into like/comment calls instead
/// of being re-read from storage at every call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisitorIdentity(Uuid);

impl VisitorIdentity {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Restore a previously persisted identity.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for VisitorIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
