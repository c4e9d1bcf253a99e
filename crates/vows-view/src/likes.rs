use thiserror::Error;
use uuid::Uuid;

use crate::VisitorIdentity;

/// The visitor-local snapshot of one gallery post's like state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeState {
    pub liked: bool,
    pub likes_count: i64,
}

#[derive(Debug, Error)]
#[error("backend call failed: {0}")]
pub struct StoreError(pub String);

#[derive(Debug, Error)]
#[error("like toggle failed and was rolled back: {source}")]
pub struct ToggleError {
    pub source: StoreError,
    /// The snapshot in effect after rollback, so the caller can apply it
    /// deterministically instead of relying on a framework hook.
    pub rolled_back_to: LikeState,
}

/// Remote collaborator for the like toggle. Handed in explicitly rather than
/// reached through a global client. Callers are generic over the store, so
/// no boxed futures are needed.
#[allow(async_fn_in_trait)]
pub trait LikeStore {
    /// Insert this visitor's like row for the asset.
    async fn insert_like(&self, media_id: Uuid, actor: VisitorIdentity) -> Result<(), StoreError>;

    /// Delete this visitor's like row for the asset.
    async fn remove_like(&self, media_id: Uuid, actor: VisitorIdentity) -> Result<(), StoreError>;

    /// Fresh authoritative read of (liked, likes_count) for this visitor.
    async fn fetch(&self, media_id: Uuid, actor: VisitorIdentity) -> Result<LikeState, StoreError>;
}

/// Toggle the visitor's like with optimistic local feedback.
///
/// The snapshot is flipped before the remote write is issued, so the UI shows
/// the new state with zero latency; a failed write restores the pre-flip
/// snapshot before the error is returned. After the write settles either way,
/// a fresh read reconciles the snapshot with the store (best effort — a failed
/// reconciliation read keeps the locally computed state).
///
/// Each invocation reads `state` as it is *now*, so rapid repeated toggles
/// always flip the latest optimistic snapshot, never a stale copy.
pub async fn toggle<S: LikeStore>(
    state: &mut LikeState,
    store: &S,
    media_id: Uuid,
    actor: VisitorIdentity,
) -> Result<LikeState, ToggleError> {
    let before = *state;

    // Optimistic flip: exactly ±1 on the displayed count
    state.liked = !before.liked;
    state.likes_count = if state.liked {
        before.likes_count + 1
    } else {
        (before.likes_count - 1).max(0)
    };

    let write = if state.liked {
        store.insert_like(media_id, actor).await
    } else {
        store.remove_like(media_id, actor).await
    };

    match write {
        Ok(()) => {
            if let Ok(fresh) = store.fetch(media_id, actor).await {
                *state = fresh;
            }
            Ok(*state)
        }
        Err(source) => {
            // No net visible change survives a failure
            *state = before;
            if let Ok(fresh) = store.fetch(media_id, actor).await {
                *state = fresh;
            }
            Err(ToggleError {
                source,
                rolled_back_to: *state,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// In-memory stand-in for the remote store, with switchable write failure.
    struct FakeStore {
        rows: Mutex<HashSet<(Uuid, Uuid)>>,
        fail_writes: Mutex<bool>,
    }

    impl FakeStore {
        fn new() -> Self {
            Self {
                rows: Mutex::new(HashSet::new()),
                fail_writes: Mutex::new(false),
            }
        }

        fn fail_next_writes(&self, fail: bool) {
            *self.fail_writes.lock().unwrap() = fail;
        }

        fn row_count(&self, media_id: Uuid) -> i64 {
            self.rows
                .lock()
                .unwrap()
                .iter()
                .filter(|(m, _)| *m == media_id)
                .count() as i64
        }
    }

    impl LikeStore for FakeStore {
        async fn insert_like(
            &self,
            media_id: Uuid,
            actor: VisitorIdentity,
        ) -> Result<(), StoreError> {
            if *self.fail_writes.lock().unwrap() {
                return Err(StoreError("connection reset".into()));
            }
            self.rows.lock().unwrap().insert((media_id, actor.uuid()));
            Ok(())
        }

        async fn remove_like(
            &self,
            media_id: Uuid,
            actor: VisitorIdentity,
        ) -> Result<(), StoreError> {
            if *self.fail_writes.lock().unwrap() {
                return Err(StoreError("connection reset".into()));
            }
            self.rows.lock().unwrap().remove(&(media_id, actor.uuid()));
            Ok(())
        }

        async fn fetch(
            &self,
            media_id: Uuid,
            actor: VisitorIdentity,
        ) -> Result<LikeState, StoreError> {
            let rows = self.rows.lock().unwrap();
            Ok(LikeState {
                liked: rows.contains(&(media_id, actor.uuid())),
                likes_count: rows.iter().filter(|(m, _)| *m == media_id).count() as i64,
            })
        }
    }

    #[tokio::test]
    async fn double_toggle_restores_original_state() {
        let store = FakeStore::new();
        let media_id = Uuid::new_v4();
        let actor = VisitorIdentity::generate();
        let mut state = LikeState {
            liked: false,
            likes_count: 0,
        };
        let original = state;

        toggle(&mut state, &store, media_id, actor).await.unwrap();
        assert!(state.liked);
        assert_eq!(state.likes_count, 1);

        toggle(&mut state, &store, media_id, actor).await.unwrap();
        assert_eq!(state, original);
        // Net remote row count for this (asset, actor) pair is unchanged
        assert_eq!(store.row_count(media_id), 0);
    }

    #[tokio::test]
    async fn failed_write_rolls_back_exactly() {
        let store = FakeStore::new();
        let media_id = Uuid::new_v4();
        let actor = VisitorIdentity::generate();
        let mut state = LikeState {
            liked: false,
            likes_count: 4,
        };
        let before = state;

        store.fail_next_writes(true);
        let err = toggle(&mut state, &store, media_id, actor)
            .await
            .unwrap_err();

        assert_eq!(state.liked, before.liked);
        assert_eq!(err.rolled_back_to.liked, before.liked);
        assert_eq!(store.row_count(media_id), 0);
    }

    #[tokio::test]
    async fn toggle_counts_other_visitors_likes() {
        let store = FakeStore::new();
        let media_id = Uuid::new_v4();
        let other = VisitorIdentity::generate();
        store.insert_like(media_id, other).await.unwrap();

        let actor = VisitorIdentity::generate();
        let mut state = store.fetch(media_id, actor).await.unwrap();
        assert_eq!(state.likes_count, 1);
        assert!(!state.liked);

        let after = toggle(&mut state, &store, media_id, actor).await.unwrap();
        assert!(after.liked);
        assert_eq!(after.likes_count, 2);
    }

    #[tokio::test]
    async fn rapid_toggles_read_the_latest_snapshot() {
        let store = FakeStore::new();
        let media_id = Uuid::new_v4();
        let actor = VisitorIdentity::generate();
        let mut state = LikeState {
            liked: false,
            likes_count: 0,
        };

        // Invoked back to back; each reads the state the previous one left
        for _ in 0..5 {
            toggle(&mut state, &store, media_id, actor).await.unwrap();
        }
        assert!(state.liked);
        assert_eq!(state.likes_count, 1);
        assert_eq!(store.row_count(media_id), 1);
    }
}
