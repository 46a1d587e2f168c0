//! Error types.
//!
//! - [`Rejection`]: a protocol violation. The action is refused before any
//!   mutation and nothing is logged. The actor is shown a [`Notice`].
//! - [`StoreError`]: the document store refused or failed a read or write.
//! - [`JoinError`]: joining a game failed.
//! - [`DispatchError`]: a client-side dispatch failed at either step.
//!
//! Running out of a resource (drawing from an empty library, say) is not an
//! error at all: the reducer returns an empty update.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entity::{GameCode, InstanceId, Timestamp};
use super::player::PlayerId;

/// Why an action was refused.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Rejection {
    /// Two players are seated and the actor does not hold priority.
    #[error("No priority, wait or press Pass")]
    NoPriority,

    #[error("unknown card {0}")]
    UnknownCard(InstanceId),

    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),

    /// The actor has no seat at this table.
    #[error("{0} is not seated at this table")]
    NotSeated(PlayerId),

    /// The reorder selection is too small, too large or not in the library.
    #[error("cannot reorder {requested} cards (allowed {min}..={max})")]
    InvalidReorder {
        requested: usize,
        min: usize,
        max: usize,
    },
}

impl Rejection {
    /// Build the transient notice shown to the actor.
    #[must_use]
    pub fn notice(&self, now: Timestamp, ttl_ms: i64) -> Notice {
        Notice {
            message: self.to_string(),
            expires_at: now.plus_millis(ttl_ms),
        }
    }
}

/// Transient, actor-only message. Never written to the game document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub message: String,
    pub expires_at: Timestamp,
}

impl Notice {
    /// Whether the notice should still be displayed at `now`.
    #[must_use]
    pub fn is_visible(&self, now: Timestamp) -> bool {
        now < self.expires_at
    }
}

/// Document-store failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("game {0} not found")]
    NotFound(GameCode),

    #[error("game {0} already exists")]
    AlreadyExists(GameCode),

    /// Optimistic write lost against a concurrent writer.
    #[error("game {code} changed (expected version {expected}, found {found})")]
    Conflict {
        code: GameCode,
        expected: u64,
        found: u64,
    },

    #[error("snapshot codec: {0}")]
    Codec(#[from] bincode::Error),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Failure to join a game.
#[derive(Debug, Error)]
pub enum JoinError {
    #[error("game {0} not found")]
    NotFound(GameCode),

    #[error("game {0} is full")]
    Full(GameCode),

    /// Every optimistic attempt conflicted with another writer.
    #[error("gave up joining {code} after {attempts} attempts")]
    Contention { code: GameCode, attempts: u32 },

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for JoinError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(code) => JoinError::NotFound(code),
            other => JoinError::Store(other),
        }
    }
}

/// Failure of a client dispatch (read, reduce, write).
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_priority_notice() {
        let notice = Rejection::NoPriority.notice(Timestamp(1_000), 2_000);

        assert_eq!(notice.message, "No priority, wait or press Pass");
        assert!(notice.is_visible(Timestamp(2_999)));
        assert!(!notice.is_visible(Timestamp(3_000)));
    }

    #[test]
    fn test_rejection_messages() {
        let err = Rejection::UnknownCard(InstanceId::new("zz"));
        assert_eq!(err.to_string(), "unknown card zz");

        let err = Rejection::InvalidReorder { requested: 1, min: 2, max: 10 };
        assert_eq!(err.to_string(), "cannot reorder 1 cards (allowed 2..=10)");
    }

    #[test]
    fn test_join_error_from_store() {
        let err: JoinError = StoreError::NotFound(GameCode::parse("ABCDEF")).into();
        assert!(matches!(err, JoinError::NotFound(_)));

        let err: JoinError = StoreError::Poisoned.into();
        assert!(matches!(err, JoinError::Store(StoreError::Poisoned)));
    }
}
