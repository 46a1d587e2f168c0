//! Targeting: the client-local selection session, persistent target
//! records, and the combined "is targeted" query.

pub mod records;
pub mod session;

pub use records::{clear_records, new_records, target_status, targets_of, TargetRecord, TargetStatus};
pub use session::{TargetMode, TargetRef, TargetingSession, PLAYER_TARGET_PREFIX};
