//! Persistent target records and the "is targeted" query.
//!
//! Two things can make an entity targeted:
//!
//! - a [`TargetRecord`], made by manual targeting, which lasts until its
//!   controller clears it
//! - a stack item listing the entity in `targetIds`/`targetPlayerIds`,
//!   which lasts until the item resolves
//!
//! They have different lifecycles and are stored separately. Anything
//! asking whether an entity is targeted must look at both, which is what
//! [`target_status`] does.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::session::TargetRef;
use crate::core::entity::{InstanceId, RecordId, Timestamp};
use crate::core::player::PlayerId;
use crate::core::rng::GameRng;
use crate::core::state::GameState;

/// A manual targeting arrow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetRecord {
    pub id: RecordId,
    pub source_id: InstanceId,
    pub target_id: TargetRef,
    pub controller_id: PlayerId,
    pub timestamp: Timestamp,
}

impl TargetRecord {
    /// Whether this record points from or at `card`.
    #[must_use]
    pub fn involves(&self, card: &InstanceId) -> bool {
        &self.source_id == card || self.target_id.is_card(card)
    }
}

/// One record per target, all from `source`.
pub fn new_records(
    source: &InstanceId,
    targets: &[TargetRef],
    controller: &PlayerId,
    now: Timestamp,
    rng: &mut GameRng,
) -> Vector<TargetRecord> {
    targets
        .iter()
        .map(|target| TargetRecord {
            id: rng.record_id(),
            source_id: source.clone(),
            target_id: target.clone(),
            controller_id: controller.clone(),
            timestamp: now,
        })
        .collect()
}

/// Drop `controller`'s records that point from or at `card`.
///
/// Returns `None` when no record matches.
#[must_use]
pub fn clear_records(
    records: &Vector<TargetRecord>,
    card: &InstanceId,
    controller: &PlayerId,
) -> Option<Vector<TargetRecord>> {
    let kept: Vector<TargetRecord> = records
        .iter()
        .filter(|r| !(r.involves(card) && &r.controller_id == controller))
        .cloned()
        .collect();
    (kept.len() != records.len()).then_some(kept)
}

/// Targeting status of one entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetStatus {
    /// Persistent records pointing at the entity.
    pub by_records: usize,
    /// Stack items listing the entity as a target.
    pub by_stack: usize,
    /// Whether the entity is the source of any record or stack item.
    pub is_source: bool,
}

impl TargetStatus {
    #[must_use]
    pub fn is_targeted(&self) -> bool {
        self.by_records + self.by_stack > 0
    }
}

/// Union of persistent and stack targeting for `entity`.
#[must_use]
pub fn target_status(state: &GameState, entity: &TargetRef) -> TargetStatus {
    let by_records = state
        .targets
        .iter()
        .filter(|r| &r.target_id == entity)
        .count();

    let by_stack = state
        .stack
        .iter()
        .filter(|item| item.targets(entity))
        .count();

    let is_source = match entity {
        TargetRef::Card(id) => {
            state.targets.iter().any(|r| &r.source_id == id)
                || state.stack.iter().any(|item| &item.source_id == id)
        }
        TargetRef::Player(_) => false,
    };

    TargetStatus {
        by_records,
        by_stack,
        is_source,
    }
}

/// Everything `source` currently targets, records first, without repeats.
#[must_use]
pub fn targets_of(state: &GameState, source: &InstanceId) -> Vec<TargetRef> {
    let mut out: Vec<TargetRef> = Vec::new();
    let from_records = state
        .targets
        .iter()
        .filter(|r| &r.source_id == source)
        .map(|r| r.target_id.clone());
    let from_stack = state
        .stack
        .iter()
        .filter(|item| &item.source_id == source)
        .flat_map(|item| item.target_refs());

    for target in from_records.chain(from_stack) {
        if !out.contains(&target) {
            out.push(target);
        }
    }
    out
}
