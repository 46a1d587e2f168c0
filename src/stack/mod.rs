//! Stack and priority.
//!
//! Spells and abilities wait on a LIFO stack until every seated player has
//! passed priority in succession; then the top item resolves. Passing with
//! an empty stack moves the game to the next phase.
//!
//! - `cast`: putting spells and abilities on the stack
//! - `resolution`: what happens to the source when the top item resolves
//! - `priority`: the pass-priority state machine

mod cast;
mod priority;
mod resolution;

pub use cast::{activate_ability, cast_spell, reopen_priority};
pub use priority::{advance_phase, pass_priority, PassOutcome, PriorityStep};
pub use resolution::{resolve_top, Resolved};

use serde::{Deserialize, Serialize};

use crate::core::action::{CardTargets, PlayerTargets};
use crate::core::entity::{InstanceId, RecordId, Timestamp};
use crate::core::player::PlayerId;
use crate::targeting::TargetRef;

/// Marker for stack items that are abilities rather than spells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StackItemKind {
    Ability,
}

/// A pending spell or ability.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackItem {
    pub id: RecordId,

    /// Card that was cast, or whose ability was activated.
    pub source_id: InstanceId,

    /// Display name. Abilities are suffixed with `(Ability)`.
    pub name: String,

    pub controller_id: PlayerId,

    pub timestamp: Timestamp,

    /// Targets chosen when the item was put on the stack. Gone when it
    /// resolves.
    #[serde(default)]
    pub target_ids: CardTargets,

    #[serde(default)]
    pub target_player_ids: PlayerTargets,

    /// `None` for a spell.
    #[serde(default, rename = "type")]
    pub kind: Option<StackItemKind>,

    #[serde(default)]
    pub card_image: Option<String>,
}

impl StackItem {
    #[must_use]
    pub fn is_ability(&self) -> bool {
        self.kind == Some(StackItemKind::Ability)
    }

    /// Whether this item lists `target`.
    #[must_use]
    pub fn targets(&self, target: &TargetRef) -> bool {
        match target {
            TargetRef::Card(id) => self.target_ids.contains(id),
            TargetRef::Player(id) => self.target_player_ids.contains(id),
        }
    }

    /// All targets as [`TargetRef`]s, cards first.
    #[must_use]
    pub fn target_refs(&self) -> Vec<TargetRef> {
        self.target_ids
            .iter()
            .cloned()
            .map(TargetRef::Card)
            .chain(self.target_player_ids.iter().cloned().map(TargetRef::Player))
            .collect()
    }
}
