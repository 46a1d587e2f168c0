//! Client-local targeting session.
//!
//! A session starts when a player picks a card to cast, activate or point
//! at things with. They toggle candidates on and off, then finish (which
//! yields the action to dispatch) or cancel (which yields nothing). The
//! session never touches the game document by itself.

use serde::{Deserialize, Serialize};

use crate::core::action::{Action, CardTargets, PlayerTargets};
use crate::core::entity::InstanceId;
use crate::core::player::PlayerId;

/// Prefix that marks a player in a serialized target id.
pub const PLAYER_TARGET_PREFIX: &str = "player:";

/// Something that can be targeted.
///
/// Serialized as a plain string: a card instance id, or `"player:"`
/// followed by a player id.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TargetRef {
    Card(InstanceId),
    Player(PlayerId),
}

impl TargetRef {
    #[must_use]
    pub fn card(id: impl Into<String>) -> Self {
        TargetRef::Card(InstanceId::new(id))
    }

    #[must_use]
    pub fn player(id: impl Into<String>) -> Self {
        TargetRef::Player(PlayerId::new(id))
    }

    #[must_use]
    pub fn is_player(&self) -> bool {
        matches!(self, TargetRef::Player(_))
    }

    /// Whether this refers to `card`.
    #[must_use]
    pub fn is_card(&self, card: &InstanceId) -> bool {
        matches!(self, TargetRef::Card(id) if id == card)
    }
}

impl From<String> for TargetRef {
    fn from(raw: String) -> Self {
        match raw.strip_prefix(PLAYER_TARGET_PREFIX) {
            Some(player) => TargetRef::Player(PlayerId::new(player)),
            None => TargetRef::Card(InstanceId::new(raw)),
        }
    }
}

impl From<TargetRef> for String {
    fn from(target: TargetRef) -> Self {
        target.to_string()
    }
}

impl std::fmt::Display for TargetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetRef::Card(id) => write!(f, "{}", id),
            TargetRef::Player(id) => write!(f, "{}{}", PLAYER_TARGET_PREFIX, id),
        }
    }
}

/// What finishing the session does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetMode {
    /// Cast the source card with the selected targets.
    Cast,
    /// Activate an ability of the source with the selected targets.
    Ability,
    /// Record persistent targeting arrows, outside the stack.
    Manual,
}

/// An in-progress target selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetingSession {
    source: InstanceId,
    mode: TargetMode,
    selected: Vec<TargetRef>,
}

impl TargetingSession {
    #[must_use]
    pub fn new(source: InstanceId, mode: TargetMode) -> Self {
        Self {
            source,
            mode,
            selected: Vec::new(),
        }
    }

    #[must_use]
    pub fn source(&self) -> &InstanceId {
        &self.source
    }

    #[must_use]
    pub fn mode(&self) -> TargetMode {
        self.mode
    }

    /// Selected targets, in selection order.
    #[must_use]
    pub fn selected(&self) -> &[TargetRef] {
        &self.selected
    }

    #[must_use]
    pub fn is_selected(&self, target: &TargetRef) -> bool {
        self.selected.contains(target)
    }

    /// Add `target` if absent, remove it if present.
    ///
    /// Returns whether it is selected afterwards.
    pub fn toggle(&mut self, target: TargetRef) -> bool {
        match self.selected.iter().position(|t| t == &target) {
            Some(index) => {
                self.selected.remove(index);
                false
            }
            None => {
                self.selected.push(target);
                true
            }
        }
    }

    /// Split the selection into card and player targets.
    #[must_use]
    pub fn split(&self) -> (CardTargets, PlayerTargets) {
        let mut cards = CardTargets::new();
        let mut players = PlayerTargets::new();
        for target in &self.selected {
            match target {
                TargetRef::Card(id) => cards.push(id.clone()),
                TargetRef::Player(id) => players.push(id.clone()),
            }
        }
        (cards, players)
    }

    /// End the session and produce the action to dispatch.
    ///
    /// A manual session with nothing selected produces no action.
    #[must_use]
    pub fn finish(self) -> Option<Action> {
        let (target_ids, target_player_ids) = self.split();
        match self.mode {
            TargetMode::Cast => Some(Action::CastSpell {
                card_id: self.source,
                target_ids,
                target_player_ids,
            }),
            TargetMode::Ability => Some(Action::ActivateAbility {
                source_id: self.source,
                target_ids,
                target_player_ids,
            }),
            TargetMode::Manual if self.selected.is_empty() => None,
            TargetMode::Manual => Some(Action::AddTargets {
                source_id: self.source,
                targets: self.selected,
            }),
        }
    }

    /// Abandon the session. Nothing is dispatched.
    pub fn cancel(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_ref_string_form() {
        assert_eq!(TargetRef::from("player:u1".to_string()), TargetRef::player("u1"));
        assert_eq!(TargetRef::from("k3j9".to_string()), TargetRef::card("k3j9"));
        assert_eq!(String::from(TargetRef::player("u1")), "player:u1");

        let json = serde_json::to_string(&vec![TargetRef::card("c1"), TargetRef::player("p")]).unwrap();
        assert_eq!(json, r#"["c1","player:p"]"#);
    }

    #[test]
    fn test_toggle_is_order_preserving() {
        let mut session = TargetingSession::new(InstanceId::new("src"), TargetMode::Cast);
        assert!(session.toggle(TargetRef::card("a")));
        assert!(session.toggle(TargetRef::card("b")));
        assert!(session.toggle(TargetRef::player("p")));
        assert!(!session.toggle(TargetRef::card("a")));

        assert_eq!(session.selected(), &[TargetRef::card("b"), TargetRef::player("p")]);
        assert!(session.toggle(TargetRef::card("a")));
        assert_eq!(session.selected().last(), Some(&TargetRef::card("a")));
    }

    #[test]
    fn test_finish_cast_splits_by_kind() {
        let mut session = TargetingSession::new(InstanceId::new("bolt"), TargetMode::Cast);
        session.toggle(TargetRef::player("opp"));
        session.toggle(TargetRef::card("bear"));

        match session.finish() {
            Some(Action::CastSpell { card_id, target_ids, target_player_ids }) => {
                assert_eq!(card_id, InstanceId::new("bolt"));
                assert_eq!(target_ids.as_slice(), &[InstanceId::new("bear")]);
                assert_eq!(target_player_ids.as_slice(), &[PlayerId::new("opp")]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_finish_ability_and_manual() {
        let session = TargetingSession::new(InstanceId::new("src"), TargetMode::Ability);
        assert!(matches!(session.finish(), Some(Action::ActivateAbility { .. })));

        let session = TargetingSession::new(InstanceId::new("src"), TargetMode::Manual);
        assert_eq!(session.finish(), None);

        let mut session = TargetingSession::new(InstanceId::new("src"), TargetMode::Manual);
        session.toggle(TargetRef::card("x"));
        assert_eq!(
            session.finish(),
            Some(Action::AddTargets {
                source_id: InstanceId::new("src"),
                targets: vec![TargetRef::card("x")],
            })
        );
    }
}
