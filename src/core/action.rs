//! Action vocabulary.
//!
//! Every mutation a client can request is one variant of [`Action`]. On the
//! wire an action is adjacently tagged:
//!
//! ```json
//! { "type": "CAST_SPELL", "payload": { "cardId": "k3j9a0x1z", "targetIds": [] } }
//! ```
//!
//! Payload-less actions ignore whatever `payload` they arrive with, and may
//! omit it. A `type` this build does not know decodes to
//! [`Action::Unknown`] whatever its payload, and the reducer treats it as a
//! no-op.
//!
//! ## Log kinds
//!
//! Each logged action writes one entry whose `type` is a [`LogKind`].
//! Most actions log under their own name; dice use `FLIP_COIN` for coins,
//! chat uses `CHAT`, deck import uses `IMPORT` and manual targeting uses
//! `TARGET`.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};
use smallvec::SmallVec;

use super::entity::{InstanceId, Timestamp};
use super::player::{PlayerCounter, PlayerId};
use crate::cards::{CardInstance, Zone};
use crate::targeting::TargetRef;

/// Card targets carried by a cast or activation.
pub type CardTargets = SmallVec<[InstanceId; 2]>;

/// Player targets carried by a cast or activation.
pub type PlayerTargets = SmallVec<[PlayerId; 2]>;

/// Randomizer used by `ROLL_DICE`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiceType {
    Coin,
    D6,
    D20,
}

impl DiceType {
    /// Number of faces. A coin has two.
    #[must_use]
    pub const fn sides(self) -> u32 {
        match self {
            DiceType::Coin => 2,
            DiceType::D6 => 6,
            DiceType::D20 => 20,
        }
    }
}

/// End of the library a card is put on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LibraryPosition {
    Top,
    Bottom,
}

/// A requested table mutation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(
    remote = "Self",
    tag = "type",
    content = "payload",
    rename_all = "SCREAMING_SNAKE_CASE"
)]
pub enum Action {
    // === Table ===
    #[serde(rename_all = "camelCase")]
    RollDice { dice_type: DiceType },

    SendChat { text: String },

    SetChatSeen { timestamp: Timestamp },

    #[serde(rename_all = "camelCase")]
    MoveCardXy { card_id: InstanceId, x: f64, y: f64 },

    TidyBoard,

    // === Library ===
    #[serde(rename_all = "camelCase")]
    ShuffleLibrary {
        #[serde(default)]
        target_owner_id: Option<PlayerId>,
    },

    Mulligan,

    #[serde(rename_all = "camelCase")]
    ScryTop {
        #[serde(default)]
        target_owner_id: Option<PlayerId>,
    },

    #[serde(rename_all = "camelCase")]
    ScryBottom { card_id: InstanceId },

    ScryKeepTop,

    DrawCard,

    #[serde(rename_all = "camelCase")]
    MoveToLibrary {
        card_id: InstanceId,
        position: LibraryPosition,
    },

    #[serde(rename_all = "camelCase")]
    ReorderTopLibrary {
        owner_id: PlayerId,
        ordered_top_ids: Vec<InstanceId>,
    },

    #[serde(rename_all = "camelCase")]
    ImportDeck {
        cards: Vec<CardInstance>,
        line_count: usize,
    },

    // === Players ===
    #[serde(rename_all = "camelCase")]
    PlayerCounter {
        counter_type: PlayerCounter,
        amount: i64,
    },

    #[serde(rename_all = "camelCase")]
    LifeChange {
        target_player_id: PlayerId,
        amount: i64,
    },

    ToggleHandReveal,

    // === Cards ===
    CreateToken {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        power: Option<String>,
        #[serde(default)]
        toughness: Option<String>,
    },

    #[serde(rename_all = "camelCase")]
    CloneCard { card_id: InstanceId },

    #[serde(rename_all = "camelCase")]
    ModCounter {
        card_id: InstanceId,
        #[serde(default = "default_counter_label")]
        label: String,
        amount: i64,
    },

    #[serde(rename_all = "camelCase")]
    ToggleFace { card_id: InstanceId },

    #[serde(rename_all = "camelCase")]
    TapToggle { card_id: InstanceId },

    #[serde(rename_all = "camelCase")]
    ChangeControl { card_id: InstanceId },

    DiscardRandom,

    #[serde(rename_all = "camelCase")]
    PlayLand { card_id: InstanceId },

    #[serde(rename_all = "camelCase")]
    MoveZone {
        card_id: InstanceId,
        target_zone: Zone,
    },

    // === Stack and priority ===
    PassPriority,

    #[serde(rename_all = "camelCase")]
    CastSpell {
        card_id: InstanceId,
        #[serde(default)]
        target_ids: CardTargets,
        #[serde(default)]
        target_player_ids: PlayerTargets,
    },

    #[serde(rename_all = "camelCase")]
    ActivateAbility {
        source_id: InstanceId,
        #[serde(default)]
        target_ids: CardTargets,
        #[serde(default)]
        target_player_ids: PlayerTargets,
    },

    // === Reveals and targets ===
    #[serde(rename_all = "camelCase")]
    RevealCard { card_id: InstanceId },

    RevealAllHand,

    ClearReveals,

    #[serde(rename_all = "camelCase")]
    AddTargets {
        source_id: InstanceId,
        targets: Vec<TargetRef>,
    },

    #[serde(rename_all = "camelCase")]
    ClearTargets { card_id: InstanceId },

    /// Any action this build does not recognize.
    #[serde(other)]
    Unknown,
}

fn default_counter_label() -> String {
    "default".to_string()
}

/// Outer shape of every action on the wire.
#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Value,
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Action::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let Envelope { kind, payload } = Envelope::deserialize(deserializer)?;
        let tagged = |payload: Value| json!({ "type": kind, "payload": payload });

        match Action::deserialize(tagged(payload)) {
            Ok(action) => Ok(action),
            // Only unit variants and unknown types decode from a null payload.
            Err(err) => Action::deserialize(tagged(Value::Null)).map_err(|_| D::Error::custom(err)),
        }
    }
}

impl Action {
    /// Whether this action is subject to the priority guard.
    #[must_use]
    pub fn needs_priority(&self) -> bool {
        matches!(
            self,
            Action::CastSpell { .. } | Action::ActivateAbility { .. } | Action::PassPriority
        )
    }

    /// Whether this action never writes a log entry.
    ///
    /// These are the high-frequency identity or visibility actions.
    #[must_use]
    pub fn is_unlogged(&self) -> bool {
        matches!(
            self,
            Action::SetChatSeen { .. }
                | Action::MoveCardXy { .. }
                | Action::ModCounter { .. }
                | Action::TapToggle { .. }
                | Action::ToggleFace { .. }
                | Action::Unknown
        )
    }

    /// Default log kind for this action.
    #[must_use]
    pub fn log_kind(&self) -> LogKind {
        match self {
            Action::RollDice { .. } => LogKind::RollDice,
            Action::SendChat { .. } => LogKind::Chat,
            Action::SetChatSeen { .. } => LogKind::SetChatSeen,
            Action::MoveCardXy { .. } => LogKind::MoveCardXy,
            Action::TidyBoard => LogKind::TidyBoard,
            Action::ShuffleLibrary { .. } => LogKind::ShuffleLibrary,
            Action::Mulligan => LogKind::Mulligan,
            Action::ScryTop { .. } => LogKind::ScryTop,
            Action::ScryBottom { .. } => LogKind::ScryBottom,
            Action::ScryKeepTop => LogKind::ScryKeepTop,
            Action::DrawCard => LogKind::DrawCard,
            Action::MoveToLibrary { .. } => LogKind::MoveToLibrary,
            Action::ReorderTopLibrary { .. } => LogKind::ReorderTopLibrary,
            Action::ImportDeck { .. } => LogKind::Import,
            Action::PlayerCounter { .. } => LogKind::PlayerCounter,
            Action::LifeChange { .. } => LogKind::LifeChange,
            Action::ToggleHandReveal => LogKind::ToggleHandReveal,
            Action::CreateToken { .. } => LogKind::CreateToken,
            Action::CloneCard { .. } => LogKind::CloneCard,
            Action::ModCounter { .. } => LogKind::ModCounter,
            Action::ToggleFace { .. } => LogKind::ToggleFace,
            Action::TapToggle { .. } => LogKind::TapToggle,
            Action::ChangeControl { .. } => LogKind::ChangeControl,
            Action::DiscardRandom => LogKind::DiscardRandom,
            Action::PlayLand { .. } => LogKind::PlayLand,
            Action::MoveZone { .. } => LogKind::MoveZone,
            Action::PassPriority => LogKind::PassPriority,
            Action::CastSpell { .. } => LogKind::CastSpell,
            Action::ActivateAbility { .. } => LogKind::ActivateAbility,
            Action::RevealCard { .. } | Action::RevealAllHand => LogKind::RevealCard,
            Action::ClearReveals => LogKind::ClearReveals,
            Action::AddTargets { .. } => LogKind::Target,
            Action::ClearTargets { .. } => LogKind::ClearTargets,
            Action::Unknown => LogKind::Unknown,
        }
    }
}

/// `type` of a log entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogKind {
    RollDice,
    FlipCoin,
    Chat,
    SetChatSeen,
    MoveCardXy,
    TidyBoard,
    ShuffleLibrary,
    Mulligan,
    ScryTop,
    ScryBottom,
    ScryKeepTop,
    DrawCard,
    MoveToLibrary,
    ReorderTopLibrary,
    Import,
    PlayerCounter,
    LifeChange,
    ToggleHandReveal,
    CreateToken,
    CloneCard,
    ModCounter,
    ToggleFace,
    TapToggle,
    ChangeControl,
    DiscardRandom,
    PlayLand,
    MoveZone,
    PassPriority,
    CastSpell,
    ActivateAbility,
    RevealCard,
    ClearReveals,
    Target,
    ClearTargets,
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cast_spell_wire_shape() {
        let action: Action = serde_json::from_value(json!({
            "type": "CAST_SPELL",
            "payload": { "cardId": "c1", "targetIds": ["c2"], "targetPlayerIds": ["p2"] }
        }))
        .unwrap();

        match action {
            Action::CastSpell { card_id, target_ids, target_player_ids } => {
                assert_eq!(card_id.as_str(), "c1");
                assert_eq!(target_ids.as_slice(), &[InstanceId::new("c2")]);
                assert_eq!(target_player_ids.as_slice(), &[PlayerId::new("p2")]);
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_optional_targets_default_empty() {
        let action: Action =
            serde_json::from_value(json!({ "type": "CAST_SPELL", "payload": { "cardId": "c1" } }))
                .unwrap();
        assert_eq!(
            action,
            Action::CastSpell {
                card_id: InstanceId::new("c1"),
                target_ids: CardTargets::new(),
                target_player_ids: PlayerTargets::new(),
            }
        );
    }

    #[test]
    fn test_unit_actions_without_payload() {
        let action: Action = serde_json::from_value(json!({ "type": "PASS_PRIORITY" })).unwrap();
        assert_eq!(action, Action::PassPriority);

        let action: Action = serde_json::from_value(json!({ "type": "MULLIGAN" })).unwrap();
        assert_eq!(action, Action::Mulligan);
    }

    #[test]
    fn test_unit_actions_ignore_payload() {
        let action: Action =
            serde_json::from_value(json!({ "type": "PASS_PRIORITY", "payload": {} })).unwrap();
        assert_eq!(action, Action::PassPriority);

        let action: Action =
            serde_json::from_value(json!({ "type": "DRAW_CARD", "payload": { "count": 1 } })).unwrap();
        assert_eq!(action, Action::DrawCard);

        let action: Action =
            serde_json::from_value(json!({ "type": "MULLIGAN", "payload": null })).unwrap();
        assert_eq!(action, Action::Mulligan);
    }

    #[test]
    fn test_unknown_action_decodes() {
        let action: Action = serde_json::from_value(json!({ "type": "SUMMON_DRAGON" })).unwrap();
        assert_eq!(action, Action::Unknown);

        let action: Action =
            serde_json::from_value(json!({ "type": "SUMMON", "payload": { "x": 1 } })).unwrap();
        assert_eq!(action, Action::Unknown);
    }

    #[test]
    fn test_bad_payload_is_still_an_error() {
        let err = serde_json::from_value::<Action>(json!({
            "type": "MOVE_ZONE", "payload": { "targetZone": "exile" }
        }))
        .unwrap_err();
        assert!(err.to_string().contains("cardId"));

        assert!(serde_json::from_value::<Action>(json!({ "type": "CAST_SPELL" })).is_err());
        assert!(serde_json::from_value::<Action>(json!({ "payload": {} })).is_err());
    }

    #[test]
    fn test_payload_field_names() {
        let action = Action::MoveToLibrary {
            card_id: InstanceId::new("c1"),
            position: LibraryPosition::Top,
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "MOVE_TO_LIBRARY");
        assert_eq!(json["payload"]["cardId"], "c1");
        assert_eq!(json["payload"]["position"], "TOP");

        let action: Action = serde_json::from_value(json!({
            "type": "ROLL_DICE", "payload": { "diceType": "d20" }
        }))
        .unwrap();
        assert_eq!(action, Action::RollDice { dice_type: DiceType::D20 });

        let action: Action = serde_json::from_value(json!({
            "type": "PLAYER_COUNTER", "payload": { "counterType": "commanderTax", "amount": 2 }
        }))
        .unwrap();
        assert_eq!(
            action,
            Action::PlayerCounter { counter_type: PlayerCounter::CommanderTax, amount: 2 }
        );
    }

    #[test]
    fn test_mod_counter_label_defaults() {
        let action: Action = serde_json::from_value(json!({
            "type": "MOD_COUNTER", "payload": { "cardId": "c1", "amount": 1 }
        }))
        .unwrap();
        match action {
            Action::ModCounter { label, .. } => assert_eq!(label, "default"),
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_classification() {
        assert!(Action::PassPriority.needs_priority());
        assert!(!Action::DrawCard.needs_priority());
        assert!(Action::TapToggle { card_id: InstanceId::new("c") }.is_unlogged());
        assert!(!Action::TidyBoard.is_unlogged());
        assert_eq!(Action::RevealAllHand.log_kind(), LogKind::RevealCard);
        assert_eq!(
            serde_json::to_value(LogKind::FlipCoin).unwrap(),
            json!("FLIP_COIN")
        );
    }
}
