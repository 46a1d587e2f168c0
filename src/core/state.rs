//! The game document and the patches applied to it.
//!
//! ## GameState
//!
//! One document per session, keyed by its [`GameCode`]. Every client
//! renders the same document; the store is the only source of truth.
//!
//! Uses `im` persistent vectors so the reducer can build a replacement
//! `cards` or `players` sequence without copying the untouched elements.
//!
//! ## StateUpdate
//!
//! A reducer never returns a whole new document. It returns a
//! [`StateUpdate`] naming only the top-level fields it changed. Sequence
//! fields written concurrently by several clients (`stack`, `targets`,
//! `reveals`) carry a [`SeqUpdate`] so appends merge instead of clobbering;
//! the `log` is append-only and can only grow.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::action::LogKind;
use super::config::{PhaseId, TableConfig};
use super::entity::{GameCode, InstanceId, RecordId, Timestamp};
use super::player::{Player, PlayerId};
use crate::cards::CardInstance;
use crate::stack::StackItem;
use crate::targeting::TargetRecord;

/// Immutable game-log line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub timestamp: Timestamp,
    pub player_id: PlayerId,
    pub player_name: String,
    #[serde(rename = "type")]
    pub kind: LogKind,
    pub desc: String,
    #[serde(default)]
    pub card_image: Option<String>,
    /// Chat body (only on `CHAT` entries).
    #[serde(default)]
    pub text: Option<String>,
}

impl LogEntry {
    #[must_use]
    pub fn new(
        timestamp: Timestamp,
        player_id: PlayerId,
        player_name: impl Into<String>,
        kind: LogKind,
        desc: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            player_id,
            player_name: player_name.into(),
            kind,
            desc: desc.into(),
            card_image: None,
            text: None,
        }
    }

    #[must_use]
    pub fn with_card_image(mut self, image: Option<String>) -> Self {
        self.card_image = image;
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Whether this entry is a chat message.
    #[must_use]
    pub fn is_chat(&self) -> bool {
        self.kind == LogKind::Chat
    }
}

/// A card shown to the whole table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealRecord {
    pub id: RecordId,
    pub card_id: InstanceId,
    pub card_name: String,
    #[serde(default)]
    pub card_image: Option<String>,
    pub revealer_id: PlayerId,
    pub revealer_name: String,
    pub timestamp: Timestamp,
}

/// The shared game document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub id: GameCode,
    pub host_id: PlayerId,
    pub created_at: Timestamp,

    /// Seats in join order. At most two.
    pub players: Vector<Player>,

    /// Every card instance. For each owner, the relative order of that
    /// owner's library cards in this sequence is the library order (first
    /// is top).
    pub cards: Vector<CardInstance>,

    // === Turn structure ===
    pub phase: PhaseId,
    pub turn_number: u32,
    pub active_player_index: usize,
    pub turn_player_id: PlayerId,
    pub priority_index: usize,
    pub priority_player_id: PlayerId,
    pub consecutive_passes: u32,

    /// Pending spells and abilities. The last element is the top.
    pub stack: Vector<StackItem>,

    /// Persistent manual targeting arrows.
    pub targets: Vector<TargetRecord>,

    pub reveals: Vector<RevealRecord>,

    /// Append-only game log.
    pub log: Vector<LogEntry>,
}

impl GameState {
    /// Create a fresh game with the host in seat 0.
    ///
    /// The host holds the turn and priority. The game starts in `main1`
    /// of turn 1 with no cards.
    #[must_use]
    pub fn new(
        id: GameCode,
        host_id: PlayerId,
        host_name: impl Into<String>,
        now: Timestamp,
        config: &TableConfig,
    ) -> Self {
        let host = Player::new(host_id.clone(), host_name, config.starting_life, 0, now);
        Self {
            id,
            host_id: host_id.clone(),
            created_at: now,
            players: Vector::unit(host),
            cards: Vector::new(),
            phase: PhaseId::Main1,
            turn_number: 1,
            active_player_index: 0,
            turn_player_id: host_id.clone(),
            priority_index: 0,
            priority_player_id: host_id,
            consecutive_passes: 0,
            stack: Vector::new(),
            targets: Vector::new(),
            reveals: Vector::new(),
            log: Vector::new(),
        }
    }

    // === Players ===

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Whether priority rotation is in force (two seats filled).
    #[must_use]
    pub fn is_multiplayer(&self) -> bool {
        self.players.len() >= 2
    }

    #[must_use]
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    #[must_use]
    pub fn player_index(&self, id: &PlayerId) -> Option<usize> {
        self.players.iter().position(|p| &p.id == id)
    }

    /// The first seated player other than `id`.
    #[must_use]
    pub fn opponent_of(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id != id)
    }

    /// Display name of a player, `"Unknown"` when not seated.
    #[must_use]
    pub fn player_name(&self, id: &PlayerId) -> String {
        self.player(id)
            .map_or_else(|| "Unknown".to_string(), |p| p.name.clone())
    }

    /// Whether `id` currently holds priority.
    #[must_use]
    pub fn has_priority(&self, id: &PlayerId) -> bool {
        &self.priority_player_id == id
    }

    /// Whether it is `id`'s turn.
    #[must_use]
    pub fn is_turn_of(&self, id: &PlayerId) -> bool {
        &self.turn_player_id == id
    }

    // === Cards ===

    #[must_use]
    pub fn card(&self, id: &InstanceId) -> Option<&CardInstance> {
        self.cards.iter().find(|c| &c.instance_id == id)
    }

    #[must_use]
    pub fn card_index(&self, id: &InstanceId) -> Option<usize> {
        self.cards.iter().position(|c| &c.instance_id == id)
    }

    // === Stack ===

    /// The item that resolves next.
    #[must_use]
    pub fn top_of_stack(&self) -> Option<&StackItem> {
        self.stack.last()
    }

    // === Chat ===

    /// Chat messages from other players newer than `id`'s read marker.
    #[must_use]
    pub fn unread_chat(&self, id: &PlayerId) -> usize {
        let seen = self
            .player(id)
            .map_or(Timestamp::default(), |p| p.last_seen_chat_at);
        self.log
            .iter()
            .filter(|e| e.is_chat() && &e.player_id != id && e.timestamp > seen)
            .count()
    }

    /// Newest chat timestamp in the log.
    #[must_use]
    pub fn latest_chat_at(&self) -> Option<Timestamp> {
        self.log.iter().filter(|e| e.is_chat()).map(|e| e.timestamp).max()
    }

    /// Return a copy of this state with `update` applied.
    #[must_use]
    pub fn applied(&self, update: &StateUpdate) -> GameState {
        let mut next = self.clone();
        update.apply(&mut next);
        next
    }
}

/// Patch for a sequence field.
#[derive(Clone, Debug, PartialEq)]
pub enum SeqUpdate<T: Clone> {
    /// Add elements not already present, keeping their order.
    ///
    /// This is a set union, matching the shared document's array-union
    /// write. Log entries equal in every field, such as one player drawing
    /// twice within the same millisecond, collapse into one entry.
    Append(Vector<T>),
    /// Replace the whole sequence.
    Replace(Vector<T>),
}

impl<T: Clone + PartialEq> SeqUpdate<T> {
    /// Apply to a sequence.
    pub fn apply(&self, target: &mut Vector<T>) {
        match self {
            SeqUpdate::Append(items) => {
                for item in items {
                    if !target.contains(item) {
                        target.push_back(item.clone());
                    }
                }
            }
            SeqUpdate::Replace(items) => *target = items.clone(),
        }
    }
}

/// Partial replacement of a [`GameState`].
///
/// `None` fields are left untouched when the update is applied.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StateUpdate {
    pub players: Option<Vector<Player>>,
    pub cards: Option<Vector<CardInstance>>,
    pub phase: Option<PhaseId>,
    pub turn_number: Option<u32>,
    pub active_player_index: Option<usize>,
    pub turn_player_id: Option<PlayerId>,
    pub priority_index: Option<usize>,
    pub priority_player_id: Option<PlayerId>,
    pub consecutive_passes: Option<u32>,
    pub stack: Option<SeqUpdate<StackItem>>,
    pub targets: Option<SeqUpdate<TargetRecord>>,
    pub reveals: Option<SeqUpdate<RevealRecord>>,
    /// Entries to append to the log.
    pub log: Vector<LogEntry>,
}

impl StateUpdate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether applying this update changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    #[must_use]
    pub fn with_log(mut self, entry: LogEntry) -> Self {
        self.log.push_back(entry);
        self
    }

    #[must_use]
    pub fn with_cards(mut self, cards: Vector<CardInstance>) -> Self {
        self.cards = Some(cards);
        self
    }

    #[must_use]
    pub fn with_players(mut self, players: Vector<Player>) -> Self {
        self.players = Some(players);
        self
    }

    /// Write every present field into `state`.
    pub fn apply(&self, state: &mut GameState) {
        if let Some(players) = &self.players {
            state.players = players.clone();
        }
        if let Some(cards) = &self.cards {
            state.cards = cards.clone();
        }
        if let Some(phase) = self.phase {
            state.phase = phase;
        }
        if let Some(turn) = self.turn_number {
            state.turn_number = turn;
        }
        if let Some(index) = self.active_player_index {
            state.active_player_index = index;
        }
        if let Some(id) = &self.turn_player_id {
            state.turn_player_id = id.clone();
        }
        if let Some(index) = self.priority_index {
            state.priority_index = index;
        }
        if let Some(id) = &self.priority_player_id {
            state.priority_player_id = id.clone();
        }
        if let Some(passes) = self.consecutive_passes {
            state.consecutive_passes = passes;
        }
        if let Some(stack) = &self.stack {
            stack.apply(&mut state.stack);
        }
        if let Some(targets) = &self.targets {
            targets.apply(&mut state.targets);
        }
        if let Some(reveals) = &self.reveals {
            reveals.apply(&mut state.reveals);
        }
        SeqUpdate::Append(self.log.clone()).apply(&mut state.log);
    }
}
