//! Player identification and per-player table state.
//!
//! ## PlayerId
//!
//! Stable identity handed out by the authentication collaborator. The engine
//! never invents player ids; it only compares them.
//!
//! ## Player
//!
//! One seat at the table: name, life total, player counters, hand
//! visibility and chat read marker. Players are created when a game is
//! created or joined and are only ever updated in place.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::entity::Timestamp;

/// Stable player identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Wrap an identity issued by the auth collaborator.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identity.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Kinds of counters a player can accumulate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlayerCounter {
    Poison,
    Energy,
    Experience,
    CommanderTax,
}

impl PlayerCounter {
    /// All counter kinds, in display order.
    pub const ALL: [PlayerCounter; 4] = [
        PlayerCounter::Poison,
        PlayerCounter::Energy,
        PlayerCounter::Experience,
        PlayerCounter::CommanderTax,
    ];

    /// Wire name of the counter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PlayerCounter::Poison => "poison",
            PlayerCounter::Energy => "energy",
            PlayerCounter::Experience => "experience",
            PlayerCounter::CommanderTax => "commanderTax",
        }
    }
}

impl std::fmt::Display for PlayerCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A seat at the table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,

    pub name: String,

    /// Life total. May go negative; the engine does not adjudicate losses.
    pub life: i64,

    /// Seat index at join time (0 for the host, 1 for the second player).
    #[serde(default)]
    pub turn_order: usize,

    /// Player counters. Values never drop below zero.
    #[serde(default)]
    pub counters: FxHashMap<PlayerCounter, u32>,

    /// Whether the hand is shown to the opponent.
    #[serde(default)]
    pub hand_revealed: bool,

    /// Newest chat timestamp this player has seen.
    #[serde(default)]
    pub last_seen_chat_at: Timestamp,
}

impl Player {
    /// Create a fresh seat with every counter at zero.
    #[must_use]
    pub fn new(
        id: PlayerId,
        name: impl Into<String>,
        life: i64,
        turn_order: usize,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            life,
            turn_order,
            counters: PlayerCounter::ALL.iter().map(|&c| (c, 0)).collect(),
            hand_revealed: false,
            last_seen_chat_at: now,
        }
    }

    /// Get a counter value (zero when absent).
    #[must_use]
    pub fn counter(&self, kind: PlayerCounter) -> u32 {
        self.counters.get(&kind).copied().unwrap_or(0)
    }

    /// Add `delta` to a counter, flooring at zero. Returns the new value.
    pub fn modify_counter(&mut self, kind: PlayerCounter, delta: i64) -> u32 {
        let value = i64::from(self.counter(kind))
            .saturating_add(delta)
            .clamp(0, i64::from(u32::MAX)) as u32;
        self.counters.insert(kind, value);
        value
    }
}
