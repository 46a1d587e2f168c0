//! Table configuration and the turn structure.
//!
//! - `PhaseId`: the fixed twelve-phase turn cycle
//! - `TableConfig`: starting life, seat limit, hand size and the other
//!   numbers the reducer and the lobby need
//!
//! `TableConfig` can be built in code with the `with_*` builders or loaded
//! from JSON; missing JSON fields fall back to the defaults.

use serde::{Deserialize, Serialize};

/// Phases of a turn, in order.
///
/// Passing priority with an empty stack moves to [`PhaseId::next`];
/// `Cleanup` wraps to `Untap`, which starts the next turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseId {
    Untap,
    Upkeep,
    Draw,
    #[default]
    Main1,
    CombatBegin,
    CombatAttackers,
    CombatBlockers,
    CombatDamage,
    CombatEnd,
    Main2,
    End,
    Cleanup,
}

impl PhaseId {
    /// The full cycle, starting at `Untap`.
    pub const CYCLE: [PhaseId; 12] = [
        PhaseId::Untap,
        PhaseId::Upkeep,
        PhaseId::Draw,
        PhaseId::Main1,
        PhaseId::CombatBegin,
        PhaseId::CombatAttackers,
        PhaseId::CombatBlockers,
        PhaseId::CombatDamage,
        PhaseId::CombatEnd,
        PhaseId::Main2,
        PhaseId::End,
        PhaseId::Cleanup,
    ];

    /// Position of this phase in [`PhaseId::CYCLE`].
    #[must_use]
    pub fn index(self) -> usize {
        Self::CYCLE.iter().position(|&p| p == self).unwrap_or(0)
    }

    /// The phase that follows this one, wrapping after `Cleanup`.
    #[must_use]
    pub fn next(self) -> PhaseId {
        Self::CYCLE[(self.index() + 1) % Self::CYCLE.len()]
    }

    /// Human-readable label used in log entries.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            PhaseId::Untap => "Untap",
            PhaseId::Upkeep => "Upkeep",
            PhaseId::Draw => "Draw",
            PhaseId::Main1 => "Main 1",
            PhaseId::CombatBegin => "Begin Combat",
            PhaseId::CombatAttackers => "Attackers",
            PhaseId::CombatBlockers => "Blockers",
            PhaseId::CombatDamage => "Damage",
            PhaseId::CombatEnd => "End Combat",
            PhaseId::Main2 => "Main 2",
            PhaseId::End => "End Step",
            PhaseId::Cleanup => "Cleanup",
        }
    }
}

impl std::fmt::Display for PhaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Table configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableConfig {
    /// Life total of a freshly seated player.
    pub starting_life: i64,

    /// Seats at the table. Priority rotation needs exactly two.
    pub max_players: usize,

    /// Cards drawn back after a mulligan.
    pub opening_hand_size: usize,

    /// Smallest top-of-library reorder.
    pub reorder_min: usize,

    /// Largest top-of-library reorder.
    pub reorder_max: usize,

    /// How long a rejection notice stays visible.
    pub notice_ttl_ms: i64,

    /// Optimistic retries for the join transaction.
    pub join_attempts: u32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            starting_life: 20,
            max_players: 2,
            opening_hand_size: 7,
            reorder_min: 2,
            reorder_max: 10,
            notice_ttl_ms: 2_000,
            join_attempts: 5,
        }
    }
}

impl TableConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from JSON. Absent fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Set the starting life total.
    #[must_use]
    pub fn with_starting_life(mut self, life: i64) -> Self {
        self.starting_life = life;
        self
    }

    /// Set the mulligan hand size.
    #[must_use]
    pub fn with_opening_hand_size(mut self, size: usize) -> Self {
        self.opening_hand_size = size;
        self
    }

    /// Set the allowed reorder range.
    #[must_use]
    pub fn with_reorder_range(mut self, min: usize, max: usize) -> Self {
        self.reorder_min = min;
        self.reorder_max = max.max(min);
        self
    }

    /// Set the notice lifetime.
    #[must_use]
    pub fn with_notice_ttl_ms(mut self, ttl: i64) -> Self {
        self.notice_ttl_ms = ttl;
        self
    }

    /// Set how many times a join is retried on a version conflict.
    #[must_use]
    pub fn with_join_attempts(mut self, attempts: u32) -> Self {
        self.join_attempts = attempts.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_cycle_wraps() {
        assert_eq!(PhaseId::Untap.next(), PhaseId::Upkeep);
        assert_eq!(PhaseId::Main1.next(), PhaseId::CombatBegin);
        assert_eq!(PhaseId::Cleanup.next(), PhaseId::Untap);

        let mut phase = PhaseId::Untap;
        for _ in 0..PhaseId::CYCLE.len() {
            phase = phase.next();
        }
        assert_eq!(phase, PhaseId::Untap);
    }

    #[test]
    fn test_phase_wire_names() {
        let json = serde_json::to_string(&PhaseId::CombatBegin).unwrap();
        assert_eq!(json, "\"combat_begin\"");

        let phase: PhaseId = serde_json::from_str("\"main2\"").unwrap();
        assert_eq!(phase, PhaseId::Main2);
        assert_eq!(phase.label(), "Main 2");
    }

    #[test]
    fn test_default_phase_is_main1() {
        assert_eq!(PhaseId::default(), PhaseId::Main1);
    }

    #[test]
    fn test_config_defaults() {
        let config = TableConfig::default();
        assert_eq!(config.starting_life, 20);
        assert_eq!(config.max_players, 2);
        assert_eq!(config.opening_hand_size, 7);
        assert_eq!((config.reorder_min, config.reorder_max), (2, 10));
    }

    #[test]
    fn test_config_builder() {
        let config = TableConfig::new()
            .with_starting_life(40)
            .with_reorder_range(3, 1)
            .with_join_attempts(0);

        assert_eq!(config.starting_life, 40);
        assert_eq!((config.reorder_min, config.reorder_max), (3, 3));
        assert_eq!(config.join_attempts, 1);
    }

    #[test]
    fn test_config_from_partial_json() {
        let config = TableConfig::from_json_str(r#"{ "startingLife": 30 }"#).unwrap();
        assert_eq!(config.starting_life, 30);
        assert_eq!(config.opening_hand_size, 7);

        assert!(TableConfig::from_json_str("not json").is_err());
    }
}
