//! Card instances - runtime card state.
//!
//! `CardInstance` is one physical card (or token) at the table. It carries
//! its permanent owner, its current controller, the zone it sits in, the
//! table-level state players toggle (tapped, face-down, counters, board
//! position) and the descriptive fields copied from the catalog when the
//! card was created.
//!
//! ## Zones
//!
//! Every instance is in exactly one [`Zone`]. The only way to change the
//! zone is a zone transition (see `zones::manager`), which also applies the
//! resets that go with leaving or entering a zone.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::catalog::CatalogEntry;
use crate::core::entity::InstanceId;
use crate::core::player::PlayerId;

/// Where a card currently lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Library,
    Hand,
    Battlefield,
    Graveyard,
    Exile,
    Command,
    /// Transient location of a spell between casting and resolution.
    StackZone,
}

impl Zone {
    pub const ALL: [Zone; 7] = [
        Zone::Library,
        Zone::Hand,
        Zone::Battlefield,
        Zone::Graveyard,
        Zone::Exile,
        Zone::Command,
        Zone::StackZone,
    ];

    /// Wire name of the zone.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Zone::Library => "library",
            Zone::Hand => "hand",
            Zone::Battlefield => "battlefield",
            Zone::Graveyard => "graveyard",
            Zone::Exile => "exile",
            Zone::Command => "command",
            Zone::StackZone => "stack_zone",
        }
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A card instance in a game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardInstance {
    /// Unique id of this instance.
    pub instance_id: InstanceId,

    /// Who brought the card. Never changes.
    pub owner_id: PlayerId,

    /// Who currently directs the card.
    pub controller_id: PlayerId,

    /// Current zone.
    pub zone: Zone,

    #[serde(default)]
    pub tapped: bool,

    #[serde(default)]
    pub face_down: bool,

    /// Labelled counters. A label whose count reaches zero is removed.
    #[serde(default)]
    pub counters: FxHashMap<String, u32>,

    /// Board position in percent of the board width (battlefield only).
    #[serde(default)]
    pub x: f64,

    /// Board position in percent of the board height (battlefield only).
    #[serde(default)]
    pub y: f64,

    /// Created ad hoc rather than imported from a deck.
    #[serde(default)]
    pub is_token: bool,

    // === Catalog fields (copied at creation, otherwise immutable) ===
    #[serde(default)]
    pub catalog_id: Option<String>,

    #[serde(default)]
    pub name: String,

    #[serde(default, rename = "mana_cost")]
    pub mana_cost: Option<String>,

    #[serde(default, rename = "type_line")]
    pub type_line: Option<String>,

    #[serde(default, rename = "image_uri")]
    pub image_uri: Option<String>,

    #[serde(default)]
    pub power: Option<String>,

    #[serde(default)]
    pub toughness: Option<String>,
}

impl CardInstance {
    /// Create a blank card owned and controlled by `owner`.
    ///
    /// Use the `with_*` builders to fill in catalog fields.
    #[must_use]
    pub fn new(instance_id: InstanceId, owner: PlayerId, zone: Zone) -> Self {
        Self {
            instance_id,
            controller_id: owner.clone(),
            owner_id: owner,
            zone,
            tapped: false,
            face_down: false,
            counters: FxHashMap::default(),
            x: 0.0,
            y: 0.0,
            is_token: false,
            catalog_id: None,
            name: String::new(),
            mana_cost: None,
            type_line: None,
            image_uri: None,
            power: None,
            toughness: None,
        }
    }

    /// Set the card name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the type line.
    #[must_use]
    pub fn with_type_line(mut self, type_line: impl Into<String>) -> Self {
        self.type_line = Some(type_line.into());
        self
    }

    /// Copy every descriptive field from a catalog entry.
    #[must_use]
    pub fn with_catalog(mut self, entry: &CatalogEntry) -> Self {
        self.catalog_id = entry.id.clone();
        self.name = entry.name.clone();
        self.mana_cost = entry.mana_cost.clone();
        self.type_line = entry.type_line.clone();
        self.image_uri = entry.image_uri.clone();
        self.power = entry.power.clone();
        self.toughness = entry.toughness.clone();
        self
    }

    /// Set the board position.
    #[must_use]
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Whether the type line names a land (case-insensitive).
    #[must_use]
    pub fn is_land(&self) -> bool {
        self.type_line
            .as_deref()
            .is_some_and(|t| t.to_lowercase().contains("land"))
    }

    /// Whether the card stays on the battlefield when it resolves.
    ///
    /// Anything that is neither an `Instant` nor a `Sorcery` is a permanent.
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        let type_line = self.type_line.as_deref().unwrap_or("");
        !type_line.contains("Instant") && !type_line.contains("Sorcery")
    }

    /// Count for a counter label (zero when absent).
    #[must_use]
    pub fn counter(&self, label: &str) -> u32 {
        self.counters.get(label).copied().unwrap_or(0)
    }

    /// Add `delta` to a counter, flooring at zero.
    ///
    /// A counter that ends at zero is removed from the map.
    pub fn modify_counter(&mut self, label: &str, delta: i64) -> u32 {
        let value = i64::from(self.counter(label))
            .saturating_add(delta)
            .clamp(0, i64::from(u32::MAX)) as u32;
        if value == 0 {
            self.counters.remove(label);
        } else {
            self.counters.insert(label.to_string(), value);
        }
        value
    }

    /// Whether `player` controls this card.
    #[must_use]
    pub fn is_controlled_by(&self, player: &PlayerId) -> bool {
        &self.controller_id == player
    }

    /// Whether `player` owns this card.
    #[must_use]
    pub fn is_owned_by(&self, player: &PlayerId) -> bool {
        &self.owner_id == player
    }
}
