//! Zone manager for card locations and movement.
//!
//! The `ZoneManager` owns a working copy of the document's `cards`
//! sequence while an action is being reduced. It supports:
//! - Zone transitions with the resets that go with them
//! - The library view (per owner, top first)
//! - Per-player zone views and counts
//!
//! ## Library order
//!
//! There is no separate library list. A player's library is every card
//! they own whose zone is `library`, in the order those cards appear in
//! the global sequence. "Top" is the first such card and "bottom" is the
//! end of the global sequence.
//!
//! ## Transition resets
//!
//! Every zone change untaps the card. Leaving the battlefield hands control
//! back to the owner. Entering the library also turns the card face up,
//! clears its counters and parks it at the library position.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::{CardInstance, Zone};
use crate::core::action::LibraryPosition;
use crate::core::entity::InstanceId;
use crate::core::player::PlayerId;
use crate::core::state::GameState;

/// Board coordinates given to cards that enter the library.
pub const LIBRARY_POSITION: (f64, f64) = (5.0, 5.0);

/// Apply the resets for moving `card` into `to`.
///
/// Does nothing when the card is already in `to`.
pub fn transition(card: &mut CardInstance, to: Zone) {
    let from = card.zone;
    if from == to {
        return;
    }

    card.zone = to;
    card.tapped = false;

    if from == Zone::Battlefield || to == Zone::Library {
        card.controller_id = card.owner_id.clone();
    }
    if to == Zone::Library {
        card.face_down = false;
        card.counters.clear();
        card.x = LIBRARY_POSITION.0;
        card.y = LIBRARY_POSITION.1;
    }
}

/// Number of cards a player has in each zone.
///
/// Library, graveyard, exile and command are counted by owner; hand,
/// battlefield and stack by controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneCounts {
    pub library: usize,
    pub hand: usize,
    pub battlefield: usize,
    pub graveyard: usize,
    pub exile: usize,
    pub command: usize,
    pub stack: usize,
}

impl ZoneCounts {
    /// Count for one zone.
    #[must_use]
    pub fn get(&self, zone: Zone) -> usize {
        match zone {
            Zone::Library => self.library,
            Zone::Hand => self.hand,
            Zone::Battlefield => self.battlefield,
            Zone::Graveyard => self.graveyard,
            Zone::Exile => self.exile,
            Zone::Command => self.command,
            Zone::StackZone => self.stack,
        }
    }
}

/// Whether a zone's membership is keyed by owner rather than controller.
#[must_use]
pub fn zone_is_owner_keyed(zone: Zone) -> bool {
    matches!(
        zone,
        Zone::Library | Zone::Graveyard | Zone::Exile | Zone::Command
    )
}

/// Working copy of a game's cards.
///
/// ## Usage
///
/// ```
/// use duel_table::cards::{CardInstance, Zone};
/// use duel_table::core::{InstanceId, PlayerId};
/// use duel_table::zones::ZoneManager;
///
/// let alice = PlayerId::new("alice");
/// let mut zones = ZoneManager::default();
/// zones.push(CardInstance::new(InstanceId::new("a"), alice.clone(), Zone::Library));
/// zones.push(CardInstance::new(InstanceId::new("b"), alice.clone(), Zone::Library));
///
/// // The first library card in sequence order is the top
/// assert_eq!(zones.draw(&alice), Some(InstanceId::new("a")));
/// assert_eq!(zones.library_size(&alice), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ZoneManager {
    cards: Vector<CardInstance>,
}

impl ZoneManager {
    #[must_use]
    pub fn new(cards: Vector<CardInstance>) -> Self {
        Self { cards }
    }

    /// Start from a game's current cards.
    #[must_use]
    pub fn from_state(state: &GameState) -> Self {
        Self::new(state.cards.clone())
    }

    #[must_use]
    pub fn cards(&self) -> &Vector<CardInstance> {
        &self.cards
    }

    /// Finish and hand back the new `cards` sequence.
    #[must_use]
    pub fn into_cards(self) -> Vector<CardInstance> {
        self.cards
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    // === Lookup ===

    #[must_use]
    pub fn get(&self, id: &InstanceId) -> Option<&CardInstance> {
        self.cards.iter().find(|c| &c.instance_id == id)
    }

    #[must_use]
    pub fn index_of(&self, id: &InstanceId) -> Option<usize> {
        self.cards.iter().position(|c| &c.instance_id == id)
    }

    #[must_use]
    pub fn zone_of(&self, id: &InstanceId) -> Option<Zone> {
        self.get(id).map(|c| c.zone)
    }

    /// Cards in `zone` that belong to `player`, in sequence order.
    ///
    /// Membership follows [`zone_is_owner_keyed`].
    pub fn in_zone<'a>(
        &'a self,
        zone: Zone,
        player: &'a PlayerId,
    ) -> impl Iterator<Item = &'a CardInstance> + 'a {
        self.cards.iter().filter(move |c| {
            c.zone == zone
                && if zone_is_owner_keyed(zone) {
                    c.is_owned_by(player)
                } else {
                    c.is_controlled_by(player)
                }
        })
    }

    /// Per-zone counts for one player.
    #[must_use]
    pub fn counts(&self, player: &PlayerId) -> ZoneCounts {
        let count = |zone| self.in_zone(zone, player).count();
        ZoneCounts {
            library: count(Zone::Library),
            hand: count(Zone::Hand),
            battlefield: count(Zone::Battlefield),
            graveyard: count(Zone::Graveyard),
            exile: count(Zone::Exile),
            command: count(Zone::Command),
            stack: count(Zone::StackZone),
        }
    }

    // === Library view ===

    /// `owner`'s library, top first.
    pub fn library<'a>(&'a self, owner: &'a PlayerId) -> impl Iterator<Item = &'a CardInstance> + 'a {
        self.in_zone(Zone::Library, owner)
    }

    #[must_use]
    pub fn library_ids(&self, owner: &PlayerId) -> Vec<InstanceId> {
        self.library(owner).map(|c| c.instance_id.clone()).collect()
    }

    #[must_use]
    pub fn library_size(&self, owner: &PlayerId) -> usize {
        self.library(owner).count()
    }

    #[must_use]
    pub fn top_of_library<'a>(&'a self, owner: &'a PlayerId) -> Option<&'a CardInstance> {
        self.library(owner).next()
    }

    // === Mutation ===

    /// Append a new card to the end of the sequence.
    pub fn push(&mut self, card: CardInstance) {
        self.cards.push_back(card);
    }

    /// Edit one card in place. Returns `false` if the card does not exist.
    pub fn update<F>(&mut self, id: &InstanceId, f: F) -> bool
    where
        F: FnOnce(&mut CardInstance),
    {
        match self.index_of(id) {
            Some(index) => {
                if let Some(card) = self.cards.get_mut(index) {
                    f(card);
                }
                true
            }
            None => false,
        }
    }

    /// Move a card to another zone, applying the transition resets.
    ///
    /// Returns the zone the card was in, or `None` if it does not exist.
    /// The card keeps its place in the sequence.
    pub fn move_to_zone(&mut self, id: &InstanceId, to: Zone) -> Option<Zone> {
        let index = self.index_of(id)?;
        let card = self.cards.get_mut(index)?;
        let from = card.zone;
        transition(card, to);
        Some(from)
    }

    /// Put a card on the top or bottom of its owner's library.
    ///
    /// The card is moved to the front or the end of the global sequence,
    /// which is what makes it the top or bottom library card.
    pub fn move_to_library(&mut self, id: &InstanceId, position: LibraryPosition) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let mut card = self.cards.remove(index);
        transition(&mut card, Zone::Library);
        match position {
            LibraryPosition::Top => self.cards.push_front(card),
            LibraryPosition::Bottom => self.cards.push_back(card),
        }
        true
    }

    /// Move the top card of `owner`'s library to their hand.
    ///
    /// Returns the drawn card, or `None` when the library is empty.
    pub fn draw(&mut self, owner: &PlayerId) -> Option<InstanceId> {
        let id = self.top_of_library(owner)?.instance_id.clone();
        self.move_to_zone(&id, Zone::Hand);
        Some(id)
    }

    /// Untap every battlefield card `controller` controls.
    pub fn untap_all(&mut self, controller: &PlayerId) -> usize {
        let mut untapped = 0;
        for card in self.cards.iter_mut() {
            if card.zone == Zone::Battlefield && card.is_controlled_by(controller) && card.tapped {
                card.tapped = false;
                untapped += 1;
            }
        }
        untapped
    }
}
