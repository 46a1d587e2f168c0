//! Library operations: shuffle, reorder-top, mulligan.
//!
//! All of these rewrite the global card sequence, because the library
//! order is defined by it (see `manager`).

use crate::cards::Zone;
use crate::core::entity::InstanceId;
use crate::core::player::PlayerId;
use crate::core::rng::GameRng;

use super::manager::ZoneManager;

impl ZoneManager {
    /// Shuffle `owner`'s library.
    ///
    /// Non-library cards keep their relative order and move ahead of the
    /// shuffled library. Returns the library size.
    pub fn shuffle_library(&mut self, owner: &PlayerId, rng: &mut GameRng) -> usize {
        let (mut library, others): (Vec<_>, Vec<_>) = self
            .cards()
            .iter()
            .cloned()
            .partition(|c| c.zone == Zone::Library && c.is_owned_by(owner));

        rng.shuffle(&mut library);
        let size = library.len();
        *self = ZoneManager::new(others.into_iter().chain(library).collect());
        size
    }

    /// Put the listed library cards on top of `owner`'s library, in order.
    ///
    /// Ids that are not in the library, or repeated, are ignored. The rest
    /// of the library keeps its order below them. Returns the number of
    /// cards placed on top.
    pub fn reorder_top(&mut self, owner: &PlayerId, ordered: &[InstanceId]) -> usize {
        let library = self.library_ids(owner);

        let mut top: Vec<InstanceId> = Vec::with_capacity(ordered.len());
        for id in ordered {
            if library.contains(id) && !top.contains(id) {
                top.push(id.clone());
            }
        }

        let queue: Vec<InstanceId> = top
            .iter()
            .cloned()
            .chain(library.into_iter().filter(|id| !top.contains(id)))
            .collect();

        // Library slots in the global sequence, refilled in the new order.
        let slots: Vec<usize> = self
            .cards()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.zone == Zone::Library && c.is_owned_by(owner))
            .map(|(i, _)| i)
            .collect();

        let reordered: Vec<_> = queue
            .iter()
            .filter_map(|id| self.get(id).cloned())
            .collect();

        let mut cards = self.cards().clone();
        for (slot, card) in slots.into_iter().zip(reordered) {
            cards.set(slot, card);
        }
        *self = ZoneManager::new(cards);
        top.len()
    }

    /// Mulligan for `player`.
    ///
    /// Their whole hand goes back into their library, the library is
    /// shuffled and the top `hand_size` cards (or the whole library, if
    /// smaller) are drawn. Returns the number drawn.
    pub fn mulligan(&mut self, player: &PlayerId, hand_size: usize, rng: &mut GameRng) -> usize {
        let hand: Vec<InstanceId> = self
            .in_zone(Zone::Hand, player)
            .map(|c| c.instance_id.clone())
            .collect();
        for id in &hand {
            self.move_to_zone(id, Zone::Library);
        }

        let size = self.shuffle_library(player, rng);
        let draw = hand_size.min(size);
        for _ in 0..draw {
            self.draw(player);
        }
        draw
    }
}
