//! Battlefield layout.
//!
//! Each controller's battlefield is packed on two grids. Lands fill the
//! lower half of the board six to a row; everything else fills the top five
//! to a row. Coordinates are percentages of the board and stay in
//! `[BOARD_MIN, BOARD_MAX]`.

use crate::cards::{CardInstance, Zone};
use crate::core::entity::InstanceId;
use crate::core::player::PlayerId;

use super::manager::ZoneManager;

pub const BOARD_MIN: f64 = 0.0;
pub const BOARD_MAX: f64 = 90.0;

/// Clamp a coordinate onto the board.
#[must_use]
pub fn clamp_to_board(v: f64) -> f64 {
    if v.is_nan() {
        return BOARD_MIN;
    }
    v.clamp(BOARD_MIN, BOARD_MAX)
}

/// A packing grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardGrid {
    pub per_row: usize,
    pub column_width: f64,
    pub row_height: f64,
    pub x_offset: f64,
    pub y_offset: f64,
}

impl BoardGrid {
    pub const LANDS: BoardGrid = BoardGrid {
        per_row: 6,
        column_width: 15.0,
        row_height: 15.0,
        x_offset: 5.0,
        y_offset: 60.0,
    };

    pub const NON_LANDS: BoardGrid = BoardGrid {
        per_row: 5,
        column_width: 18.0,
        row_height: 20.0,
        x_offset: 5.0,
        y_offset: 10.0,
    };

    /// Grid a card is packed on.
    #[must_use]
    pub fn for_card(card: &CardInstance) -> &'static BoardGrid {
        if card.is_land() {
            &Self::LANDS
        } else {
            &Self::NON_LANDS
        }
    }

    /// Coordinates of slot `index`.
    ///
    /// Rows past the bottom edge stack on the last on-board row.
    #[must_use]
    pub fn slot(&self, index: usize) -> (f64, f64) {
        let column = (index % self.per_row) as f64;
        let row = (index / self.per_row) as f64;
        (
            clamp_to_board(column * self.column_width + self.x_offset),
            clamp_to_board(row * self.row_height + self.y_offset),
        )
    }
}

impl ZoneManager {
    /// Next free slot for `card` on `controller`'s battlefield.
    ///
    /// Counts the controller's battlefield cards of the same category,
    /// excluding `card` itself.
    #[must_use]
    pub fn next_slot(&self, card: &CardInstance, controller: &PlayerId) -> (f64, f64) {
        let land = card.is_land();
        let occupied = self
            .in_zone(Zone::Battlefield, controller)
            .filter(|c| c.instance_id != card.instance_id && c.is_land() == land)
            .count();
        BoardGrid::for_card(card).slot(occupied)
    }

    /// Position a card in its controller's next free battlefield slot.
    pub fn place_on_battlefield(&mut self, id: &InstanceId) -> bool {
        let Some(card) = self.get(id) else {
            return false;
        };
        let (x, y) = self.next_slot(card, &card.controller_id);
        self.update(id, |c| {
            c.x = x;
            c.y = y;
        })
    }

    /// Re-pack every battlefield card `controller` controls.
    ///
    /// Returns the number of cards positioned.
    pub fn tidy(&mut self, controller: &PlayerId) -> usize {
        let (lands, others): (Vec<_>, Vec<_>) = self
            .in_zone(Zone::Battlefield, controller)
            .map(|c| (c.instance_id.clone(), c.is_land()))
            .partition(|(_, land)| *land);

        let placements: Vec<(InstanceId, (f64, f64))> = others
            .into_iter()
            .enumerate()
            .map(|(i, (id, _))| (id, BoardGrid::NON_LANDS.slot(i)))
            .chain(
                lands
                    .into_iter()
                    .enumerate()
                    .map(|(i, (id, _))| (id, BoardGrid::LANDS.slot(i))),
            )
            .collect();

        for (id, (x, y)) in &placements {
            self.update(id, |c| {
                c.x = *x;
                c.y = *y;
            });
        }
        placements.len()
    }
}
