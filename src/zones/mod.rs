//! Card locations: zone transitions, battlefield layout and library
//! operations.
//!
//! ## Key Types
//!
//! - `ZoneManager`: working copy of a game's cards with movement and views
//! - `ZoneCounts`: per-zone card counts for one player
//! - `BoardGrid`: battlefield packing rule

pub mod layout;
pub mod library;
pub mod manager;

pub use layout::{clamp_to_board, BoardGrid, BOARD_MAX, BOARD_MIN};
pub use manager::{transition, zone_is_owner_keyed, ZoneCounts, ZoneManager, LIBRARY_POSITION};
