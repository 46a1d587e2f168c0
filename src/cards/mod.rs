//! Cards at the table and the catalog they come from.
//!
//! ## Key Types
//!
//! - `CardInstance`: one physical card or token (zone, owner, controller,
//!   table state, catalog fields)
//! - `Zone`: the seven card locations
//! - `CardCatalog`: fuzzy-name lookup used by deck import
//! - `StaticCatalog`: in-memory catalog

pub mod catalog;
pub mod instance;

pub use catalog::{
    import_deck, parse_decklist, CardCatalog, CatalogEntry, CatalogError, DeckLine, ImportedDeck,
    StaticCatalog,
};
pub use instance::{CardInstance, Zone};
