//! Card catalog boundary and deck import.
//!
//! The catalog is an external collaborator: given a fuzzy card name it
//! returns the canonical name, mana cost, type line and image. The engine
//! only talks to it through [`CardCatalog`] and only at deck-import time.
//!
//! Lookup failures are per line: a decklist with one misspelled card still
//! imports everything else.

use log::warn;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::instance::{CardInstance, Zone};
use crate::core::player::PlayerId;
use crate::core::rng::GameRng;

/// Descriptive data for one card, as returned by the catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Catalog-side identifier, when the catalog has one.
    pub id: Option<String>,
    pub name: String,
    pub mana_cost: Option<String>,
    pub type_line: Option<String>,
    pub image_uri: Option<String>,
    pub power: Option<String>,
    pub toughness: Option<String>,
}

impl CatalogEntry {
    #[must_use]
    pub fn new(name: impl Into<String>, type_line: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_line: Some(type_line.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_mana_cost(mut self, cost: impl Into<String>) -> Self {
        self.mana_cost = Some(cost.into());
        self
    }

    #[must_use]
    pub fn with_image(mut self, uri: impl Into<String>) -> Self {
        self.image_uri = Some(uri.into());
        self
    }

    #[must_use]
    pub fn with_stats(mut self, power: impl Into<String>, toughness: impl Into<String>) -> Self {
        self.power = Some(power.into());
        self.toughness = Some(toughness.into());
        self
    }
}

/// Catalog lookup failure.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("no card matches {0:?}")]
    NotFound(String),
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Card-data lookup by fuzzy name.
pub trait CardCatalog {
    /// Resolve a fuzzy name to a catalog entry.
    fn lookup(&self, fuzzy_name: &str) -> Result<CatalogEntry, CatalogError>;
}

/// In-memory catalog.
///
/// Matching is case-insensitive: an exact name wins, then the first name
/// (alphabetically) starting with the query, then the first containing it.
#[derive(Clone, Debug, Default)]
pub struct StaticCatalog {
    entries: FxHashMap<String, CatalogEntry>,
}

impl StaticCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry (builder pattern).
    #[must_use]
    pub fn with_entry(mut self, entry: CatalogEntry) -> Self {
        self.insert(entry);
        self
    }

    pub fn insert(&mut self, entry: CatalogEntry) {
        self.entries.insert(entry.name.to_lowercase(), entry);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CardCatalog for StaticCatalog {
    fn lookup(&self, fuzzy_name: &str) -> Result<CatalogEntry, CatalogError> {
        let query = fuzzy_name.trim().to_lowercase();
        if query.is_empty() {
            return Err(CatalogError::NotFound(fuzzy_name.to_string()));
        }
        if let Some(entry) = self.entries.get(&query) {
            return Ok(entry.clone());
        }

        let mut names: Vec<&String> = self.entries.keys().collect();
        names.sort();

        names
            .iter()
            .find(|name| name.starts_with(&query))
            .or_else(|| names.iter().find(|name| name.contains(&query)))
            .and_then(|name| self.entries.get(*name))
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(fuzzy_name.to_string()))
    }
}

/// One parsed decklist line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeckLine {
    pub count: u32,
    pub name: String,
}

/// Parse a decklist.
///
/// Each non-blank line is either `"<count> <name>"` or just `"<name>"`
/// (count 1).
///
/// ```
/// use duel_table::cards::parse_decklist;
///
/// let lines = parse_decklist("4 Lightning Bolt\n\nSol Ring\n");
/// assert_eq!(lines.len(), 2);
/// assert_eq!(lines[0].count, 4);
/// assert_eq!(lines[1].name, "Sol Ring");
/// ```
#[must_use]
pub fn parse_decklist(text: &str) -> Vec<DeckLine> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let (head, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
            match head.parse::<u32>() {
                Ok(count) if !rest.trim().is_empty() => DeckLine {
                    count,
                    name: rest.trim().to_string(),
                },
                _ => DeckLine {
                    count: 1,
                    name: line.to_string(),
                },
            }
        })
        .collect()
}

/// Cards produced by a deck import.
#[derive(Clone, Debug, Default)]
pub struct ImportedDeck {
    /// New library cards, in decklist order.
    pub cards: Vec<CardInstance>,
    /// Non-blank decklist lines.
    pub line_count: usize,
    /// Names the catalog could not resolve.
    pub failed: Vec<String>,
}

/// Resolve a decklist into library cards owned by `owner`.
///
/// Copies are laid out with a staggered x offset so an accidental
/// battlefield view does not stack them on one spot.
pub fn import_deck(
    catalog: &dyn CardCatalog,
    decklist: &str,
    owner: &PlayerId,
    rng: &mut GameRng,
) -> ImportedDeck {
    let lines = parse_decklist(decklist);
    let mut deck = ImportedDeck {
        line_count: lines.len(),
        ..ImportedDeck::default()
    };
    let mut x_offset = 5.0;

    for line in lines {
        let entry = match catalog.lookup(&line.name) {
            Ok(entry) => entry,
            Err(err) => {
                warn!("deck import: skipping {:?}: {}", line.name, err);
                deck.failed.push(line.name);
                continue;
            }
        };

        for _ in 0..line.count {
            let card = CardInstance::new(rng.instance_id(), owner.clone(), Zone::Library)
                .with_catalog(&entry)
                .at(x_offset, 5.0);
            deck.cards.push(card);
            x_offset = (x_offset + 5.0) % 80.0;
        }
    }

    deck
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> StaticCatalog {
        StaticCatalog::new()
            .with_entry(CatalogEntry::new("Lightning Bolt", "Instant").with_mana_cost("{R}"))
            .with_entry(CatalogEntry::new("Forest", "Basic Land — Forest"))
            .with_entry(CatalogEntry::new("Llanowar Elves", "Creature — Elf Druid").with_stats("1", "1"))
    }

    #[test]
    fn test_parse_decklist_counts() {
        let lines = parse_decklist("  3 Forest \n1 Llanowar Elves\nLightning Bolt\n   \n");
        assert_eq!(
            lines,
            vec![
                DeckLine { count: 3, name: "Forest".into() },
                DeckLine { count: 1, name: "Llanowar Elves".into() },
                DeckLine { count: 1, name: "Lightning Bolt".into() },
            ]
        );
    }

    #[test]
    fn test_parse_decklist_number_only_is_a_name() {
        let lines = parse_decklist("1996");
        assert_eq!(lines[0], DeckLine { count: 1, name: "1996".into() });
    }

    #[test]
    fn test_static_catalog_fuzzy() {
        let catalog = catalog();
        assert_eq!(catalog.lookup("lightning bolt").unwrap().name, "Lightning Bolt");
        assert_eq!(catalog.lookup("llano").unwrap().name, "Llanowar Elves");
        assert_eq!(catalog.lookup("bolt").unwrap().name, "Lightning Bolt");
        assert_eq!(
            catalog.lookup("Black Lotus"),
            Err(CatalogError::NotFound("Black Lotus".into()))
        );
    }

    #[test]
    fn test_import_deck_skips_failures() {
        let owner = PlayerId::new("p1");
        let mut rng = GameRng::new(1);

        let deck = import_deck(&catalog(), "2 Forest\n1 Black Lotus\nbolt", &owner, &mut rng);

        assert_eq!(deck.line_count, 3);
        assert_eq!(deck.cards.len(), 3);
        assert_eq!(deck.failed, vec!["Black Lotus".to_string()]);

        for card in &deck.cards {
            assert_eq!(card.zone, Zone::Library);
            assert_eq!(card.owner_id, owner);
            assert_eq!(card.controller_id, owner);
        }
        assert_eq!(deck.cards[2].name, "Lightning Bolt");
        assert_eq!(deck.cards[2].mana_cost.as_deref(), Some("{R}"));
        assert_eq!((deck.cards[0].x, deck.cards[1].x), (5.0, 10.0));
    }

    #[test]
    fn test_import_deck_ids_unique() {
        let mut rng = GameRng::new(2);
        let deck = import_deck(&catalog(), "20 Forest", &PlayerId::new("p1"), &mut rng);

        let mut ids: Vec<_> = deck.cards.iter().map(|c| c.instance_id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }
}
