//! Document-store boundary.
//!
//! One document per game, keyed by its [`GameCode`]. Every write bumps the
//! document version and is pushed to subscribers as a full snapshot.
//!
//! Ordinary actions go through [`GameStore::apply`], which is last write
//! wins: a patch computed from a stale read replaces whole `cards` and
//! `players` sequences. Only joining uses [`GameStore::compare_and_apply`],
//! which refuses the write if the document moved since it was read.

mod memory;
mod session;
mod table;

use std::sync::mpsc::Receiver;
use std::sync::Arc;

use crate::core::entity::GameCode;
use crate::core::error::StoreError;
use crate::core::state::{GameState, StateUpdate};

pub use memory::MemoryStore;
pub use session::{create_game, join_game, Joined};
pub use table::Table;

/// A document read together with the version it was read at.
#[derive(Clone, Debug, PartialEq)]
pub struct Versioned {
    pub version: u64,
    pub state: GameState,
}

/// Storage for game documents.
pub trait GameStore: Send + Sync {
    /// Insert a new document. Fails if the code is taken.
    fn create(&self, state: &GameState) -> Result<u64, StoreError>;

    /// Read the current document.
    fn load(&self, code: &GameCode) -> Result<Versioned, StoreError>;

    /// Apply a patch to whatever the document currently is.
    fn apply(&self, code: &GameCode, update: &StateUpdate) -> Result<u64, StoreError>;

    /// Apply a patch only if the document is still at `expected`.
    fn compare_and_apply(
        &self,
        code: &GameCode,
        expected: u64,
        update: &StateUpdate,
    ) -> Result<u64, StoreError>;

    /// Receive a snapshot after every write, starting with the current one.
    fn subscribe(&self, code: &GameCode) -> Result<Receiver<Arc<GameState>>, StoreError>;
}
