//! In-process document store.
//!
//! Documents are held as bincode snapshots, so every load decodes a fresh
//! copy the way a remote read would.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard};

use log::{trace, warn};
use rustc_hash::FxHashMap;

use crate::core::entity::GameCode;
use crate::core::error::StoreError;
use crate::core::state::{GameState, StateUpdate};

use super::{GameStore, Versioned};

struct Document {
    version: u64,
    snapshot: Vec<u8>,
    subscribers: Vec<Sender<Arc<GameState>>>,
}

impl Document {
    fn decode(&self) -> Result<GameState, StoreError> {
        Ok(bincode::deserialize(&self.snapshot)?)
    }

    /// Store `state` as the next version and notify subscribers.
    fn write(&mut self, state: GameState) -> Result<u64, StoreError> {
        self.snapshot = bincode::serialize(&state)?;
        self.version += 1;

        let shared = Arc::new(state);
        self.subscribers.retain(|tx| tx.send(Arc::clone(&shared)).is_ok());
        trace!(
            "{}: v{} sent to {} subscribers",
            shared.id,
            self.version,
            self.subscribers.len()
        );
        Ok(self.version)
    }
}

/// Thread-safe in-memory [`GameStore`].
#[derive(Default)]
pub struct MemoryStore {
    games: Mutex<FxHashMap<GameCode, Document>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored games.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, FxHashMap<GameCode, Document>>, StoreError> {
        self.games.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl GameStore for MemoryStore {
    fn create(&self, state: &GameState) -> Result<u64, StoreError> {
        let mut games = self.lock()?;
        if games.contains_key(&state.id) {
            return Err(StoreError::AlreadyExists(state.id.clone()));
        }
        let doc = Document {
            version: 0,
            snapshot: bincode::serialize(state)?,
            subscribers: Vec::new(),
        };
        games.insert(state.id.clone(), doc);
        Ok(0)
    }

    fn load(&self, code: &GameCode) -> Result<Versioned, StoreError> {
        let games = self.lock()?;
        let doc = games
            .get(code)
            .ok_or_else(|| StoreError::NotFound(code.clone()))?;
        Ok(Versioned {
            version: doc.version,
            state: doc.decode()?,
        })
    }

    fn apply(&self, code: &GameCode, update: &StateUpdate) -> Result<u64, StoreError> {
        let mut games = self.lock()?;
        let doc = games
            .get_mut(code)
            .ok_or_else(|| StoreError::NotFound(code.clone()))?;
        let state = doc.decode()?.applied(update);
        doc.write(state)
    }

    fn compare_and_apply(
        &self,
        code: &GameCode,
        expected: u64,
        update: &StateUpdate,
    ) -> Result<u64, StoreError> {
        let mut games = self.lock()?;
        let doc = games
            .get_mut(code)
            .ok_or_else(|| StoreError::NotFound(code.clone()))?;
        if doc.version != expected {
            warn!("{}: write at v{} refused, document is at v{}", code, expected, doc.version);
            return Err(StoreError::Conflict {
                code: code.clone(),
                expected,
                found: doc.version,
            });
        }
        let state = doc.decode()?.applied(update);
        doc.write(state)
    }

    fn subscribe(&self, code: &GameCode) -> Result<Receiver<Arc<GameState>>, StoreError> {
        let mut games = self.lock()?;
        let doc = games
            .get_mut(code)
            .ok_or_else(|| StoreError::NotFound(code.clone()))?;

        let (tx, rx) = channel();
        // The receiver is alive, so the first send cannot fail.
        let _ = tx.send(Arc::new(doc.decode()?));
        doc.subscribers.push(tx);
        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::TableConfig;
    use crate::core::entity::Timestamp;
    use crate::core::player::PlayerId;
    use crate::core::state::StateUpdate;

    fn game(code: &str) -> GameState {
        GameState::new(
            GameCode::parse(code),
            PlayerId::new("host"),
            "Host",
            Timestamp(0),
            &TableConfig::default(),
        )
    }

    #[test]
    fn test_create_twice_fails() {
        let store = MemoryStore::new();
        store.create(&game("AAAAAA")).unwrap();
        assert!(matches!(
            store.create(&game("AAAAAA")),
            Err(StoreError::AlreadyExists(_))
        ));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_compare_and_apply_conflict() {
        let store = MemoryStore::new();
        let code = GameCode::parse("BBBBBB");
        store.create(&game("BBBBBB")).unwrap();

        let patch = StateUpdate {
            turn_number: Some(4),
            ..StateUpdate::default()
        };
        assert_eq!(store.compare_and_apply(&code, 0, &patch).unwrap(), 1);
        assert!(matches!(
            store.compare_and_apply(&code, 0, &patch),
            Err(StoreError::Conflict { expected: 0, found: 1, .. })
        ));
        assert_eq!(store.load(&code).unwrap().state.turn_number, 4);
    }

    #[test]
    fn test_subscriber_sees_every_write() {
        let store = MemoryStore::new();
        let code = GameCode::parse("CCCCCC");
        store.create(&game("CCCCCC")).unwrap();

        let rx = store.subscribe(&code).unwrap();
        store
            .apply(&code, &StateUpdate { turn_number: Some(2), ..StateUpdate::default() })
            .unwrap();

        assert_eq!(rx.recv().unwrap().turn_number, 1);
        assert_eq!(rx.recv().unwrap().turn_number, 2);
    }

    #[test]
    fn test_load_missing() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.load(&GameCode::parse("ZZZZZZ")),
            Err(StoreError::NotFound(_))
        ));
    }
}
