//! # duel-table
//!
//! A synchronized two-player card table: one shared game document, a pure
//! action reducer, a priority stack and a zone engine.
//!
//! ## Design Principles
//!
//! 1. **Pure Reducer**: `reduce(state, actor, action, ctx)` never touches
//!    the document. It returns a patch, and applying the patch is one write.
//!
//! 2. **Explicit Randomness**: shuffles, dice and ids come from the
//!    `GameRng` in the reduce context, so a seeded run replays exactly.
//!
//! 3. **Two Target Sets**: persistent target records and stack item
//!    targets live apart. "Is targeted" is their union.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: `im` vectors make whole-sequence
//!   replacement cheap, which is how `cards` and `players` are written.
//!
//! - **Last Write Wins**: ordinary actions read, reduce and write with no
//!   version check. Only joining a game is checked against the version.
//!
//! ## Modules
//!
//! - `core`: ids, players, phases, configuration, actions, state, RNG, errors
//! - `cards`: card instances, zones, catalog lookup and deck import
//! - `zones`: zone transitions, library operations, battlefield layout
//! - `targeting`: target refs, targeting sessions, target records
//! - `stack`: casting, activating, priority and resolution
//! - `rules`: the action reducer
//! - `store`: document store, game creation and join, client handle

pub mod core;
pub mod cards;
pub mod zones;
pub mod targeting;
pub mod stack;
pub mod rules;
pub mod store;

// Re-export commonly used types
pub use crate::core::{
    GameCode, InstanceId, RecordId, Timestamp,
    Player, PlayerCounter, PlayerId,
    GameRng, Clock, FixedClock, SystemClock,
    PhaseId, TableConfig,
    Action, DiceType, LibraryPosition, LogKind,
    GameState, LogEntry, RevealRecord, SeqUpdate, StateUpdate,
    DispatchError, JoinError, Notice, Rejection, StoreError,
};

pub use crate::cards::{CardCatalog, CardInstance, CatalogEntry, StaticCatalog, Zone};

pub use crate::zones::ZoneManager;

pub use crate::targeting::{TargetMode, TargetRecord, TargetRef, TargetingSession};

pub use crate::stack::{StackItem, StackItemKind};

pub use crate::rules::{reduce, Outcome, ReduceContext};

pub use crate::store::{create_game, join_game, GameStore, Joined, MemoryStore, Table, Versioned};
