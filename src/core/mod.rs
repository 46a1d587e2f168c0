//! Core table types: identifiers, players, the game document, actions,
//! RNG, clock, configuration and errors.
//!
//! Everything here is plain data. The behaviour that mutates it lives in
//! `zones`, `targeting`, `stack` and `rules`.

pub mod entity;
pub mod player;
pub mod rng;
pub mod clock;
pub mod config;
pub mod action;
pub mod state;
pub mod error;

pub use entity::{GameCode, InstanceId, RecordId, Timestamp};
pub use player::{Player, PlayerCounter, PlayerId};
pub use rng::GameRng;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{PhaseId, TableConfig};
pub use action::{Action, CardTargets, DiceType, LibraryPosition, LogKind, PlayerTargets};
pub use state::{GameState, LogEntry, RevealRecord, SeqUpdate, StateUpdate};
pub use error::{DispatchError, JoinError, Notice, Rejection, StoreError};
