//! Entity identification.
//!
//! Every object in a game document carries a string identity:
//!
//! - `InstanceId`: a card instance (generated client-side, globally unique)
//! - `RecordId`: a stack item, target record or reveal record
//! - `GameCode`: the 6-character key of a game document
//!
//! Player identities live in `player.rs` because they come from the
//! authentication collaborator rather than from the engine.
//!
//! ## Usage
//!
//! ```
//! use duel_table::core::{GameCode, InstanceId};
//!
//! let card = InstanceId::new("k3j9a0x1z");
//! assert_eq!(card.as_str(), "k3j9a0x1z");
//!
//! // Codes are normalized the way players type them
//! let code = GameCode::parse(" a7x92b ");
//! assert_eq!(code.as_str(), "A7X92B");
//! ```

use serde::{Deserialize, Serialize};

/// Alphabet used for game codes. Excludes `I`, `O`, `0` and `1`.
pub const GAME_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of a game code.
pub const GAME_CODE_LEN: usize = 6;

/// Length of a generated instance or record id.
pub const RECORD_ID_LEN: usize = 9;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Identity of a card instance.
    ///
    /// Unique across the whole game document, including tokens and clones.
    InstanceId
);

string_id!(
    /// Identity of a stack item, target record or reveal record.
    RecordId
);

/// Key of a game document.
///
/// Six symbols from [`GAME_CODE_ALPHABET`]. Players type these by hand,
/// so parsing trims and upper-cases.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameCode(String);

impl GameCode {
    /// Normalize a code typed by a player.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }

    /// Borrow the code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the code has the right length and only uses the code alphabet.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == GAME_CODE_LEN
            && self.0.bytes().all(|b| GAME_CODE_ALPHABET.contains(&b))
    }
}

impl std::fmt::Display for GameCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Milliseconds since the Unix epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Create a timestamp from milliseconds.
    #[must_use]
    pub const fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    /// Raw milliseconds.
    #[must_use]
    pub const fn millis(self) -> i64 {
        self.0
    }

    /// Offset by a number of milliseconds.
    #[must_use]
    pub const fn plus_millis(self, ms: i64) -> Self {
        Self(self.0 + ms)
    }
}
