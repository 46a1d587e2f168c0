//! Random number generation for table actions.
//!
//! Every random choice an action needs (shuffles, dice, random discards,
//! fresh ids, token jitter) is drawn from one `GameRng` during a single
//! reducer invocation. The results land in the patch, so applying a patch
//! never needs the RNG again.
//!
//! ## Usage
//!
//! ```
//! use duel_table::core::GameRng;
//!
//! // Seeded RNGs are reproducible, which is what tests want
//! let mut a = GameRng::new(42);
//! let mut b = GameRng::new(42);
//! assert_eq!(a.roll(20), b.roll(20));
//!
//! // Live tables seed from the OS
//! let mut live = GameRng::from_entropy();
//! assert!((1..=6).contains(&live.roll(6)));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::entity::{GameCode, InstanceId, RecordId, GAME_CODE_ALPHABET, GAME_CODE_LEN, RECORD_ID_LEN};

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// RNG used by the reducer and the lobby.
///
/// Uses ChaCha8 for speed while keeping good statistical quality.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Create an RNG seeded from operating-system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            inner: ChaCha8Rng::from_entropy(),
        }
    }

    /// Generate a random usize in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Generate a random float in the given range.
    pub fn gen_range_f64(&mut self, range: std::ops::Range<f64>) -> f64 {
        self.inner.gen_range(range)
    }

    /// Roll a die with `sides` faces (1-based).
    pub fn roll(&mut self, sides: u32) -> u32 {
        self.inner.gen_range(1..=sides.max(1))
    }

    /// Flip a fair coin. `true` is heads.
    pub fn flip(&mut self) -> bool {
        self.inner.gen_bool(0.5)
    }

    /// Shuffle a slice in place (Fisher-Yates).
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }

    /// Generate a fresh 9-character base-36 identifier.
    pub fn record_id(&mut self) -> RecordId {
        RecordId::new(self.base36(RECORD_ID_LEN))
    }

    /// Generate a fresh card instance identifier.
    pub fn instance_id(&mut self) -> InstanceId {
        InstanceId::new(self.base36(RECORD_ID_LEN))
    }

    /// Generate a game code from the unambiguous code alphabet.
    pub fn game_code(&mut self) -> GameCode {
        let code: String = (0..GAME_CODE_LEN)
            .map(|_| GAME_CODE_ALPHABET[self.inner.gen_range(0..GAME_CODE_ALPHABET.len())] as char)
            .collect();
        GameCode::parse(&code)
    }

    fn base36(&mut self, len: usize) -> String {
        (0..len)
            .map(|_| BASE36[self.inner.gen_range(0..BASE36.len())] as char)
            .collect()
    }
}
