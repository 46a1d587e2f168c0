//! Creating and joining games.

use log::{info, warn};

use crate::core::clock::Clock;
use crate::core::config::TableConfig;
use crate::core::entity::GameCode;
use crate::core::error::{JoinError, StoreError};
use crate::core::player::{Player, PlayerId};
use crate::core::rng::GameRng;
use crate::core::state::{GameState, StateUpdate};

use super::{GameStore, Versioned};

/// How a join went.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Joined {
    /// A new seat was added.
    Seated { turn_order: usize },
    /// The player was already seated; name and chat marker refreshed.
    Reconnected,
}

/// Create a game hosted by `host` under a fresh code.
///
/// Fails with [`StoreError::AlreadyExists`] if the drawn code is taken.
pub fn create_game<S: GameStore + ?Sized>(
    store: &S,
    host: &PlayerId,
    host_name: &str,
    config: &TableConfig,
    rng: &mut GameRng,
    clock: &dyn Clock,
) -> Result<GameCode, StoreError> {
    let code = rng.game_code();
    let state = GameState::new(code.clone(), host.clone(), host_name, clock.now(), config);
    store.create(&state)?;
    info!("{}: created by {}", code, host);
    Ok(code)
}

/// Seat `player` at `code`, or refresh their seat if they are already in.
///
/// The read and the write are checked against the document version and
/// retried up to `config.join_attempts` times, so two simultaneous joins
/// can never both take the last seat.
pub fn join_game<S: GameStore + ?Sized>(
    store: &S,
    code: &GameCode,
    player: &PlayerId,
    name: &str,
    config: &TableConfig,
    clock: &dyn Clock,
) -> Result<Joined, JoinError> {
    for attempt in 1..=config.join_attempts {
        let Versioned { version, state } = store.load(code)?;
        let now = clock.now();

        let mut players = state.players.clone();
        let joined = match state.player_index(player) {
            Some(index) => {
                if let Some(seat) = players.get_mut(index) {
                    seat.name = name.to_string();
                    seat.last_seen_chat_at = now;
                }
                Joined::Reconnected
            }
            None if players.len() >= config.max_players => {
                return Err(JoinError::Full(code.clone()));
            }
            None => {
                let turn_order = players.len();
                players.push_back(Player::new(
                    player.clone(),
                    name,
                    config.starting_life,
                    turn_order,
                    now,
                ));
                Joined::Seated { turn_order }
            }
        };

        let update = StateUpdate::new().with_players(players);
        match store.compare_and_apply(code, version, &update) {
            Ok(_) => {
                info!("{}: {} joined ({:?})", code, player, joined);
                return Ok(joined);
            }
            Err(StoreError::Conflict { .. }) => {
                warn!(
                    "{}: join by {} conflicted (attempt {}/{})",
                    code, player, attempt, config.join_attempts
                );
            }
            Err(err) => return Err(err.into()),
        }
    }

    Err(JoinError::Contention {
        code: code.clone(),
        attempts: config.join_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::core::entity::Timestamp;
    use crate::store::MemoryStore;

    #[test]
    fn test_create_then_join() {
        let store = MemoryStore::new();
        let config = TableConfig::default();
        let clock = FixedClock::new(Timestamp(1_000));
        let mut rng = GameRng::new(9);

        let code = create_game(&store, &PlayerId::new("p1"), "Alice", &config, &mut rng, &clock).unwrap();
        assert!(code.is_well_formed());

        let joined = join_game(&store, &code, &PlayerId::new("p2"), "Bob", &config, &clock).unwrap();
        assert_eq!(joined, Joined::Seated { turn_order: 1 });

        let state = store.load(&code).unwrap().state;
        assert_eq!(state.player_count(), 2);
        assert_eq!(state.players[1].life, 20);
    }

    #[test]
    fn test_reconnect_keeps_seat() {
        let store = MemoryStore::new();
        let config = TableConfig::default();
        let clock = FixedClock::new(Timestamp(1_000));
        let code = create_game(&store, &PlayerId::new("p1"), "Alice", &config, &mut GameRng::new(1), &clock)
            .unwrap();

        clock.advance(500);
        let joined = join_game(&store, &code, &PlayerId::new("p1"), "Alicia", &config, &clock).unwrap();
        assert_eq!(joined, Joined::Reconnected);

        let state = store.load(&code).unwrap().state;
        assert_eq!(state.player_count(), 1);
        assert_eq!(state.players[0].name, "Alicia");
        assert_eq!(state.players[0].last_seen_chat_at, Timestamp(1_500));
    }

    #[test]
    fn test_third_player_is_refused() {
        let store = MemoryStore::new();
        let config = TableConfig::default();
        let clock = FixedClock::new(Timestamp(0));
        let code = create_game(&store, &PlayerId::new("p1"), "A", &config, &mut GameRng::new(1), &clock)
            .unwrap();
        join_game(&store, &code, &PlayerId::new("p2"), "B", &config, &clock).unwrap();

        let err = join_game(&store, &code, &PlayerId::new("p3"), "C", &config, &clock).unwrap_err();
        assert!(matches!(err, JoinError::Full(_)));
    }

    #[test]
    fn test_join_missing_game() {
        let store = MemoryStore::new();
        let err = join_game(
            &store,
            &GameCode::parse("NOPE22"),
            &PlayerId::new("p2"),
            "B",
            &TableConfig::default(),
            &FixedClock::default(),
        )
        .unwrap_err();
        assert!(matches!(err, JoinError::NotFound(_)));
    }
}
