//! The action reducer.
//!
//! `reduce(state, actor, action, ctx)` is a pure function of its inputs:
//! it never mutates `state`, and every random draw or clock read it needs
//! comes from `ctx` and ends up in the returned patch. Applying the patch is
//! one atomic write.
//!
//! ## Logging
//!
//! Every action that changes something appends exactly one log entry,
//! except the high-frequency ones listed by [`Action::is_unlogged`].
//! Actions that find nothing to act on (drawing from an empty library, say)
//! return an empty update and log nothing.
//!
//! ## Priority guard
//!
//! With two seated players, casting, activating and passing require
//! priority. Without it the action is rejected before anything happens.

use log::debug;

use crate::cards::CardInstance;
use crate::core::action::{Action, LogKind};
use crate::core::config::TableConfig;
use crate::core::entity::Timestamp;
use crate::core::error::Rejection;
use crate::core::player::PlayerId;
use crate::core::rng::GameRng;
use crate::core::state::{GameState, LogEntry, StateUpdate};

use super::handlers;

/// Inputs an action may consume besides the state.
pub struct ReduceContext<'a> {
    pub rng: &'a mut GameRng,
    pub now: Timestamp,
    pub config: &'a TableConfig,
}

impl<'a> ReduceContext<'a> {
    #[must_use]
    pub fn new(rng: &'a mut GameRng, now: Timestamp, config: &'a TableConfig) -> Self {
        Self { rng, now, config }
    }
}

/// Result of reducing one action.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outcome {
    /// Patch to write to the document.
    pub update: StateUpdate,

    /// Card shown privately to the actor (scry). Never written.
    pub peek: Option<CardInstance>,
}

impl Outcome {
    /// Nothing to do.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// A patch plus its log entry.
    #[must_use]
    pub fn logged(update: StateUpdate, entry: LogEntry) -> Self {
        Self {
            update: update.with_log(entry),
            peek: None,
        }
    }

    /// A patch with no log entry.
    #[must_use]
    pub fn silent(update: StateUpdate) -> Self {
        Self { update, peek: None }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.update.is_empty() && self.peek.is_none()
    }
}

/// Build a log entry for `actor`.
pub(crate) fn entry(
    state: &GameState,
    actor: &PlayerId,
    now: Timestamp,
    kind: LogKind,
    desc: impl Into<String>,
) -> LogEntry {
    LogEntry::new(now, actor.clone(), state.player_name(actor), kind, desc)
}

/// Reduce `action`, performed by `actor`, against `state`.
pub fn reduce(
    state: &GameState,
    actor: &PlayerId,
    action: &Action,
    ctx: &mut ReduceContext<'_>,
) -> Result<Outcome, Rejection> {
    if action.needs_priority() && state.is_multiplayer() && !state.has_priority(actor) {
        debug!("{}: {:?} rejected, {} does not hold priority", state.id, action.log_kind(), actor);
        return Err(Rejection::NoPriority);
    }

    let result = dispatch(state, actor, action, ctx);
    match &result {
        Ok(outcome) => debug!(
            "{}: {:?} by {} ({} log entries)",
            state.id,
            action.log_kind(),
            actor,
            outcome.update.log.len()
        ),
        Err(rejection) => debug!("{}: {:?} by {} rejected: {}", state.id, action.log_kind(), actor, rejection),
    }
    result
}

fn dispatch(
    state: &GameState,
    actor: &PlayerId,
    action: &Action,
    ctx: &mut ReduceContext<'_>,
) -> Result<Outcome, Rejection> {
    use handlers::*;

    match action {
        // === Table ===
        Action::RollDice { dice_type } => Ok(roll_dice(state, actor, *dice_type, ctx)),
        Action::SendChat { text } => Ok(send_chat(state, actor, text, ctx)),
        Action::SetChatSeen { timestamp } => Ok(set_chat_seen(state, actor, *timestamp)),
        Action::MoveCardXy { card_id, x, y } => move_card_xy(state, card_id, *x, *y),
        Action::TidyBoard => Ok(tidy_board(state, actor, ctx)),

        // === Library ===
        Action::ShuffleLibrary { target_owner_id } => {
            shuffle_library(state, actor, target_owner_id.as_ref(), ctx)
        }
        Action::Mulligan => mulligan(state, actor, ctx),
        Action::ScryTop { target_owner_id } => scry_top(state, actor, target_owner_id.as_ref(), ctx),
        Action::ScryBottom { card_id } => scry_bottom(state, actor, card_id, ctx),
        Action::ScryKeepTop => Ok(scry_keep_top(state, actor, ctx)),
        Action::DrawCard => Ok(draw_card(state, actor, ctx)),
        Action::MoveToLibrary { card_id, position } => {
            move_to_library(state, actor, card_id, *position, ctx)
        }
        Action::ReorderTopLibrary { owner_id, ordered_top_ids } => {
            reorder_top_library(state, actor, owner_id, ordered_top_ids, ctx)
        }
        Action::ImportDeck { cards, line_count } => Ok(import_deck(state, actor, cards, *line_count, ctx)),

        // === Players ===
        Action::PlayerCounter { counter_type, amount } => {
            player_counter(state, actor, *counter_type, *amount, ctx)
        }
        Action::LifeChange { target_player_id, amount } => {
            life_change(state, actor, target_player_id, *amount, ctx)
        }
        Action::ToggleHandReveal => toggle_hand_reveal(state, actor, ctx),

        // === Cards ===
        Action::CreateToken { name, power, toughness } => Ok(create_token(
            state,
            actor,
            name.as_deref(),
            power.as_deref(),
            toughness.as_deref(),
            ctx,
        )),
        Action::CloneCard { card_id } => clone_card(state, actor, card_id, ctx),
        Action::ModCounter { card_id, label, amount } => mod_counter(state, card_id, label, *amount),
        Action::ToggleFace { card_id } => toggle_face(state, card_id),
        Action::TapToggle { card_id } => tap_toggle(state, card_id),
        Action::ChangeControl { card_id } => change_control(state, actor, card_id, ctx),
        Action::DiscardRandom => Ok(discard_random(state, actor, ctx)),
        Action::PlayLand { card_id } => play_land(state, actor, card_id, ctx),
        Action::MoveZone { card_id, target_zone } => move_zone(state, actor, card_id, *target_zone, ctx),

        // === Stack and priority ===
        Action::PassPriority => Ok(pass_priority(state, actor, ctx)),
        Action::CastSpell { card_id, target_ids, target_player_ids } => {
            cast_spell(state, actor, card_id, target_ids, target_player_ids, ctx)
        }
        Action::ActivateAbility { source_id, target_ids, target_player_ids } => {
            activate_ability(state, actor, source_id, target_ids, target_player_ids, ctx)
        }

        // === Reveals and targets ===
        Action::RevealCard { card_id } => reveal_card(state, actor, card_id, ctx),
        Action::RevealAllHand => Ok(reveal_all_hand(state, actor, ctx)),
        Action::ClearReveals => Ok(clear_reveals(state, actor, ctx)),
        Action::AddTargets { source_id, targets } => add_targets(state, actor, source_id, targets, ctx),
        Action::ClearTargets { card_id } => clear_targets(state, actor, card_id, ctx),

        Action::Unknown => Ok(Outcome::none()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::{GameCode, InstanceId};
    use crate::core::player::Player;

    fn two_player_game() -> GameState {
        let mut state = GameState::new(
            GameCode::parse("HJKLMN"),
            PlayerId::new("p1"),
            "Alice",
            Timestamp(0),
            &TableConfig::default(),
        );
        state.players.push_back(Player::new(PlayerId::new("p2"), "Bob", 20, 1, Timestamp(0)));
        state
    }

    #[test]
    fn test_guard_rejects_without_priority() {
        let state = two_player_game();
        let config = TableConfig::default();
        let mut rng = GameRng::new(1);
        let mut ctx = ReduceContext::new(&mut rng, Timestamp(10), &config);

        let action = Action::CastSpell {
            card_id: InstanceId::new("c1"),
            target_ids: Default::default(),
            target_player_ids: Default::default(),
        };
        assert_eq!(
            reduce(&state, &PlayerId::new("p2"), &action, &mut ctx),
            Err(Rejection::NoPriority)
        );
        assert_eq!(
            reduce(&state, &PlayerId::new("p2"), &Action::PassPriority, &mut ctx),
            Err(Rejection::NoPriority)
        );
    }

    #[test]
    fn test_unknown_is_noop() {
        let state = two_player_game();
        let config = TableConfig::default();
        let mut rng = GameRng::new(1);
        let mut ctx = ReduceContext::new(&mut rng, Timestamp(10), &config);

        let outcome = reduce(&state, &PlayerId::new("p2"), &Action::Unknown, &mut ctx).unwrap();
        assert!(outcome.is_empty());
    }

    #[test]
    fn test_entry_uses_player_name() {
        let state = two_player_game();
        let e = entry(&state, &PlayerId::new("p2"), Timestamp(3), LogKind::DrawCard, "Drew a card");
        assert_eq!(e.player_name, "Bob");

        let e = entry(&state, &PlayerId::new("ghost"), Timestamp(3), LogKind::DrawCard, "x");
        assert_eq!(e.player_name, "Unknown");
    }
}
