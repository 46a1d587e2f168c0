//! Pass-priority state machine.
//!
//! With two seated players a pass either hands priority to the next seat
//! or, once everyone has passed in succession, resolves the top of the
//! stack or moves to the next phase. The active player gets priority after
//! either of those.
//!
//! ## Solo mode
//!
//! With fewer than two players there is nobody to pass to. A pass then
//! resolves the top of the stack if there is one and otherwise advances the
//! phase. Priority does not move.

use crate::core::config::PhaseId;
use crate::core::player::PlayerId;
use crate::core::state::{GameState, SeqUpdate, StateUpdate};
use crate::zones::ZoneManager;

use super::resolution::{resolve_top, Resolved};

/// What a pass did.
#[derive(Clone, Debug, PartialEq)]
pub enum PassOutcome {
    /// Priority moved to the next seat; nothing else happened.
    Passed { to: PlayerId },
    /// The top stack item resolved.
    Resolved(Resolved),
    /// The game moved to `phase`. `new_turn` is set on the wrap into untap.
    PhaseAdvanced { phase: PhaseId, new_turn: bool },
}

/// A pass, as a patch plus a description of what happened.
#[derive(Clone, Debug, PartialEq)]
pub struct PriorityStep {
    pub update: StateUpdate,
    pub outcome: PassOutcome,
}

impl PriorityStep {
    /// Log line for this step.
    #[must_use]
    pub fn describe(&self, state: &GameState) -> String {
        match &self.outcome {
            PassOutcome::Passed { to } => format!("Passed priority to {}", state.player_name(to)),
            PassOutcome::Resolved(resolved) => format!("Resolved: {}", resolved.item.name),
            PassOutcome::PhaseAdvanced { phase, .. } => format!("Phase: {}", phase.label()),
        }
    }
}

/// Seat and id of the active player.
fn active_seat(state: &GameState, index: usize) -> (usize, PlayerId) {
    match state.players.get(index) {
        Some(player) => (index, player.id.clone()),
        None => (state.active_player_index, state.turn_player_id.clone()),
    }
}

/// Compute the effect of `actor` passing priority.
///
/// The priority guard is the caller's job.
#[must_use]
pub fn pass_priority(state: &GameState, actor: &PlayerId) -> PriorityStep {
    let mut zones = ZoneManager::from_state(state);
    let count = state.player_count();

    if count < 2 {
        if let Some(resolved) = resolve_top(&state.stack, &mut zones) {
            let update = StateUpdate {
                stack: Some(SeqUpdate::Replace(resolved.remaining.clone())),
                cards: Some(zones.into_cards()),
                ..StateUpdate::default()
            };
            return PriorityStep {
                update,
                outcome: PassOutcome::Resolved(resolved),
            };
        }
        return advance_phase(state, zones, actor);
    }

    let passes = state.consecutive_passes + 1;
    if (passes as usize) < count {
        let next = (state.priority_index + 1) % count;
        let (next, to) = active_seat(state, next);
        let update = StateUpdate {
            consecutive_passes: Some(passes),
            priority_index: Some(next),
            priority_player_id: Some(to.clone()),
            ..StateUpdate::default()
        };
        return PriorityStep {
            update,
            outcome: PassOutcome::Passed { to },
        };
    }

    match resolve_top(&state.stack, &mut zones) {
        Some(resolved) => {
            let (index, active) = active_seat(state, state.active_player_index);
            let update = StateUpdate {
                stack: Some(SeqUpdate::Replace(resolved.remaining.clone())),
                cards: Some(zones.into_cards()),
                consecutive_passes: Some(0),
                priority_index: Some(index),
                priority_player_id: Some(active),
                ..StateUpdate::default()
            };
            PriorityStep {
                update,
                outcome: PassOutcome::Resolved(resolved),
            }
        }
        None => advance_phase(state, zones, actor),
    }
}

/// Move to the next phase.
///
/// On the wrap into untap the turn number goes up, the next seat becomes
/// active (with two players) and the active player's battlefield untaps.
/// With two players the active player then gets priority. In solo mode the
/// sole seat (or `actor`, if nobody is seated) untaps.
#[must_use]
pub fn advance_phase(state: &GameState, mut zones: ZoneManager, actor: &PlayerId) -> PriorityStep {
    let phase = state.phase.next();
    let new_turn = phase == PhaseId::Untap;
    let count = state.player_count();

    let mut update = StateUpdate {
        phase: Some(phase),
        ..StateUpdate::default()
    };

    if count >= 2 {
        let index = if new_turn {
            (state.active_player_index + 1) % count
        } else {
            state.active_player_index
        };
        let (index, active) = active_seat(state, index);

        if new_turn {
            update.turn_number = Some(state.turn_number + 1);
            update.active_player_index = Some(index);
            update.turn_player_id = Some(active.clone());
            zones.untap_all(&active);
            update.cards = Some(zones.into_cards());
        }
        update.consecutive_passes = Some(0);
        update.priority_index = Some(index);
        update.priority_player_id = Some(active);
    } else if new_turn {
        let sole = state
            .players
            .front()
            .map_or_else(|| actor.clone(), |p| p.id.clone());
        update.turn_number = Some(state.turn_number + 1);
        zones.untap_all(&sole);
        update.cards = Some(zones.into_cards());
    }

    PriorityStep {
        update,
        outcome: PassOutcome::PhaseAdvanced { phase, new_turn },
    }
}
