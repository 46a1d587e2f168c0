//! One handler per action.
//!
//! Handlers read `state`, build a replacement for whatever top-level fields
//! they change, and attach at most one log entry. Lookups of ids that do
//! not exist are rejections; running out of cards is an empty outcome.

use im::Vector;

use crate::cards::{CardInstance, Zone};
use crate::core::action::{CardTargets, DiceType, LibraryPosition, LogKind, PlayerTargets};
use crate::core::entity::{InstanceId, Timestamp};
use crate::core::error::Rejection;
use crate::core::player::{Player, PlayerCounter, PlayerId};
use crate::core::state::{GameState, RevealRecord, SeqUpdate, StateUpdate};
use crate::stack;
use crate::targeting::{self, TargetRef};
use crate::zones::{clamp_to_board, ZoneManager};

use super::reducer::{entry, Outcome, ReduceContext};

// === Helpers ===

fn card<'s>(state: &'s GameState, id: &InstanceId) -> Result<&'s CardInstance, Rejection> {
    state.card(id).ok_or_else(|| Rejection::UnknownCard(id.clone()))
}

/// Fail unless `id` is seated. An unseated actor is `NotSeated`, anyone
/// else `UnknownPlayer`.
fn require_player(state: &GameState, actor: &PlayerId, id: &PlayerId) -> Result<usize, Rejection> {
    state.player_index(id).ok_or_else(|| {
        if id == actor {
            Rejection::NotSeated(id.clone())
        } else {
            Rejection::UnknownPlayer(id.clone())
        }
    })
}

fn whose(actor: &PlayerId, owner: &PlayerId) -> &'static str {
    if actor == owner {
        "their"
    } else {
        "opponent's"
    }
}

/// Edit one card and return the new card sequence.
fn edit_card<F>(state: &GameState, id: &InstanceId, f: F) -> Result<Vector<CardInstance>, Rejection>
where
    F: FnOnce(&mut CardInstance),
{
    let mut zones = ZoneManager::from_state(state);
    if zones.update(id, f) {
        Ok(zones.into_cards())
    } else {
        Err(Rejection::UnknownCard(id.clone()))
    }
}

/// Edit one player and return the new player sequence.
fn edit_player<F>(state: &GameState, index: usize, f: F) -> Vector<Player>
where
    F: FnOnce(&mut Player),
{
    let mut players = state.players.clone();
    if let Some(player) = players.get_mut(index) {
        f(player);
    }
    players
}

fn round_tenth(v: f64) -> f64 {
    (clamp_to_board(v) * 10.0).round() / 10.0
}

fn hand_of(zones: &ZoneManager, player: &PlayerId) -> Vec<CardInstance> {
    zones.in_zone(Zone::Hand, player).cloned().collect()
}

// === Table ===

pub(super) fn roll_dice(
    state: &GameState,
    actor: &PlayerId,
    dice: DiceType,
    ctx: &mut ReduceContext<'_>,
) -> Outcome {
    let (kind, desc) = match dice {
        DiceType::Coin => {
            let face = if ctx.rng.flip() { "HEADS" } else { "TAILS" };
            (LogKind::FlipCoin, format!("Coin Flip: {}", face))
        }
        DiceType::D6 | DiceType::D20 => {
            let result = ctx.rng.roll(dice.sides());
            (LogKind::RollDice, format!("Rolled D{}: {}", dice.sides(), result))
        }
    };
    Outcome::logged(StateUpdate::new(), entry(state, actor, ctx.now, kind, desc))
}

pub(super) fn send_chat(
    state: &GameState,
    actor: &PlayerId,
    text: &str,
    ctx: &mut ReduceContext<'_>,
) -> Outcome {
    let text = text.trim();
    if text.is_empty() {
        return Outcome::none();
    }
    let line = entry(state, actor, ctx.now, LogKind::Chat, "CHAT").with_text(text);
    Outcome::logged(StateUpdate::new(), line)
}

pub(super) fn set_chat_seen(state: &GameState, actor: &PlayerId, seen: Timestamp) -> Outcome {
    let Some(index) = state.player_index(actor) else {
        return Outcome::none();
    };
    let players = edit_player(state, index, |p| p.last_seen_chat_at = seen);
    Outcome::silent(StateUpdate::new().with_players(players))
}

pub(super) fn move_card_xy(
    state: &GameState,
    card_id: &InstanceId,
    x: f64,
    y: f64,
) -> Result<Outcome, Rejection> {
    let cards = edit_card(state, card_id, |c| {
        c.x = round_tenth(x);
        c.y = round_tenth(y);
    })?;
    Ok(Outcome::silent(StateUpdate::new().with_cards(cards)))
}

pub(super) fn tidy_board(state: &GameState, actor: &PlayerId, ctx: &mut ReduceContext<'_>) -> Outcome {
    let mut zones = ZoneManager::from_state(state);
    zones.tidy(actor);
    Outcome::logged(
        StateUpdate::new().with_cards(zones.into_cards()),
        entry(state, actor, ctx.now, LogKind::TidyBoard, "Tidied the board"),
    )
}

// === Library ===

pub(super) fn shuffle_library(
    state: &GameState,
    actor: &PlayerId,
    target: Option<&PlayerId>,
    ctx: &mut ReduceContext<'_>,
) -> Result<Outcome, Rejection> {
    let owner = target.unwrap_or(actor);
    require_player(state, actor, owner)?;

    let mut zones = ZoneManager::from_state(state);
    zones.shuffle_library(owner, ctx.rng);

    let desc = format!(
        "{} shuffled {} library",
        state.player_name(actor),
        whose(actor, owner)
    );
    Ok(Outcome::logged(
        StateUpdate::new().with_cards(zones.into_cards()),
        entry(state, actor, ctx.now, LogKind::ShuffleLibrary, desc),
    ))
}

pub(super) fn mulligan(
    state: &GameState,
    actor: &PlayerId,
    ctx: &mut ReduceContext<'_>,
) -> Result<Outcome, Rejection> {
    require_player(state, actor, actor)?;

    let mut zones = ZoneManager::from_state(state);
    let drawn = zones.mulligan(actor, ctx.config.opening_hand_size, ctx.rng);

    let desc = format!("{} took a mulligan (drew {})", state.player_name(actor), drawn);
    Ok(Outcome::logged(
        StateUpdate::new().with_cards(zones.into_cards()),
        entry(state, actor, ctx.now, LogKind::Mulligan, desc),
    ))
}

pub(super) fn scry_top(
    state: &GameState,
    actor: &PlayerId,
    target: Option<&PlayerId>,
    ctx: &mut ReduceContext<'_>,
) -> Result<Outcome, Rejection> {
    let owner = target.unwrap_or(actor);
    require_player(state, actor, owner)?;

    let zones = ZoneManager::from_state(state);
    let Some(top) = zones.top_of_library(owner).cloned() else {
        return Ok(Outcome::none());
    };

    let desc = format!(
        "{} looked at the top of {} library",
        state.player_name(actor),
        whose(actor, owner)
    );
    Ok(Outcome {
        update: StateUpdate::new().with_log(entry(state, actor, ctx.now, LogKind::ScryTop, desc)),
        peek: Some(top),
    })
}

pub(super) fn scry_bottom(
    state: &GameState,
    actor: &PlayerId,
    card_id: &InstanceId,
    ctx: &mut ReduceContext<'_>,
) -> Result<Outcome, Rejection> {
    let scried = card(state, card_id)?;
    if scried.zone != Zone::Library {
        return Ok(Outcome::none());
    }
    let owner = scried.owner_id.clone();

    let mut zones = ZoneManager::from_state(state);
    zones.move_to_library(card_id, LibraryPosition::Bottom);

    let desc = format!("Put the top card of {} library on the bottom", whose(actor, &owner));
    Ok(Outcome::logged(
        StateUpdate::new().with_cards(zones.into_cards()),
        entry(state, actor, ctx.now, LogKind::ScryBottom, desc),
    ))
}

pub(super) fn scry_keep_top(state: &GameState, actor: &PlayerId, ctx: &mut ReduceContext<'_>) -> Outcome {
    Outcome::logged(
        StateUpdate::new(),
        entry(state, actor, ctx.now, LogKind::ScryKeepTop, "Kept the top card on top"),
    )
}

pub(super) fn draw_card(state: &GameState, actor: &PlayerId, ctx: &mut ReduceContext<'_>) -> Outcome {
    let mut zones = ZoneManager::from_state(state);
    if zones.draw(actor).is_none() {
        return Outcome::none();
    }
    Outcome::logged(
        StateUpdate::new().with_cards(zones.into_cards()),
        entry(state, actor, ctx.now, LogKind::DrawCard, "Drew a card"),
    )
}

pub(super) fn move_to_library(
    state: &GameState,
    actor: &PlayerId,
    card_id: &InstanceId,
    position: LibraryPosition,
    ctx: &mut ReduceContext<'_>,
) -> Result<Outcome, Rejection> {
    let name = card(state, card_id)?.name.clone();

    let mut zones = ZoneManager::from_state(state);
    zones.move_to_library(card_id, position);

    let end = match position {
        LibraryPosition::Top => "top",
        LibraryPosition::Bottom => "bottom",
    };
    Ok(Outcome::logged(
        StateUpdate::new().with_cards(zones.into_cards()),
        entry(
            state,
            actor,
            ctx.now,
            LogKind::MoveToLibrary,
            format!("Moved {} to {} of library", name, end),
        ),
    ))
}

pub(super) fn reorder_top_library(
    state: &GameState,
    actor: &PlayerId,
    owner: &PlayerId,
    ordered: &[InstanceId],
    ctx: &mut ReduceContext<'_>,
) -> Result<Outcome, Rejection> {
    require_player(state, actor, owner)?;

    let mut zones = ZoneManager::from_state(state);
    let library = zones.library_size(owner);
    if library < 2 {
        return Ok(Outcome::none());
    }

    let min = ctx.config.reorder_min;
    let max = ctx.config.reorder_max.min(library);
    let requested = ordered.len();
    if requested < min || requested > max {
        return Err(Rejection::InvalidReorder { requested, min, max });
    }

    let placed = zones.reorder_top(owner, ordered);
    let desc = format!("Reordered top {} cards of {} library", placed, whose(actor, owner));
    Ok(Outcome::logged(
        StateUpdate::new().with_cards(zones.into_cards()),
        entry(state, actor, ctx.now, LogKind::ReorderTopLibrary, desc),
    ))
}

pub(super) fn import_deck(
    state: &GameState,
    actor: &PlayerId,
    cards: &[CardInstance],
    line_count: usize,
    ctx: &mut ReduceContext<'_>,
) -> Outcome {
    let mut zones = ZoneManager::from_state(state);
    for card in cards {
        if zones.get(&card.instance_id).is_none() {
            zones.push(card.clone());
        }
    }
    Outcome::logged(
        StateUpdate::new().with_cards(zones.into_cards()),
        entry(
            state,
            actor,
            ctx.now,
            LogKind::Import,
            format!("Imported {} cards", line_count),
        ),
    )
}

// === Players ===

pub(super) fn player_counter(
    state: &GameState,
    actor: &PlayerId,
    kind: PlayerCounter,
    amount: i64,
    ctx: &mut ReduceContext<'_>,
) -> Result<Outcome, Rejection> {
    let index = require_player(state, actor, actor)?;
    let players = edit_player(state, index, |p| {
        p.modify_counter(kind, amount);
    });

    let verb = if amount > 0 { "Added" } else { "Removed" };
    Ok(Outcome::logged(
        StateUpdate::new().with_players(players),
        entry(
            state,
            actor,
            ctx.now,
            LogKind::PlayerCounter,
            format!("{} {} counter", verb, kind),
        ),
    ))
}

pub(super) fn life_change(
    state: &GameState,
    actor: &PlayerId,
    target: &PlayerId,
    amount: i64,
    ctx: &mut ReduceContext<'_>,
) -> Result<Outcome, Rejection> {
    let index = require_player(state, actor, target)?;
    let players = edit_player(state, index, |p| p.life = p.life.saturating_add(amount));
    let life = players.get(index).map_or(0, |p| p.life);

    let desc = format!("{} life {:+} ({})", state.player_name(target), amount, life);
    Ok(Outcome::logged(
        StateUpdate::new().with_players(players),
        entry(state, actor, ctx.now, LogKind::LifeChange, desc),
    ))
}

pub(super) fn toggle_hand_reveal(
    state: &GameState,
    actor: &PlayerId,
    ctx: &mut ReduceContext<'_>,
) -> Result<Outcome, Rejection> {
    let index = require_player(state, actor, actor)?;
    let players = edit_player(state, index, |p| p.hand_revealed = !p.hand_revealed);
    let revealed = players.get(index).is_some_and(|p| p.hand_revealed);

    let desc = if revealed { "Revealed their hand" } else { "Hid their hand" };
    Ok(Outcome::logged(
        StateUpdate::new().with_players(players),
        entry(state, actor, ctx.now, LogKind::ToggleHandReveal, desc),
    ))
}

// === Cards ===

pub(super) fn create_token(
    state: &GameState,
    actor: &PlayerId,
    name: Option<&str>,
    power: Option<&str>,
    toughness: Option<&str>,
    ctx: &mut ReduceContext<'_>,
) -> Outcome {
    let or_default = |v: Option<&str>, d: &'static str| {
        v.map(str::trim).filter(|s| !s.is_empty()).unwrap_or(d).to_string()
    };
    let name = or_default(name, "Token");
    let power = or_default(power, "1");
    let toughness = or_default(toughness, "1");

    let x = 10.0 + ctx.rng.gen_range_f64(-5.0..5.0);
    let y = 10.0 + ctx.rng.gen_range_f64(-5.0..5.0);
    let mut token = CardInstance::new(ctx.rng.instance_id(), actor.clone(), Zone::Battlefield)
        .with_name(name.clone())
        .with_type_line("Token Creature")
        .at(x, y);
    token.power = Some(power.clone());
    token.toughness = Some(toughness.clone());
    token.is_token = true;

    let mut zones = ZoneManager::from_state(state);
    zones.push(token);

    let desc = format!("Created {}/{} {} Token", power, toughness, name);
    Outcome::logged(
        StateUpdate::new().with_cards(zones.into_cards()),
        entry(state, actor, ctx.now, LogKind::CreateToken, desc),
    )
}

pub(super) fn clone_card(
    state: &GameState,
    actor: &PlayerId,
    card_id: &InstanceId,
    ctx: &mut ReduceContext<'_>,
) -> Result<Outcome, Rejection> {
    let original = card(state, card_id)?;

    let mut copy = original.clone();
    copy.instance_id = ctx.rng.instance_id();
    copy.zone = Zone::Battlefield;
    copy.x = clamp_to_board(original.x + 3.0);
    copy.y = clamp_to_board(original.y + 3.0);

    let mut zones = ZoneManager::from_state(state);
    zones.push(copy);

    Ok(Outcome::logged(
        StateUpdate::new().with_cards(zones.into_cards()),
        entry(
            state,
            actor,
            ctx.now,
            LogKind::CloneCard,
            format!("Cloned {}", original.name),
        ),
    ))
}

pub(super) fn mod_counter(
    state: &GameState,
    card_id: &InstanceId,
    label: &str,
    amount: i64,
) -> Result<Outcome, Rejection> {
    let cards = edit_card(state, card_id, |c| {
        c.modify_counter(label, amount);
    })?;
    Ok(Outcome::silent(StateUpdate::new().with_cards(cards)))
}

pub(super) fn toggle_face(state: &GameState, card_id: &InstanceId) -> Result<Outcome, Rejection> {
    let cards = edit_card(state, card_id, |c| c.face_down = !c.face_down)?;
    Ok(Outcome::silent(StateUpdate::new().with_cards(cards)))
}

pub(super) fn tap_toggle(state: &GameState, card_id: &InstanceId) -> Result<Outcome, Rejection> {
    let cards = edit_card(state, card_id, |c| c.tapped = !c.tapped)?;
    Ok(Outcome::silent(StateUpdate::new().with_cards(cards)))
}

pub(super) fn change_control(
    state: &GameState,
    actor: &PlayerId,
    card_id: &InstanceId,
    ctx: &mut ReduceContext<'_>,
) -> Result<Outcome, Rejection> {
    let target = card(state, card_id)?;
    let controller = if target.is_controlled_by(actor) {
        state
            .opponent_of(actor)
            .map_or_else(|| actor.clone(), |p| p.id.clone())
    } else {
        actor.clone()
    };

    let mut zones = ZoneManager::from_state(state);
    zones.update(card_id, |c| c.controller_id = controller);
    if target.zone == Zone::Battlefield {
        zones.place_on_battlefield(card_id);
    }

    Ok(Outcome::logged(
        StateUpdate::new().with_cards(zones.into_cards()),
        entry(
            state,
            actor,
            ctx.now,
            LogKind::ChangeControl,
            format!("Changed control of {}", target.name),
        ),
    ))
}

pub(super) fn discard_random(state: &GameState, actor: &PlayerId, ctx: &mut ReduceContext<'_>) -> Outcome {
    let mut zones = ZoneManager::from_state(state);
    let hand = hand_of(&zones, actor);
    let Some(chosen) = ctx.rng.choose(&hand).cloned() else {
        return Outcome::none();
    };

    zones.move_to_zone(&chosen.instance_id, Zone::Graveyard);
    Outcome::logged(
        StateUpdate::new().with_cards(zones.into_cards()),
        entry(
            state,
            actor,
            ctx.now,
            LogKind::DiscardRandom,
            format!("Discarded {} at random", chosen.name),
        ),
    )
}

/// Move a card onto the battlefield in its controller's next free slot.
fn enter_battlefield(
    state: &GameState,
    actor: &PlayerId,
    card_id: &InstanceId,
    kind: LogKind,
    desc: String,
    ctx: &mut ReduceContext<'_>,
) -> Outcome {
    let mut zones = ZoneManager::from_state(state);
    zones.move_to_zone(card_id, Zone::Battlefield);
    zones.place_on_battlefield(card_id);
    Outcome::logged(
        StateUpdate::new().with_cards(zones.into_cards()),
        entry(state, actor, ctx.now, kind, desc),
    )
}

pub(super) fn play_land(
    state: &GameState,
    actor: &PlayerId,
    card_id: &InstanceId,
    ctx: &mut ReduceContext<'_>,
) -> Result<Outcome, Rejection> {
    let land = card(state, card_id)?;
    if land.zone == Zone::Battlefield {
        return Ok(Outcome::none());
    }
    let desc = format!("Played {}", land.name);
    Ok(enter_battlefield(state, actor, card_id, LogKind::PlayLand, desc, ctx))
}

pub(super) fn move_zone(
    state: &GameState,
    actor: &PlayerId,
    card_id: &InstanceId,
    to: Zone,
    ctx: &mut ReduceContext<'_>,
) -> Result<Outcome, Rejection> {
    let moved = card(state, card_id)?;
    if moved.zone == to {
        return Ok(Outcome::none());
    }

    let desc = format!("Moved {} to {}", moved.name, to);
    if to == Zone::Battlefield {
        return Ok(enter_battlefield(state, actor, card_id, LogKind::MoveZone, desc, ctx));
    }

    let mut zones = ZoneManager::from_state(state);
    zones.move_to_zone(card_id, to);
    Ok(Outcome::logged(
        StateUpdate::new().with_cards(zones.into_cards()),
        entry(state, actor, ctx.now, LogKind::MoveZone, desc),
    ))
}

// === Stack and priority ===

pub(super) fn pass_priority(state: &GameState, actor: &PlayerId, ctx: &mut ReduceContext<'_>) -> Outcome {
    let step = stack::pass_priority(state, actor);
    let desc = step.describe(state);
    let image = match &step.outcome {
        stack::PassOutcome::Resolved(resolved) => resolved.item.card_image.clone(),
        _ => None,
    };
    Outcome::logged(
        step.update,
        entry(state, actor, ctx.now, LogKind::PassPriority, desc).with_card_image(image),
    )
}

pub(super) fn cast_spell(
    state: &GameState,
    actor: &PlayerId,
    card_id: &InstanceId,
    target_ids: &CardTargets,
    target_player_ids: &PlayerTargets,
    ctx: &mut ReduceContext<'_>,
) -> Result<Outcome, Rejection> {
    let mut zones = ZoneManager::from_state(state);
    let item = stack::cast_spell(
        &mut zones,
        actor,
        card_id,
        target_ids.clone(),
        target_player_ids.clone(),
        ctx.now,
        ctx.rng,
    )?;
    let (index, holder) = stack::reopen_priority(state, actor);

    let line = entry(state, actor, ctx.now, LogKind::CastSpell, format!("Cast {}", item.name))
        .with_card_image(item.card_image.clone());
    let update = StateUpdate {
        cards: Some(zones.into_cards()),
        stack: Some(SeqUpdate::Append(Vector::unit(item))),
        consecutive_passes: Some(0),
        priority_index: Some(index),
        priority_player_id: Some(holder),
        ..StateUpdate::default()
    };
    Ok(Outcome::logged(update, line))
}

pub(super) fn activate_ability(
    state: &GameState,
    actor: &PlayerId,
    source_id: &InstanceId,
    target_ids: &CardTargets,
    target_player_ids: &PlayerTargets,
    ctx: &mut ReduceContext<'_>,
) -> Result<Outcome, Rejection> {
    let zones = ZoneManager::from_state(state);
    let item = stack::activate_ability(
        &zones,
        actor,
        source_id,
        target_ids.clone(),
        target_player_ids.clone(),
        ctx.now,
        ctx.rng,
    )?;
    let (index, holder) = stack::reopen_priority(state, actor);

    let source_name = zones.get(source_id).map_or_else(String::new, |c| c.name.clone());
    let line = entry(
        state,
        actor,
        ctx.now,
        LogKind::ActivateAbility,
        format!("Activated ability of {}", source_name),
    )
    .with_card_image(item.card_image.clone());
    let update = StateUpdate {
        stack: Some(SeqUpdate::Append(Vector::unit(item))),
        consecutive_passes: Some(0),
        priority_index: Some(index),
        priority_player_id: Some(holder),
        ..StateUpdate::default()
    };
    Ok(Outcome::logged(update, line))
}

// === Reveals and targets ===

fn reveal_record(
    card: &CardInstance,
    state: &GameState,
    actor: &PlayerId,
    at: Timestamp,
    ctx: &mut ReduceContext<'_>,
) -> RevealRecord {
    RevealRecord {
        id: ctx.rng.record_id(),
        card_id: card.instance_id.clone(),
        card_name: card.name.clone(),
        card_image: card.image_uri.clone(),
        revealer_id: actor.clone(),
        revealer_name: state.player_name(actor),
        timestamp: at,
    }
}

pub(super) fn reveal_card(
    state: &GameState,
    actor: &PlayerId,
    card_id: &InstanceId,
    ctx: &mut ReduceContext<'_>,
) -> Result<Outcome, Rejection> {
    let shown = card(state, card_id)?;
    let record = reveal_record(shown, state, actor, ctx.now, ctx);

    let update = StateUpdate {
        reveals: Some(SeqUpdate::Append(Vector::unit(record))),
        ..StateUpdate::default()
    };
    let line = entry(
        state,
        actor,
        ctx.now,
        LogKind::RevealCard,
        format!("Revealed: {}", shown.name),
    )
    .with_card_image(shown.image_uri.clone());
    Ok(Outcome::logged(update, line))
}

pub(super) fn reveal_all_hand(state: &GameState, actor: &PlayerId, ctx: &mut ReduceContext<'_>) -> Outcome {
    let hand = hand_of(&ZoneManager::from_state(state), actor);
    if hand.is_empty() {
        return Outcome::none();
    }

    // Offset timestamps so the records sort in hand order.
    let now = ctx.now;
    let records: Vector<RevealRecord> = hand
        .iter()
        .enumerate()
        .map(|(i, c)| reveal_record(c, state, actor, now.plus_millis(i as i64), ctx))
        .collect();

    let update = StateUpdate {
        reveals: Some(SeqUpdate::Append(records)),
        ..StateUpdate::default()
    };
    let desc = format!("Revealed their hand ({} cards)", hand.len());
    Outcome::logged(update, entry(state, actor, ctx.now, LogKind::RevealCard, desc))
}

pub(super) fn clear_reveals(state: &GameState, actor: &PlayerId, ctx: &mut ReduceContext<'_>) -> Outcome {
    let update = StateUpdate {
        reveals: Some(SeqUpdate::Replace(Vector::new())),
        ..StateUpdate::default()
    };
    Outcome::logged(
        update,
        entry(state, actor, ctx.now, LogKind::ClearReveals, "Cleared revealed cards"),
    )
}

pub(super) fn add_targets(
    state: &GameState,
    actor: &PlayerId,
    source_id: &InstanceId,
    targets: &[TargetRef],
    ctx: &mut ReduceContext<'_>,
) -> Result<Outcome, Rejection> {
    let source = card(state, source_id)?;
    if targets.is_empty() {
        return Ok(Outcome::none());
    }

    let records = targeting::new_records(source_id, targets, actor, ctx.now, ctx.rng);
    let update = StateUpdate {
        targets: Some(SeqUpdate::Append(records)),
        ..StateUpdate::default()
    };
    let desc = format!("Targeted {} cards/players with {}", targets.len(), source.name);
    Ok(Outcome::logged(update, entry(state, actor, ctx.now, LogKind::Target, desc)))
}

pub(super) fn clear_targets(
    state: &GameState,
    actor: &PlayerId,
    card_id: &InstanceId,
    ctx: &mut ReduceContext<'_>,
) -> Result<Outcome, Rejection> {
    let name = card(state, card_id)?.name.clone();
    let Some(kept) = targeting::clear_records(&state.targets, card_id, actor) else {
        return Ok(Outcome::none());
    };

    let update = StateUpdate {
        targets: Some(SeqUpdate::Replace(kept)),
        ..StateUpdate::default()
    };
    Ok(Outcome::logged(
        update,
        entry(
            state,
            actor,
            ctx.now,
            LogKind::ClearTargets,
            format!("Cleared targets for {}", name),
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::TableConfig;
    use crate::core::entity::GameCode;
    use crate::core::rng::GameRng;

    fn table() -> GameState {
        let mut state = GameState::new(
            GameCode::parse("ABCDEF"),
            PlayerId::new("p1"),
            "Alice",
            Timestamp(0),
            &TableConfig::default(),
        );
        state.players.push_back(Player::new(PlayerId::new("p2"), "Bob", 20, 1, Timestamp(0)));
        state
    }

    fn with_card(mut state: GameState, id: &str, owner: &str, zone: Zone) -> GameState {
        state.cards.push_back(
            CardInstance::new(InstanceId::new(id), PlayerId::new(owner), zone).with_name(id),
        );
        state
    }

    #[test]
    fn test_coin_flip_log_kind() {
        let state = table();
        let config = TableConfig::default();
        let mut rng = GameRng::new(3);
        let mut ctx = ReduceContext::new(&mut rng, Timestamp(1), &config);

        let outcome = roll_dice(&state, &PlayerId::new("p1"), DiceType::Coin, &mut ctx);
        let line = &outcome.update.log[0];
        assert_eq!(line.kind, LogKind::FlipCoin);
        assert!(line.desc == "Coin Flip: HEADS" || line.desc == "Coin Flip: TAILS");
    }

    #[test]
    fn test_blank_chat_is_dropped() {
        let state = table();
        let config = TableConfig::default();
        let mut rng = GameRng::new(3);
        let mut ctx = ReduceContext::new(&mut rng, Timestamp(1), &config);

        assert!(send_chat(&state, &PlayerId::new("p1"), "   ", &mut ctx).is_empty());
        let outcome = send_chat(&state, &PlayerId::new("p1"), " gg ", &mut ctx);
        assert_eq!(outcome.update.log[0].text.as_deref(), Some("gg"));
    }

    #[test]
    fn test_move_xy_clamps_and_rounds() {
        let state = with_card(table(), "c", "p1", Zone::Battlefield);
        let outcome = move_card_xy(&state, &InstanceId::new("c"), 120.0, 33.333).unwrap();
        let next = state.applied(&outcome.update);
        assert_eq!((next.cards[0].x, next.cards[0].y), (90.0, 33.3));
        assert!(outcome.update.log.is_empty());
    }

    #[test]
    fn test_life_change_unknown_player() {
        let state = table();
        let config = TableConfig::default();
        let mut rng = GameRng::new(3);
        let mut ctx = ReduceContext::new(&mut rng, Timestamp(1), &config);

        let err = life_change(&state, &PlayerId::new("p1"), &PlayerId::new("p9"), -3, &mut ctx)
            .unwrap_err();
        assert_eq!(err, Rejection::UnknownPlayer(PlayerId::new("p9")));

        let outcome =
            life_change(&state, &PlayerId::new("p1"), &PlayerId::new("p2"), -3, &mut ctx).unwrap();
        assert_eq!(outcome.update.log[0].desc, "Bob life -3 (17)");

        let outcome =
            life_change(&state, &PlayerId::new("p1"), &PlayerId::new("p2"), i64::MAX, &mut ctx)
                .unwrap();
        assert_eq!(state.applied(&outcome.update).players[1].life, i64::MAX);
    }

    #[test]
    fn test_scry_bottom_ignores_cards_outside_library() {
        let mut state = with_card(table(), "lib", "p1", Zone::Library);
        state = with_card(state, "bear", "p1", Zone::Battlefield);
        state.cards[1].modify_counter("+1/+1", 2);
        let config = TableConfig::default();
        let mut rng = GameRng::new(3);
        let mut ctx = ReduceContext::new(&mut rng, Timestamp(1), &config);

        let outcome =
            scry_bottom(&state, &PlayerId::new("p1"), &InstanceId::new("bear"), &mut ctx).unwrap();
        assert!(outcome.is_empty());

        let next = state.applied(&outcome.update);
        assert_eq!(next.cards[1].zone, Zone::Battlefield);
        assert_eq!(next.cards[1].counter("+1/+1"), 2);
    }

    #[test]
    fn test_change_control_toggles() {
        let state = with_card(table(), "c", "p1", Zone::Battlefield);
        let config = TableConfig::default();
        let mut rng = GameRng::new(3);
        let mut ctx = ReduceContext::new(&mut rng, Timestamp(1), &config);

        let outcome = change_control(&state, &PlayerId::new("p1"), &InstanceId::new("c"), &mut ctx).unwrap();
        let next = state.applied(&outcome.update);
        assert_eq!(next.cards[0].controller_id, PlayerId::new("p2"));

        let outcome = change_control(&next, &PlayerId::new("p1"), &InstanceId::new("c"), &mut ctx).unwrap();
        let back = next.applied(&outcome.update);
        assert_eq!(back.cards[0].controller_id, PlayerId::new("p1"));
    }

    #[test]
    fn test_reorder_range_is_checked() {
        let mut state = table();
        for id in ["a", "b", "c"] {
            state = with_card(state, id, "p1", Zone::Library);
        }
        let config = TableConfig::default();
        let mut rng = GameRng::new(3);
        let mut ctx = ReduceContext::new(&mut rng, Timestamp(1), &config);

        let err = reorder_top_library(
            &state,
            &PlayerId::new("p1"),
            &PlayerId::new("p1"),
            &[InstanceId::new("a")],
            &mut ctx,
        )
        .unwrap_err();
        assert!(matches!(err, Rejection::InvalidReorder { requested: 1, .. }));

        let outcome = reorder_top_library(
            &state,
            &PlayerId::new("p1"),
            &PlayerId::new("p1"),
            &[InstanceId::new("c"), InstanceId::new("a")],
            &mut ctx,
        )
        .unwrap();
        let next = state.applied(&outcome.update);
        let order: Vec<_> = next.cards.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_clear_targets_without_records_is_empty() {
        let state = with_card(table(), "c", "p1", Zone::Battlefield);
        let config = TableConfig::default();
        let mut rng = GameRng::new(3);
        let mut ctx = ReduceContext::new(&mut rng, Timestamp(1), &config);

        let outcome = clear_targets(&state, &PlayerId::new("p1"), &InstanceId::new("c"), &mut ctx).unwrap();
        assert!(outcome.is_empty());
    }
}
