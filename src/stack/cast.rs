//! Putting spells and abilities on the stack.
//!
//! Both reopen priority: passes reset to zero and the caster gets priority,
//! so every other player has to pass again before the new item resolves.
//! The priority guard itself is applied by the reducer.

use crate::cards::Zone;
use crate::core::action::{CardTargets, PlayerTargets};
use crate::core::entity::{InstanceId, Timestamp};
use crate::core::error::Rejection;
use crate::core::player::PlayerId;
use crate::core::rng::GameRng;
use crate::core::state::GameState;
use crate::zones::ZoneManager;

use super::{StackItem, StackItemKind};

/// Move `card_id` to the stack zone and build its stack item.
pub fn cast_spell(
    zones: &mut ZoneManager,
    actor: &PlayerId,
    card_id: &InstanceId,
    target_ids: CardTargets,
    target_player_ids: PlayerTargets,
    now: Timestamp,
    rng: &mut GameRng,
) -> Result<StackItem, Rejection> {
    let card = zones
        .get(card_id)
        .ok_or_else(|| Rejection::UnknownCard(card_id.clone()))?;

    let item = StackItem {
        id: rng.record_id(),
        source_id: card.instance_id.clone(),
        name: card.name.clone(),
        controller_id: actor.clone(),
        timestamp: now,
        target_ids,
        target_player_ids,
        kind: None,
        card_image: card.image_uri.clone(),
    };

    zones.move_to_zone(card_id, Zone::StackZone);
    Ok(item)
}

/// Build the stack item for an ability of `source_id`. The source stays
/// where it is.
pub fn activate_ability(
    zones: &ZoneManager,
    actor: &PlayerId,
    source_id: &InstanceId,
    target_ids: CardTargets,
    target_player_ids: PlayerTargets,
    now: Timestamp,
    rng: &mut GameRng,
) -> Result<StackItem, Rejection> {
    let source = zones
        .get(source_id)
        .ok_or_else(|| Rejection::UnknownCard(source_id.clone()))?;

    Ok(StackItem {
        id: rng.record_id(),
        source_id: source.instance_id.clone(),
        name: format!("{} (Ability)", source.name),
        controller_id: actor.clone(),
        timestamp: now,
        target_ids,
        target_player_ids,
        kind: Some(StackItemKind::Ability),
        card_image: source.image_uri.clone(),
    })
}

/// Priority seat and holder after `actor` puts something on the stack.
///
/// An unseated actor keeps the current priority index.
#[must_use]
pub fn reopen_priority(state: &GameState, actor: &PlayerId) -> (usize, PlayerId) {
    let index = state.player_index(actor).unwrap_or(state.priority_index);
    (index, actor.clone())
}
