//! Resolving the top of the stack.

use im::Vector;

use crate::cards::Zone;
use crate::zones::ZoneManager;

use super::StackItem;

/// Result of resolving one stack item.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolved {
    pub item: StackItem,
    /// The stack without the resolved item.
    pub remaining: Vector<StackItem>,
    /// Where the source card went. `None` for abilities, or when the source
    /// had already left the stack zone.
    pub destination: Option<Zone>,
}

/// Pop the top item and move its source card.
///
/// A spell whose source is still in the stack zone goes to the battlefield
/// if it is a permanent, otherwise to the graveyard. A permanent lands in
/// its controller's next free battlefield slot, untapped. Returns `None`
/// on an empty stack.
pub fn resolve_top(stack: &Vector<StackItem>, zones: &mut ZoneManager) -> Option<Resolved> {
    let mut remaining = stack.clone();
    let item = remaining.pop_back()?;

    let destination = if item.is_ability() {
        None
    } else {
        match zones.get(&item.source_id) {
            Some(card) if card.zone == Zone::StackZone => {
                Some(if card.is_permanent() {
                    Zone::Battlefield
                } else {
                    Zone::Graveyard
                })
            }
            _ => None,
        }
    };

    if let Some(zone) = destination {
        zones.move_to_zone(&item.source_id, zone);
        if zone == Zone::Battlefield {
            zones.place_on_battlefield(&item.source_id);
        }
    }

    Some(Resolved {
        item,
        remaining,
        destination,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardInstance;
    use crate::core::entity::{InstanceId, RecordId, Timestamp};
    use crate::core::player::PlayerId;
    use crate::stack::StackItemKind;

    fn spell(id: &str, source: &str) -> StackItem {
        StackItem {
            id: RecordId::new(id),
            source_id: InstanceId::new(source),
            name: source.into(),
            controller_id: PlayerId::new("p1"),
            timestamp: Timestamp(0),
            target_ids: Default::default(),
            target_player_ids: Default::default(),
            kind: None,
            card_image: None,
        }
    }

    fn on_stack(id: &str, type_line: &str) -> CardInstance {
        CardInstance::new(InstanceId::new(id), PlayerId::new("p1"), Zone::StackZone)
            .with_name(id)
            .with_type_line(type_line)
    }

    #[test]
    fn test_lifo() {
        let mut zones = ZoneManager::default();
        zones.push(on_stack("a", "Creature"));
        zones.push(on_stack("b", "Instant"));
        let stack: Vector<StackItem> = vec![spell("s1", "a"), spell("s2", "b")].into_iter().collect();

        let first = resolve_top(&stack, &mut zones).unwrap();
        assert_eq!(first.item.source_id, InstanceId::new("b"));
        assert_eq!(first.destination, Some(Zone::Graveyard));

        let second = resolve_top(&first.remaining, &mut zones).unwrap();
        assert_eq!(second.item.source_id, InstanceId::new("a"));
        assert_eq!(second.destination, Some(Zone::Battlefield));
        assert!(second.remaining.is_empty());
        assert!(resolve_top(&second.remaining, &mut zones).is_none());
    }

    #[test]
    fn test_permanent_is_placed_untapped() {
        let mut zones = ZoneManager::default();
        zones.push(
            CardInstance::new(InstanceId::new("land"), PlayerId::new("p1"), Zone::Battlefield)
                .with_type_line("Land"),
        );
        let mut forest = on_stack("forest", "Basic Land — Forest");
        forest.tapped = true;
        zones.push(forest);

        let stack = Vector::unit(spell("s1", "forest"));
        resolve_top(&stack, &mut zones).unwrap();

        let card = zones.get(&InstanceId::new("forest")).unwrap();
        assert_eq!(card.zone, Zone::Battlefield);
        assert!(!card.tapped);
        assert_eq!((card.x, card.y), (20.0, 60.0));
    }

    #[test]
    fn test_ability_and_moved_source_stay_put() {
        let mut zones = ZoneManager::default();
        zones.push(
            CardInstance::new(InstanceId::new("elf"), PlayerId::new("p1"), Zone::Battlefield)
                .with_type_line("Creature"),
        );
        zones.push(
            CardInstance::new(InstanceId::new("gone"), PlayerId::new("p1"), Zone::Exile)
                .with_type_line("Sorcery"),
        );

        let mut ability = spell("s1", "elf");
        ability.kind = Some(StackItemKind::Ability);
        let stack: Vector<StackItem> = vec![spell("s0", "gone"), ability].into_iter().collect();

        let resolved = resolve_top(&stack, &mut zones).unwrap();
        assert_eq!(resolved.destination, None);
        assert_eq!(zones.zone_of(&InstanceId::new("elf")), Some(Zone::Battlefield));

        let resolved = resolve_top(&resolved.remaining, &mut zones).unwrap();
        assert_eq!(resolved.destination, None);
        assert_eq!(zones.zone_of(&InstanceId::new("gone")), Some(Zone::Exile));
    }

    #[test]
    fn test_missing_source_just_pops() {
        let mut zones = ZoneManager::default();
        let stack = Vector::unit(spell("s1", "ghost"));
        let resolved = resolve_top(&stack, &mut zones).unwrap();
        assert!(resolved.remaining.is_empty());
        assert_eq!(resolved.destination, None);
    }
}
