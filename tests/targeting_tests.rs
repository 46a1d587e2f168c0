//! Targeting tests.
//!
//! Manual target records and stack item targets are separate sets; these
//! check that the "is targeted" query sees both and that each has its own
//! lifecycle.

use smallvec::smallvec;

use duel_table::cards::{CardInstance, Zone};
use duel_table::core::{
    Action, GameCode, GameRng, GameState, LogKind, Player, PlayerId, TableConfig, Timestamp,
};
use duel_table::rules::{reduce, ReduceContext};
use duel_table::targeting::{target_status, targets_of, TargetMode, TargetRef, TargetingSession};
use duel_table::InstanceId;

fn p1() -> PlayerId {
    PlayerId::new("p1")
}

fn p2() -> PlayerId {
    PlayerId::new("p2")
}

fn board() -> GameState {
    let mut state = GameState::new(
        GameCode::parse("TARGET"),
        p1(),
        "Alice",
        Timestamp(0),
        &TableConfig::default(),
    );
    state.players.push_back(Player::new(p2(), "Bob", 20, 1, Timestamp(0)));
    for (id, owner, zone) in [
        ("archer", p1(), Zone::Battlefield),
        ("bolt", p1(), Zone::Hand),
        ("wall", p2(), Zone::Battlefield),
    ] {
        state.cards.push_back(
            CardInstance::new(InstanceId::new(id), owner, zone)
                .with_name(id)
                .with_type_line(if id == "bolt" { "Instant" } else { "Creature" }),
        );
    }
    state
}

fn act(state: &GameState, actor: &PlayerId, action: &Action) -> GameState {
    let config = TableConfig::default();
    let mut rng = GameRng::new(8);
    let mut ctx = ReduceContext::new(&mut rng, Timestamp(50), &config);
    let outcome = reduce(state, actor, action, &mut ctx).expect("action should be accepted");
    state.applied(&outcome.update)
}

// =============================================================================
// Manual Targets
// =============================================================================

#[test]
fn test_manual_session_creates_records() {
    let state = board();
    let mut session = TargetingSession::new(InstanceId::new("archer"), TargetMode::Manual);
    session.toggle(TargetRef::card("wall"));
    session.toggle(TargetRef::player("p2"));
    let action = session.finish().unwrap();

    let state = act(&state, &p1(), &action);
    assert_eq!(state.targets.len(), 2);
    assert_eq!(state.log[0].kind, LogKind::Target);
    assert_eq!(state.log[0].desc, "Targeted 2 cards/players with archer");

    let wall = target_status(&state, &TargetRef::card("wall"));
    assert!(wall.is_targeted());
    assert_eq!(wall.by_records, 1);
    assert!(target_status(&state, &TargetRef::card("archer")).is_source);
}

#[test]
fn test_clear_targets_only_removes_own_records() {
    let state = board();
    let mine = Action::AddTargets {
        source_id: InstanceId::new("archer"),
        targets: vec![TargetRef::card("wall")],
    };
    let theirs = Action::AddTargets {
        source_id: InstanceId::new("wall"),
        targets: vec![TargetRef::card("archer")],
    };
    let state = act(&state, &p1(), &mine);
    let state = act(&state, &p2(), &theirs);
    assert_eq!(state.targets.len(), 2);

    let state = act(&state, &p1(), &Action::ClearTargets { card_id: InstanceId::new("wall") });
    assert_eq!(state.targets.len(), 1);
    assert_eq!(state.targets[0].controller_id, p2());
    assert_eq!(state.log.last().map(|e| e.kind), Some(LogKind::ClearTargets));
}

// =============================================================================
// Stack Targets
// =============================================================================

#[test]
fn test_stack_targets_count_until_resolution() {
    let state = board();
    let cast = Action::CastSpell {
        card_id: InstanceId::new("bolt"),
        target_ids: smallvec![InstanceId::new("wall")],
        target_player_ids: smallvec![],
    };
    let state = act(&state, &p1(), &cast);

    let wall = target_status(&state, &TargetRef::card("wall"));
    assert_eq!(wall.by_stack, 1);
    assert_eq!(wall.by_records, 0);
    assert_eq!(targets_of(&state, &InstanceId::new("bolt")), vec![TargetRef::card("wall")]);

    let state = act(&state, &p1(), &Action::PassPriority);
    let state = act(&state, &p2(), &Action::PassPriority);
    assert!(!target_status(&state, &TargetRef::card("wall")).is_targeted());
}

#[test]
fn test_union_of_both_sets() {
    let state = board();
    let state = act(
        &state,
        &p1(),
        &Action::AddTargets {
            source_id: InstanceId::new("archer"),
            targets: vec![TargetRef::player("p2")],
        },
    );
    let state = act(
        &state,
        &p1(),
        &Action::CastSpell {
            card_id: InstanceId::new("bolt"),
            target_ids: smallvec![],
            target_player_ids: smallvec![p2()],
        },
    );

    let bob = target_status(&state, &TargetRef::player("p2"));
    assert_eq!((bob.by_records, bob.by_stack), (1, 1));
}

#[test]
fn test_target_ref_wire_form() {
    let json = serde_json::to_string(&vec![TargetRef::card("c9"), TargetRef::player("p2")]).unwrap();
    assert_eq!(json, r#"["c9","player:p2"]"#);
}
