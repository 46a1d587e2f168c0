//! Reducer benchmarks.
//!
//! Measures the whole-sequence actions (shuffle, mulligan, tidy) against
//! tables of increasing size, plus a snapshot round trip.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use duel_table::cards::{CardInstance, Zone};
use duel_table::core::{Action, GameCode, GameRng, GameState, PlayerId, TableConfig, Timestamp};
use duel_table::rules::{reduce, ReduceContext};
use duel_table::InstanceId;

/// A one-seat table with `library` library cards, a seven-card hand and a
/// small battlefield.
fn table(library: usize) -> GameState {
    let owner = PlayerId::new("bench");
    let mut state = GameState::new(
        GameCode::parse("BENCHX"),
        owner.clone(),
        "Bench",
        Timestamp(0),
        &TableConfig::default(),
    );
    for i in 0..library + 7 + 12 {
        let zone = match i {
            i if i < library => Zone::Library,
            i if i < library + 7 => Zone::Hand,
            _ => Zone::Battlefield,
        };
        let type_line = if i % 3 == 0 { "Basic Land" } else { "Creature" };
        state.cards.push_back(
            CardInstance::new(InstanceId::new(format!("c{}", i)), owner.clone(), zone)
                .with_name(format!("Card {}", i))
                .with_type_line(type_line),
        );
    }
    state
}

fn bench_actions(c: &mut Criterion) {
    let config = TableConfig::default();
    let actor = PlayerId::new("bench");
    let actions = [
        ("shuffle", Action::ShuffleLibrary { target_owner_id: None }),
        ("mulligan", Action::Mulligan),
        ("tidy", Action::TidyBoard),
        ("draw", Action::DrawCard),
    ];

    for (name, action) in &actions {
        let mut group = c.benchmark_group(*name);
        for library in [40, 100, 250] {
            let state = table(library);
            let mut rng = GameRng::new(42);
            group.bench_with_input(BenchmarkId::from_parameter(library), &library, |b, _| {
                b.iter(|| {
                    let mut ctx = ReduceContext::new(&mut rng, Timestamp(1), &config);
                    black_box(reduce(black_box(&state), &actor, action, &mut ctx))
                })
            });
        }
        group.finish();
    }
}

fn bench_snapshot(c: &mut Criterion) {
    let state = table(100);
    c.bench_function("snapshot_round_trip", |b| {
        b.iter(|| {
            let bytes = bincode::serialize(black_box(&state)).unwrap_or_default();
            black_box(bincode::deserialize::<GameState>(&bytes).ok())
        })
    });
}

criterion_group!(benches, bench_actions, bench_snapshot);
criterion_main!(benches);
