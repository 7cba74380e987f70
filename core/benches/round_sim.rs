use std::collections::BTreeMap;
use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use pairs_core::*;

const BOUNDS: Bounds = Bounds::new(1280., 1280.);

fn config(columns: u8, rows: u8) -> RoundConfig {
    let pairs = u32::from(columns) * u32::from(rows) / 2;
    RoundConfig {
        columns,
        rows,
        show_preview: false,
        available_cards: (0..pairs).map(CardId).collect(),
        ..Default::default()
    }
}

/// Tap order that finds every pair on the first try.
fn solution(grid: &Grid) -> Vec<usize> {
    let mut by_id: BTreeMap<CardId, Vec<usize>> = BTreeMap::new();
    for (index, id) in grid.identities().into_iter().enumerate() {
        by_id.entry(id).or_default().push(index);
    }
    by_id.into_values().flatten().collect()
}

fn play(engine: &mut MatchEngine<ProgressBook>, config: &RoundConfig) {
    engine.start_round(config.clone()).unwrap();
    for index in solution(engine.grid()) {
        engine.tap(index);
        engine.advance(1. / 60.);
    }
    while engine.round().active {
        engine.advance(1. / 60.);
    }
}

fn bench_rounds(c: &mut Criterion) {
    for (columns, rows) in [(4, 4), (8, 8), (16, 16)] {
        let config = config(columns, rows);
        let mut engine = MatchEngine::new(EventBus::new(), ProgressBook::default(), BOUNDS, 12345);

        c.bench_function(&format!("perfect_round_{columns}x{rows}"), |b| {
            b.iter(|| play(&mut engine, black_box(&config)))
        });
    }
}

fn bench_generate(c: &mut Criterion) {
    let config = config(16, 16);
    let mut generator = ShuffledPoolGenerator::new(12345);

    c.bench_function("generate_16x16", |b| {
        b.iter(|| {
            let mut grid = Grid::new();
            grid.generate(black_box(&config), BOUNDS, &mut generator).unwrap();
            grid
        })
    });
}

fn bench_idle_tick(c: &mut Criterion) {
    let mut engine = MatchEngine::new(EventBus::new(), ProgressBook::default(), BOUNDS, 12345);
    engine.start_round(config(8, 8)).unwrap();

    c.bench_function("idle_tick_8x8", |b| {
        b.iter(|| engine.advance(black_box(0.)))
    });
}

criterion_group!(benches, bench_rounds, bench_generate, bench_idle_tick);
criterion_main!(benches);
