use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use poker_round::cards::{split_cards, Card};
use poker_round::evaluator::{evaluate_5, evaluate_7};
use poker_round::round::Round;

fn hand<const N: usize>(s: &str) -> [Card; N] {
    let cards = split_cards(s).expect("valid cards");
    cards.try_into().expect("card count")
}

fn bench_evaluate_5(c: &mut Criterion) {
    let mut g = c.benchmark_group("evaluate_5");
    for (name, cards) in [("high_card", "AhKd7s5c2d"), ("straight_flush", "AsKsQsJsTs")] {
        let input: [Card; 5] = hand(cards);
        g.bench_with_input(BenchmarkId::new(name, cards), &input, |b, input| b.iter(|| evaluate_5(black_box(input))));
    }
    g.finish();
}

fn bench_evaluate_7(c: &mut Criterion) {
    let seven: [Card; 7] = hand("AsAhKsQsJsTs9s");
    c.bench_function("evaluate_7", |b| b.iter(|| evaluate_7(black_box(&seven))));
}

fn bench_showdown(c: &mut Criterion) {
    let fen = "10-20 1 | s0 AhAc / s0 2h2c / s0 3h3c $ 0-side 510-123 420-13 20-1 !p4h5h6h7h8h";
    let round: Round = fen.parse().expect("valid snapshot");
    c.bench_function("showdown_three_layers", |b| {
        b.iter(|| {
            let mut r = round.clone();
            black_box(r.act("showdown").expect("showdown"))
        })
    });
}

criterion_group!(benches, bench_evaluate_5, bench_evaluate_7, bench_showdown);
criterion_main!(benches);
