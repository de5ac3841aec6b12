use criterion::black_box;
use criterion::criterion_group;
use criterion::criterion_main;
use criterion::Criterion;
use shortstack::cards::evaluator::{determine_winners, evaluate_best};
use shortstack::cards::{Card, Deck};

fn seven_cards() -> (Vec<Card>, Vec<Card>) {
    let mut deck = Deck::ordered();
    let hole = deck.deal_n(2).unwrap();
    let board = deck.deal_n(5).unwrap();
    (hole, board)
}

fn evaluating_a_seven_card_hand(c: &mut Criterion) {
    let (hole, board) = seven_cards();
    c.bench_function("evaluate_best over 7 cards", |b| {
        b.iter(|| evaluate_best(black_box(&hole), black_box(&board)))
    });
}

fn determining_winners_at_a_six_way_showdown(c: &mut Criterion) {
    let mut deck = Deck::ordered();
    let board = deck.deal_n(5).unwrap();
    let hands: Vec<(usize, _)> = (0..6)
        .map(|seat| {
            let hole = deck.deal_n(2).unwrap();
            (seat, evaluate_best(&hole, &board))
        })
        .collect();
    c.bench_function("determine_winners across 6 players", |b| {
        b.iter(|| determine_winners(black_box(&hands)))
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .without_plots()
        .sample_size(50)
        .measurement_time(std::time::Duration::from_secs(3));
    targets = evaluating_a_seven_card_hand, determining_winners_at_a_six_way_showdown,
}
criterion_main!(benches);
