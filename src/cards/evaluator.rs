use super::card::Card;
use super::hand_rank::{HandCategory, HandValue};
use super::rank::Rank;

/// Best 5-of-N evaluation under short-deck rankings, and winner
/// determination across several players' hands.

/// `hole` plus `board`, scored as the best 5-card (or smaller, if fewer
/// than 5 cards are available) combination either can form.
pub fn evaluate_best(hole: &[Card], board: &[Card]) -> HandValue {
    let all: Vec<Card> = hole.iter().chain(board.iter()).copied().collect();
    let k = all.len().min(5);
    combinations(&all, k)
        .into_iter()
        .map(|hand| categorize(&hand))
        .max()
        .expect("at least one combination when cards are non-empty")
}

/// All winners among `hands`: every entry whose value compares equal
/// to the strongest value present. Folded players must be excluded by
/// the caller before this is invoked.
pub fn determine_winners<T: Copy>(hands: &[(T, HandValue)]) -> Vec<T> {
    let best = hands.iter().map(|(_, v)| v).max().expect("non-empty hands");
    hands
        .iter()
        .filter(|(_, v)| v == best)
        .map(|(id, _)| *id)
        .collect()
}

fn combinations(cards: &[Card], k: usize) -> Vec<Vec<Card>> {
    if k == 0 {
        return vec![Vec::new()];
    }
    if cards.len() < k {
        return Vec::new();
    }
    if cards.len() == k {
        return vec![cards.to_vec()];
    }
    let mut out = Vec::new();
    // either take cards[0] or not
    let (first, rest) = cards.split_first().expect("non-empty checked above");
    for mut combo in combinations(rest, k - 1) {
        combo.insert(0, *first);
        out.push(combo);
    }
    out.extend(combinations(rest, k));
    out
}

fn categorize(cards: &[Card]) -> HandValue {
    let mut ranks: Vec<u8> = cards.iter().map(|c| c.rank().value()).collect();
    ranks.sort_unstable_by(|a, b| b.cmp(a));

    let mut counts: Vec<(u8, u8)> = Vec::new();
    for &r in &ranks {
        match counts.iter_mut().find(|(rank, _)| *rank == r) {
            Some((_, count)) => *count += 1,
            None => counts.push((r, 1)),
        }
    }
    counts.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));

    let is_flush = cards.len() == 5 && cards.iter().all(|c| c.suit() == cards[0].suit());
    let straight_high = straight_high_value(&ranks);

    let (category, key) = match (is_flush, straight_high) {
        (true, Some(high)) => (HandCategory::StraightFlush, vec![high]),
        _ if counts[0].1 == 4 => (
            HandCategory::FourOfAKind,
            vec![counts[0].0, counts.get(1).map(|c| c.0).unwrap_or(0)],
        ),
        _ if counts[0].1 == 3 && counts.get(1).is_some_and(|c| c.1 >= 2) => {
            (HandCategory::FullHouse, vec![counts[0].0, counts[1].0])
        }
        (true, None) => (HandCategory::Flush, ranks.clone()),
        (false, Some(high)) => (HandCategory::Straight, vec![high]),
        _ if counts[0].1 == 3 => {
            let mut key = vec![counts[0].0];
            key.extend(counts.iter().skip(1).map(|c| c.0));
            (HandCategory::ThreeOfAKind, key)
        }
        _ if counts[0].1 == 2 && counts.get(1).is_some_and(|c| c.1 == 2) => {
            let mut key = vec![counts[0].0, counts[1].0];
            key.extend(counts.iter().skip(2).map(|c| c.0));
            (HandCategory::TwoPair, key)
        }
        _ if counts[0].1 == 2 => {
            let mut key = vec![counts[0].0];
            key.extend(counts.iter().skip(1).map(|c| c.0));
            (HandCategory::OnePair, key)
        }
        _ => (HandCategory::HighCard, ranks.clone()),
    };

    HandValue { category, key }
}

/// Returns the canonical "high" value of the straight these 5 ranks
/// form, if any. Ranks must be pre-sorted descending. The wheel
/// (`A-6-7-8-9`) is keyed on Nine's value so it sorts below the
/// 6-7-8-9-T straight.
fn straight_high_value(sorted_desc: &[u8]) -> Option<u8> {
    if sorted_desc.len() != 5 {
        return None;
    }
    let mut distinct = sorted_desc.to_vec();
    distinct.dedup();
    if distinct.len() != 5 {
        return None;
    }
    let ace = Rank::Ace.value();
    let six = Rank::Six.value();
    let seven = Rank::Seven.value();
    let eight = Rank::Eight.value();
    let nine = Rank::Nine.value();
    if distinct == [ace, nine, eight, seven, six] {
        return Some(nine);
    }
    // distinct is sorted descending; a run means the top minus bottom is 4.
    if distinct[0] - distinct[4] == 4 {
        return Some(distinct[0]);
    }
    None
}
