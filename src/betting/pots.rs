use crate::game::player::PlayerId;
use std::collections::HashSet;

/// One layer of the pot: an amount and the set of players who can win it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidePot {
    pub amount: i64,
    pub eligible: Vec<PlayerId>,
}

/// Splits total commitments into side pots ordered from smallest
/// all-in threshold to largest. `commitments` holds every player who
/// put chips in this hand, folded or not — a folded player's chips
/// still fill whichever layer their commitment spans, they are simply
/// never eligible to win it. A layer with no eligible (non-folded)
/// contributor is dead money and rolls into the pot below it.
pub fn side_pots(commitments: &[(PlayerId, i64)], folded: &HashSet<PlayerId>) -> Vec<SidePot> {
    let mut levels: Vec<i64> = commitments.iter().map(|(_, amount)| *amount).filter(|a| *a > 0).collect();
    levels.sort_unstable();
    levels.dedup();

    let mut pots: Vec<SidePot> = Vec::new();
    let mut previous = 0i64;
    for level in levels {
        let contributors: Vec<&PlayerId> = commitments
            .iter()
            .filter(|(_, amount)| *amount >= level)
            .map(|(id, _)| id)
            .collect();
        let layer = (level - previous) * contributors.len() as i64;
        if layer > 0 {
            let eligible: Vec<PlayerId> = contributors
                .iter()
                .filter(|id| !folded.contains(**id))
                .map(|id| (*id).clone())
                .collect();
            if eligible.is_empty() {
                if let Some(last) = pots.last_mut() {
                    last.amount += layer;
                }
            } else {
                pots.push(SidePot { amount: layer, eligible });
            }
        }
        previous = level;
    }
    pots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_pot_when_no_one_is_short() {
        let commitments = vec![("a".to_string(), 100), ("b".to_string(), 100), ("c".to_string(), 100)];
        let pots = side_pots(&commitments, &HashSet::new());
        assert_eq!(pots.len(), 1);
        assert_eq!(pots[0].amount, 300);
        assert_eq!(pots[0].eligible.len(), 3);
    }

    #[test]
    fn layered_side_pots_for_unequal_all_ins() {
        let commitments = vec![
            ("a".to_string(), 50),
            ("b".to_string(), 150),
            ("c".to_string(), 300),
            ("d".to_string(), 300),
        ];
        let pots = side_pots(&commitments, &HashSet::new());
        assert_eq!(pots.len(), 3);
        assert_eq!(pots[0].amount, 200);
        assert_eq!(pots[0].eligible.len(), 4);
        assert_eq!(pots[1].amount, 300);
        assert_eq!(pots[1].eligible.len(), 3);
        assert_eq!(pots[2].amount, 300);
        assert_eq!(pots[2].eligible.len(), 2);
        let total: i64 = pots.iter().map(|p| p.amount).sum();
        assert_eq!(total, 800);
    }

    #[test]
    fn folded_player_chips_stay_in_pot_but_they_are_never_eligible() {
        let commitments = vec![("a".to_string(), 100), ("b".to_string(), 100), ("c".to_string(), 50)];
        let mut folded = HashSet::new();
        folded.insert("c".to_string());
        let pots = side_pots(&commitments, &folded);
        // c folded after committing 50; a and b each committed 100.
        let total: i64 = pots.iter().map(|p| p.amount).sum();
        assert_eq!(total, 250);
        assert!(pots.iter().all(|p| !p.eligible.contains(&"c".to_string())));
    }

    #[test]
    fn dead_layer_rolls_into_pot_below_when_all_contributors_folded() {
        let commitments = vec![("a".to_string(), 100), ("b".to_string(), 50)];
        let mut folded = HashSet::new();
        folded.insert("a".to_string());
        let pots = side_pots(&commitments, &folded);
        // a folded after committing 100 (more than b's 50): the 50-100 layer
        // has no eligible contributor and rolls into the 0-50 layer.
        assert_eq!(pots.len(), 1);
        assert_eq!(pots[0].amount, 150);
        assert_eq!(pots[0].eligible, vec!["b".to_string()]);
    }
}
