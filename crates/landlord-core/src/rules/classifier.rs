use crate::model::card::Card;
use crate::model::hand::group_by_rank;
use crate::model::pattern::CardPattern;
use crate::model::rank::Rank;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of classifying a selection.
///
/// `main_value` is the strength compared between plays of the same pattern;
/// `length` separates sequence-like plays of different sizes (card count for
/// straights, pair count for double sequences, triple count for airplanes,
/// and the card count for every other pattern).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Classification {
    pub pattern: CardPattern,
    pub main_value: i32,
    pub length: usize,
}

impl Classification {
    pub const INVALID: Classification = Classification {
        pattern: CardPattern::Invalid,
        main_value: -1,
        length: 0,
    };

    const fn new(pattern: CardPattern, main_value: i32, length: usize) -> Self {
        Self {
            pattern,
            main_value,
            length,
        }
    }

    pub const fn is_valid(&self) -> bool {
        self.pattern.is_valid()
    }

    /// Whether this play dominates `standing`. An invalid `standing` means
    /// the trick is open and any valid play is accepted.
    pub fn beats(&self, standing: &Classification) -> bool {
        beats(self, standing)
    }
}

pub fn beats(candidate: &Classification, standing: &Classification) -> bool {
    use CardPattern::{Bomb, Invalid, Rocket};

    match (candidate.pattern, standing.pattern) {
        (Invalid, _) => false,
        (_, Invalid) => true,
        (Rocket, _) => true,
        (_, Rocket) => false,
        (Bomb, Bomb) => candidate.main_value > standing.main_value,
        (Bomb, _) => true,
        (a, b) if a != b => false,
        _ => {
            candidate.length == standing.length && candidate.main_value > standing.main_value
        }
    }
}

/// Classifies a selection into the most specific matching pattern.
pub fn classify(cards: &[Card]) -> Classification {
    if cards.is_empty() {
        return Classification::INVALID;
    }

    let groups = group_by_rank(cards);
    let total = cards.len();
    let highest = i32::from(cards.iter().map(|c| c.weight()).max().unwrap_or(0));

    if total == 1 {
        return Classification::new(CardPattern::Single, highest, 1);
    }
    if total == 2 && groups.len() == 1 {
        return Classification::new(CardPattern::Pair, highest, 2);
    }
    if total == 2 && is_joker_pair(&groups) {
        return Classification::new(CardPattern::Rocket, i32::MAX, 2);
    }
    if total == 3 && groups.len() == 1 {
        return Classification::new(CardPattern::Triple, highest, 3);
    }
    if total == 4 && groups.len() == 1 {
        return Classification::new(CardPattern::Bomb, highest, 4);
    }
    if total == 4 {
        if let Some(rank) = rank_with_count(&groups, 3) {
            return Classification::new(CardPattern::TripleWithSingle, rank_value(rank), 4);
        }
    }
    if total == 5 && groups.len() == 2 {
        if let Some(rank) = rank_with_count(&groups, 3) {
            return Classification::new(CardPattern::TripleWithPair, rank_value(rank), 5);
        }
    }
    if is_straight(&groups, total) {
        return Classification::new(CardPattern::Straight, highest, total);
    }
    if let Some(top) = double_sequence_top(&groups) {
        return Classification::new(CardPattern::DoubleSequence, rank_value(top), total / 2);
    }
    if let Some((top, run)) = airplane(&groups, total, Wings::None) {
        return Classification::new(CardPattern::Airplane, rank_value(top), run);
    }
    if let Some((top, run)) = airplane(&groups, total, Wings::Singles) {
        return Classification::new(CardPattern::AirplaneWithSingle, rank_value(top), run);
    }
    if let Some((top, run)) = airplane(&groups, total, Wings::Pairs) {
        return Classification::new(CardPattern::AirplaneWithPair, rank_value(top), run);
    }
    if total == 6 {
        if let Some(rank) = rank_with_count(&groups, 4) {
            return Classification::new(CardPattern::FourWithTwoSingles, rank_value(rank), 6);
        }
    }
    if total == 8 {
        if let Some(rank) = rank_with_count(&groups, 4) {
            let others_are_pairs = groups
                .iter()
                .filter(|(r, _)| **r != rank)
                .all(|(_, group)| group.len() == 2);
            if others_are_pairs && groups.len() == 3 {
                return Classification::new(CardPattern::FourWithTwoPairs, rank_value(rank), 8);
            }
        }
    }

    Classification::INVALID
}

fn rank_value(rank: Rank) -> i32 {
    i32::from(rank.value())
}

fn is_joker_pair(groups: &BTreeMap<Rank, Vec<Card>>) -> bool {
    groups.len() == 2
        && groups.contains_key(&Rank::BlackJoker)
        && groups.contains_key(&Rank::RedJoker)
}

fn rank_with_count(groups: &BTreeMap<Rank, Vec<Card>>, count: usize) -> Option<Rank> {
    groups
        .iter()
        .rev()
        .find(|(_, group)| group.len() == count)
        .map(|(rank, _)| *rank)
}

fn is_consecutive(ranks: &[Rank]) -> bool {
    ranks
        .windows(2)
        .all(|pair| pair[1].value() == pair[0].value() + 1)
}

fn is_straight(groups: &BTreeMap<Rank, Vec<Card>>, total: usize) -> bool {
    if total < 5 || groups.len() != total {
        return false;
    }
    let ranks: Vec<Rank> = groups.keys().copied().collect();
    ranks.iter().all(|rank| rank.is_sequenceable()) && is_consecutive(&ranks)
}

fn double_sequence_top(groups: &BTreeMap<Rank, Vec<Card>>) -> Option<Rank> {
    if groups.len() < 3 {
        return None;
    }
    if groups.values().any(|group| group.len() != 2 && group.len() != 4) {
        return None;
    }
    let ranks: Vec<Rank> = groups.keys().copied().collect();
    if !ranks.iter().all(|rank| rank.is_sequenceable()) || !is_consecutive(&ranks) {
        return None;
    }
    ranks.last().copied()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wings {
    None,
    Singles,
    Pairs,
}

/// Searches for a run of at least two consecutive triples whose leftover
/// cards form the requested wings. Run ranks hold exactly three cards, so a
/// run rank never doubles as its own wing. Returns the top rank of the run
/// and its length; the longest run wins, then the highest.
fn airplane(
    groups: &BTreeMap<Rank, Vec<Card>>,
    total: usize,
    wings: Wings,
) -> Option<(Rank, usize)> {
    let triples: Vec<Rank> = groups
        .iter()
        .filter(|(rank, group)| group.len() == 3 && rank.is_sequenceable())
        .map(|(rank, _)| *rank)
        .collect();

    let mut best: Option<(Rank, usize)> = None;
    for start in 0..triples.len() {
        for end in (start + 2)..=triples.len() {
            let run = &triples[start..end];
            if !is_consecutive(run) {
                break;
            }
            let length = run.len();
            let leftover: Vec<usize> = groups
                .iter()
                .filter(|(rank, _)| !run.contains(rank))
                .map(|(_, group)| group.len())
                .collect();
            let wing_cards: usize = leftover.iter().sum();
            debug_assert_eq!(wing_cards + length * 3, total);

            let fits = match wings {
                Wings::None => wing_cards == 0,
                Wings::Singles => wing_cards == length,
                Wings::Pairs => {
                    leftover.iter().all(|&n| n % 2 == 0) && wing_cards == length * 2
                }
            };
            if !fits {
                continue;
            }
            let top = run[length - 1];
            let better = match best {
                None => true,
                Some((best_top, best_len)) => {
                    length > best_len || (length == best_len && top > best_top)
                }
            };
            if better {
                best = Some((top, length));
            }
        }
    }
    best
}
