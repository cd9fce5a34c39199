use crate::model::card::Card;
use crate::model::rank::Rank;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::vec::Vec;

/// A multiset of cards kept sorted by descending weight.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        let mut hand = Self { cards };
        hand.sort();
        hand
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
        self.sort();
    }

    pub fn extend_from(&mut self, cards: &[Card]) {
        self.cards.extend_from_slice(cards);
        self.sort();
    }

    /// Removes one physical card per entry in `played`, matching on
    /// `(suit, rank)`. Duplicates from a second deck are removed once each.
    /// Returns how many cards were actually removed.
    pub fn remove_cards(&mut self, played: &[Card]) -> usize {
        let mut removed = 0;
        for card in played {
            if let Some(index) = self.cards.iter().position(|c| c == card) {
                self.cards.remove(index);
                removed += 1;
            }
        }
        removed
    }

    pub fn without(&self, played: &[Card]) -> Hand {
        let mut next = self.clone();
        next.remove_cards(played);
        next
    }

    /// Multiset containment: every card in `selection`, counted with
    /// multiplicity, is present in the hand.
    pub fn contains_all(&self, selection: &[Card]) -> bool {
        let mut pool = self.cards.clone();
        selection.iter().all(|card| {
            match pool.iter().position(|c| c == card) {
                Some(index) => {
                    pool.swap_remove(index);
                    true
                }
                None => false,
            }
        })
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// The `count` lightest cards, lightest first.
    pub fn lowest(&self, count: usize) -> Vec<Card> {
        self.cards.iter().rev().take(count).copied().collect()
    }

    /// Cards grouped by rank, each group in hand order.
    pub fn rank_groups(&self) -> BTreeMap<Rank, Vec<Card>> {
        group_by_rank(&self.cards)
    }

    fn sort(&mut self) {
        self.cards
            .sort_by(|a, b| b.weight().cmp(&a.weight()).then(a.suit.cmp(&b.suit)));
    }
}

pub fn group_by_rank(cards: &[Card]) -> BTreeMap<Rank, Vec<Card>> {
    let mut groups: BTreeMap<Rank, Vec<Card>> = BTreeMap::new();
    for card in cards {
        groups.entry(card.rank).or_default().push(*card);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::Hand;
    use crate::model::card::Card;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    #[test]
    fn cards_are_sorted_by_descending_weight() {
        let hand = Hand::with_cards(vec![
            Card::new(Rank::Three, Suit::Club),
            Card::red_joker(),
            Card::new(Rank::Two, Suit::Heart),
            Card::new(Rank::Ace, Suit::Spade),
        ]);
        let weights: Vec<u8> = hand.iter().map(|c| c.weight()).collect();
        assert_eq!(weights, vec![17, 15, 14, 3]);
    }

    #[test]
    fn remove_takes_one_instance_per_played_card() {
        let seven = Card::new(Rank::Seven, Suit::Heart);
        let mut hand = Hand::with_cards(vec![seven, seven, Card::new(Rank::Eight, Suit::Club)]);
        assert_eq!(hand.remove_cards(&[seven]), 1);
        assert_eq!(hand.len(), 2);
        assert!(hand.contains(seven));
        assert_eq!(hand.remove_cards(&[seven, seven]), 1);
        assert!(!hand.contains(seven));
    }

    #[test]
    fn contains_all_respects_multiplicity() {
        let seven = Card::new(Rank::Seven, Suit::Heart);
        let hand = Hand::with_cards(vec![seven, Card::new(Rank::Seven, Suit::Club)]);
        assert!(hand.contains_all(&[seven]));
        assert!(!hand.contains_all(&[seven, seven]));
    }

    #[test]
    fn lowest_returns_lightest_first() {
        let hand = Hand::with_cards(vec![
            Card::new(Rank::King, Suit::Club),
            Card::new(Rank::Four, Suit::Club),
            Card::new(Rank::Nine, Suit::Club),
        ]);
        assert_eq!(hand.lowest(1), vec![Card::new(Rank::Four, Suit::Club)]);
    }

    #[test]
    fn without_leaves_original_untouched() {
        let card = Card::new(Rank::Five, Suit::Diamond);
        let hand = Hand::with_cards(vec![card]);
        let next = hand.without(&[card]);
        assert!(next.is_empty());
        assert_eq!(hand.len(), 1);
    }
}
