use crate::model::card::Card;
use crate::model::mode::GameMode;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Unshuffled deck for the mode: one copy of 13 ranks × 4 suits plus
    /// both jokers per deck in play.
    pub fn standard(mode: GameMode) -> Self {
        let mut cards = Vec::with_capacity(mode.deck_size());
        for _ in 0..mode.deck_count() {
            for rank in Rank::STANDARD.iter().copied() {
                for suit in Suit::STANDARD.iter().copied() {
                    cards.push(Card::new(rank, suit));
                }
            }
            cards.push(Card::black_joker());
            cards.push(Card::red_joker());
        }
        Self { cards }
    }

    pub fn generate<R: rand::Rng + ?Sized>(mode: GameMode, rng: &mut R) -> Self {
        let mut deck = Self::standard(mode);
        deck.shuffle_in_place(rng);
        deck
    }

    pub fn shuffled_with_seed(mode: GameMode, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::generate(mode, &mut rng)
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn shuffle_in_place<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }
}

#[cfg(test)]
mod tests {
    use super::Deck;
    use crate::model::card::Card;
    use crate::model::mode::GameMode;
    use std::collections::HashMap;

    #[test]
    fn three_player_deck_has_54_unique_cards() {
        let deck = Deck::standard(GameMode::ThreePlayer);
        assert_eq!(deck.len(), 54);
        let mut seen = std::collections::HashSet::new();
        assert!(deck.cards().iter().all(|card| seen.insert(*card)));
    }

    #[test]
    fn four_player_deck_holds_every_card_twice() {
        let deck = Deck::standard(GameMode::FourPlayer);
        assert_eq!(deck.len(), 108);
        let mut counts: HashMap<Card, usize> = HashMap::new();
        for card in deck.cards() {
            *counts.entry(*card).or_default() += 1;
        }
        assert_eq!(counts.len(), 54);
        assert!(counts.values().all(|&n| n == 2));
    }

    #[test]
    fn shuffle_with_seed_is_deterministic() {
        let deck_a = Deck::shuffled_with_seed(GameMode::ThreePlayer, 42);
        let deck_b = Deck::shuffled_with_seed(GameMode::ThreePlayer, 42);
        assert_eq!(deck_a.cards(), deck_b.cards());
    }

    #[test]
    fn shuffle_with_different_seeds_differs() {
        let deck_a = Deck::shuffled_with_seed(GameMode::ThreePlayer, 1);
        let deck_b = Deck::shuffled_with_seed(GameMode::ThreePlayer, 2);
        assert_ne!(deck_a.cards(), deck_b.cards());
    }
}
