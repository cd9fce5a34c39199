use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use serde::{Deserialize, Serialize};

/// A physical card. Identity is `(suit, rank)`; ordering goes through
/// [`Card::weight`] only, so no `Ord` impl is provided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { suit, rank }
    }

    pub const fn black_joker() -> Self {
        Self::new(Rank::BlackJoker, Suit::Joker)
    }

    pub const fn red_joker() -> Self {
        Self::new(Rank::RedJoker, Suit::Joker)
    }

    pub const fn weight(self) -> u8 {
        self.rank.value()
    }

    pub const fn is_joker(self) -> bool {
        self.rank.is_joker()
    }

    pub fn display_name(self) -> String {
        self.rank.to_string()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_joker() {
            write!(f, "{}", self.rank)
        } else {
            write!(f, "{}{}", self.rank, self.suit)
        }
    }
}

/// Comma separated rank names, the way a player reads a selection aloud.
pub fn friendly(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|card| card.display_name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Sum of card weights, used by the bots to rank candidate plays.
pub fn total_weight(cards: &[Card]) -> u32 {
    cards.iter().map(|card| u32::from(card.weight())).sum()
}
