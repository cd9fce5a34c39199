use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Suit {
    Spade = 0,
    Heart = 1,
    Club = 2,
    Diamond = 3,
    Joker = 4,
}

impl Suit {
    /// The four suits that carry numbered ranks.
    pub const STANDARD: [Suit; 4] = [Suit::Spade, Suit::Heart, Suit::Club, Suit::Diamond];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Suit::Spade),
            1 => Some(Suit::Heart),
            2 => Some(Suit::Club),
            3 => Some(Suit::Diamond),
            4 => Some(Suit::Joker),
            _ => None,
        }
    }

    pub const fn is_joker(self) -> bool {
        matches!(self, Suit::Joker)
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Suit::Spade => "S",
            Suit::Heart => "H",
            Suit::Club => "C",
            Suit::Diamond => "D",
            Suit::Joker => "*",
        };
        f.write_str(symbol)
    }
}
