use core::fmt;
use serde::{Deserialize, Serialize};

/// Card rank. The discriminant is the comparison weight: three is the
/// lowest, two outranks ace, and the jokers sit on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Rank {
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
    Ace = 14,
    Two = 15,
    BlackJoker = 16,
    RedJoker = 17,
}

impl Rank {
    /// The thirteen ranks dealt in each standard suit, lowest first.
    pub const STANDARD: [Rank; 13] = [
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
        Rank::Two,
    ];

    pub const fn from_value(value: u8) -> Option<Self> {
        match value {
            3 => Some(Rank::Three),
            4 => Some(Rank::Four),
            5 => Some(Rank::Five),
            6 => Some(Rank::Six),
            7 => Some(Rank::Seven),
            8 => Some(Rank::Eight),
            9 => Some(Rank::Nine),
            10 => Some(Rank::Ten),
            11 => Some(Rank::Jack),
            12 => Some(Rank::Queen),
            13 => Some(Rank::King),
            14 => Some(Rank::Ace),
            15 => Some(Rank::Two),
            16 => Some(Rank::BlackJoker),
            17 => Some(Rank::RedJoker),
            _ => None,
        }
    }

    pub const fn value(self) -> u8 {
        self as u8
    }

    pub const fn is_joker(self) -> bool {
        matches!(self, Rank::BlackJoker | Rank::RedJoker)
    }

    /// Twos and jokers never take part in straights or sequences.
    pub const fn is_sequenceable(self) -> bool {
        (self as u8) < (Rank::Two as u8)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::BlackJoker => "BJ",
            Rank::RedJoker => "RJ",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::Rank;

    #[test]
    fn from_value_maps() {
        assert_eq!(Rank::from_value(11), Some(Rank::Jack));
        assert_eq!(Rank::from_value(15), Some(Rank::Two));
        assert_eq!(Rank::from_value(2), None);
        assert_eq!(Rank::from_value(18), None);
    }

    #[test]
    fn two_outranks_ace_and_jokers_outrank_two() {
        assert!(Rank::Two > Rank::Ace);
        assert!(Rank::BlackJoker > Rank::Two);
        assert!(Rank::RedJoker > Rank::BlackJoker);
    }

    #[test]
    fn sequenceable_stops_below_two() {
        assert!(Rank::Ace.is_sequenceable());
        assert!(!Rank::Two.is_sequenceable());
        assert!(!Rank::RedJoker.is_sequenceable());
    }

    #[test]
    fn display_matches_symbols() {
        assert_eq!(Rank::Queen.to_string(), "Q");
        assert_eq!(Rank::Two.to_string(), "2");
        assert_eq!(Rank::BlackJoker.to_string(), "BJ");
    }
}
