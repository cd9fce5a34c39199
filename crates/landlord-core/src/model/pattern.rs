use core::fmt;
use serde::{Deserialize, Serialize};

/// Closed set of play shapes, listed in ascending power order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardPattern {
    Invalid,
    Single,
    Pair,
    Triple,
    TripleWithSingle,
    TripleWithPair,
    Straight,
    DoubleSequence,
    Airplane,
    AirplaneWithSingle,
    AirplaneWithPair,
    FourWithTwoSingles,
    FourWithTwoPairs,
    Bomb,
    Rocket,
}

impl CardPattern {
    pub const fn power(self) -> i8 {
        match self {
            CardPattern::Invalid => -1,
            CardPattern::Single => 1,
            CardPattern::Pair => 2,
            CardPattern::Triple => 3,
            CardPattern::TripleWithSingle => 4,
            CardPattern::TripleWithPair => 5,
            CardPattern::Straight => 6,
            CardPattern::DoubleSequence => 7,
            CardPattern::Airplane => 8,
            CardPattern::AirplaneWithSingle => 9,
            CardPattern::AirplaneWithPair => 10,
            CardPattern::FourWithTwoSingles => 11,
            CardPattern::FourWithTwoPairs => 12,
            CardPattern::Bomb => 13,
            CardPattern::Rocket => 14,
        }
    }

    pub const fn is_valid(self) -> bool {
        !matches!(self, CardPattern::Invalid)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            CardPattern::Invalid => "invalid",
            CardPattern::Single => "single",
            CardPattern::Pair => "pair",
            CardPattern::Triple => "triple",
            CardPattern::TripleWithSingle => "triple_with_single",
            CardPattern::TripleWithPair => "triple_with_pair",
            CardPattern::Straight => "straight",
            CardPattern::DoubleSequence => "double_sequence",
            CardPattern::Airplane => "airplane",
            CardPattern::AirplaneWithSingle => "airplane_with_single",
            CardPattern::AirplaneWithPair => "airplane_with_pair",
            CardPattern::FourWithTwoSingles => "four_with_two_singles",
            CardPattern::FourWithTwoPairs => "four_with_two_pairs",
            CardPattern::Bomb => "bomb",
            CardPattern::Rocket => "rocket",
        }
    }
}

impl fmt::Display for CardPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
