use crate::model::player::PlayerId;
use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    #[default]
    ThreePlayer,
    FourPlayer,
}

impl GameMode {
    pub const fn player_count(self) -> usize {
        match self {
            GameMode::ThreePlayer => 3,
            GameMode::FourPlayer => 4,
        }
    }

    pub const fn deck_count(self) -> usize {
        match self {
            GameMode::ThreePlayer => 1,
            GameMode::FourPlayer => 2,
        }
    }

    /// 54 cards per deck copy: 13 ranks in four suits plus two jokers.
    pub const fn deck_size(self) -> usize {
        self.deck_count() * 54
    }

    pub const fn bottom_count(self) -> usize {
        match self {
            GameMode::ThreePlayer => 3,
            GameMode::FourPlayer => 8,
        }
    }

    /// Highest bid a seat may declare.
    pub const fn max_bid(self) -> u8 {
        match self {
            GameMode::ThreePlayer => 3,
            GameMode::FourPlayer => 2,
        }
    }

    pub const fn deal_order(self) -> &'static [PlayerId] {
        match self {
            GameMode::ThreePlayer => &[PlayerId::Human, PlayerId::LeftAi, PlayerId::RightAi],
            GameMode::FourPlayer => &[
                PlayerId::Human,
                PlayerId::LeftAi,
                PlayerId::RightAi,
                PlayerId::TopAi,
            ],
        }
    }

    pub const fn turn_order(self) -> &'static [PlayerId] {
        match self {
            GameMode::ThreePlayer => &[PlayerId::Human, PlayerId::LeftAi, PlayerId::RightAi],
            GameMode::FourPlayer => &[
                PlayerId::Human,
                PlayerId::LeftAi,
                PlayerId::TopAi,
                PlayerId::RightAi,
            ],
        }
    }

    pub fn seats(self, id: PlayerId) -> bool {
        self.turn_order().contains(&id)
    }

    /// Next seat in turn order. Seats outside the mode map to the first seat.
    pub fn next_seat(self, current: PlayerId) -> PlayerId {
        let order = self.turn_order();
        let index = order.iter().position(|&seat| seat == current).unwrap_or(order.len() - 1);
        order[(index + 1) % order.len()]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GameMode::ThreePlayer => "three",
            GameMode::FourPlayer => "four",
        }
    }
}

impl core::str::FromStr for GameMode {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "three" | "3" | "three_player" => Ok(GameMode::ThreePlayer),
            "four" | "4" | "four_player" => Ok(GameMode::FourPlayer),
            other => Err(format!("unknown game mode '{other}'")),
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
