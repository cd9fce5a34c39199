mod bid;
mod play;

pub use bid::{bid_strength, choose_bid};
pub use play::{choose_hint, choose_play, play_candidates};

use core::fmt;

/// Bot profile. Both profiles share candidate generation and differ only
/// in how a candidate is picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BotDifficulty {
    #[default]
    Casual,
    Thinking,
}

impl BotDifficulty {
    pub const ALL: [BotDifficulty; 2] = [BotDifficulty::Casual, BotDifficulty::Thinking];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "casual" | "easy" => Some(BotDifficulty::Casual),
            "thinking" | "hard" => Some(BotDifficulty::Thinking),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            BotDifficulty::Casual => "casual",
            BotDifficulty::Thinking => "thinking",
        }
    }
}

impl fmt::Display for BotDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for BotDifficulty {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw).ok_or_else(|| format!("unknown difficulty '{}'", raw.trim()))
    }
}
