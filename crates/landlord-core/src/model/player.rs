use crate::model::hand::Hand;
use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum PlayerId {
    Human = 0,
    LeftAi = 1,
    RightAi = 2,
    TopAi = 3,
}

impl PlayerId {
    pub const ALL: [PlayerId; 4] = [
        PlayerId::Human,
        PlayerId::LeftAi,
        PlayerId::RightAi,
        PlayerId::TopAi,
    ];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(PlayerId::Human),
            1 => Some(PlayerId::LeftAi),
            2 => Some(PlayerId::RightAi),
            3 => Some(PlayerId::TopAi),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn is_human(self) -> bool {
        matches!(self, PlayerId::Human)
    }

    pub const fn label(self) -> &'static str {
        match self {
            PlayerId::Human => "human",
            PlayerId::LeftAi => "left",
            PlayerId::RightAi => "right",
            PlayerId::TopAi => "top",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            PlayerId::Human => "You",
            PlayerId::LeftAi => "Left",
            PlayerId::RightAi => "Right",
            PlayerId::TopAi => "Top",
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl core::str::FromStr for PlayerId {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(PlayerId::Human),
            "left" | "left_ai" => Ok(PlayerId::LeftAi),
            "right" | "right_ai" => Ok(PlayerId::RightAi),
            "top" | "top_ai" => Ok(PlayerId::TopAi),
            other => Err(format!("unknown seat '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub is_human: bool,
    pub hand: Hand,
    pub is_landlord: bool,
    pub score: i32,
}

impl Player {
    pub fn seated(id: PlayerId, hand: Hand) -> Self {
        Self {
            id,
            name: id.display_name().to_string(),
            is_human: id.is_human(),
            hand,
            is_landlord: false,
            score: 0,
        }
    }

    pub fn with_hand(&self, hand: Hand) -> Self {
        Self {
            hand,
            ..self.clone()
        }
    }

    pub fn with_landlord(&self, is_landlord: bool) -> Self {
        Self {
            is_landlord,
            ..self.clone()
        }
    }
}
