use crate::model::action::TurnAction;
use crate::model::player::PlayerId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum GamePhase {
    #[default]
    Idle,
    Shuffling,
    Dealing,
    Bidding {
        current_bid: u8,
        bidder: PlayerId,
    },
    Robbing {
        current_bid: u8,
        robber: PlayerId,
    },
    Playing {
        current_player: PlayerId,
        /// Standing play of the current trick; `None` while the trick is open.
        last_action: Option<TurnAction>,
    },
    Settled {
        landlord: PlayerId,
        winner: PlayerId,
        multiplier: u32,
    },
}

impl GamePhase {
    /// Seat expected to act next, if the phase waits on one.
    pub fn actor(&self) -> Option<PlayerId> {
        match self {
            GamePhase::Bidding { bidder, .. } => Some(*bidder),
            GamePhase::Robbing { robber, .. } => Some(*robber),
            GamePhase::Playing { current_player, .. } => Some(*current_player),
            GamePhase::Idle
            | GamePhase::Shuffling
            | GamePhase::Dealing
            | GamePhase::Settled { .. } => None,
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, GamePhase::Settled { .. })
    }

    pub const fn name(&self) -> &'static str {
        match self {
            GamePhase::Idle => "idle",
            GamePhase::Shuffling => "shuffling",
            GamePhase::Dealing => "dealing",
            GamePhase::Bidding { .. } => "bidding",
            GamePhase::Robbing { .. } => "robbing",
            GamePhase::Playing { .. } => "playing",
            GamePhase::Settled { .. } => "settled",
        }
    }
}
