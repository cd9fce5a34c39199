use crate::model::action::TurnAction;
use crate::model::mode::GameMode;
use crate::model::player::PlayerId;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Driver-issued events accepted by the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    Start { mode: GameMode },
    Bid { player: PlayerId, score: u8 },
    Rob { player: PlayerId, score: u8 },
    DecideLandlord { player: PlayerId },
    PlayCards { player: PlayerId, action: TurnAction },
    Finish,
}

impl GameEvent {
    pub fn actor(&self) -> Option<PlayerId> {
        match self {
            GameEvent::Bid { player, .. }
            | GameEvent::Rob { player, .. }
            | GameEvent::DecideLandlord { player }
            | GameEvent::PlayCards { player, .. } => Some(*player),
            GameEvent::Start { .. } | GameEvent::Finish => None,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            GameEvent::Start { .. } => "start",
            GameEvent::Bid { .. } => "bid",
            GameEvent::Rob { .. } => "rob",
            GameEvent::DecideLandlord { .. } => "decide_landlord",
            GameEvent::PlayCards { .. } => "play_cards",
            GameEvent::Finish => "finish",
        }
    }
}

/// One-shot cue for the audio layer, set by the transition that produced
/// the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioCue {
    Shuffle,
    Deal,
    Play,
    Pass,
    Win,
    Lose,
}

impl fmt::Display for AudioCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AudioCue::Shuffle => "shuffle",
            AudioCue::Deal => "deal",
            AudioCue::Play => "play",
            AudioCue::Pass => "pass",
            AudioCue::Win => "win",
            AudioCue::Lose => "lose",
        };
        f.write_str(label)
    }
}
