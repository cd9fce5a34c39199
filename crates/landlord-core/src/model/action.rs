use crate::model::card::Card;
use crate::model::pattern::CardPattern;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TurnAction {
    Pass,
    Play {
        cards: Vec<Card>,
        pattern: CardPattern,
    },
}

impl TurnAction {
    pub fn play(cards: Vec<Card>, pattern: CardPattern) -> Self {
        TurnAction::Play { cards, pattern }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, TurnAction::Pass)
    }

    pub fn cards(&self) -> &[Card] {
        match self {
            TurnAction::Pass => &[],
            TurnAction::Play { cards, .. } => cards,
        }
    }

    pub fn pattern(&self) -> Option<CardPattern> {
        match self {
            TurnAction::Pass => None,
            TurnAction::Play { pattern, .. } => Some(*pattern),
        }
    }
}
