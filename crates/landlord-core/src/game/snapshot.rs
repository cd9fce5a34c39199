use super::event::AudioCue;
use super::phase::GamePhase;
use super::session::Session;
use crate::model::action::TurnAction;
use crate::model::card::Card;
use crate::model::mode::GameMode;
use crate::model::player::{Player, PlayerId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Read model published to observers after every accepted transition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSnapshot {
    pub mode: GameMode,
    pub phase: GamePhase,
    pub players: Vec<Player>,
    pub landlord: Option<PlayerId>,
    pub bottom_cards: Vec<Card>,
    pub revealed_bottom: Vec<Card>,
    pub multiplier: u32,
    pub remaining_cards: BTreeMap<PlayerId, usize>,
    pub last_played: BTreeMap<PlayerId, TurnAction>,
    pub last_actor: Option<PlayerId>,
    pub discarded_count: usize,
    pub spring: bool,
    pub hint_selection: Vec<Card>,
    pub audio_cue: Option<AudioCue>,
}

impl GameSnapshot {
    pub fn capture(session: &Session) -> Self {
        let players: Vec<Player> = session
            .mode()
            .turn_order()
            .iter()
            .filter_map(|seat| session.player(*seat).cloned())
            .collect();
        let remaining_cards = players.iter().map(|p| (p.id, p.hand.len())).collect();

        GameSnapshot {
            mode: session.mode(),
            phase: session.phase().clone(),
            players,
            landlord: session.landlord(),
            bottom_cards: session.bottom_cards().to_vec(),
            revealed_bottom: session.revealed_bottom().to_vec(),
            multiplier: session.multiplier(),
            remaining_cards,
            last_played: session.last_played().clone(),
            last_actor: session.last_actor(),
            discarded_count: session.discarded().len(),
            spring: session.is_spring(),
            hint_selection: session.hint_selection().to_vec(),
            audio_cue: session.audio_cue(),
        }
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Seat whose input the table is waiting for.
    pub fn actor(&self) -> Option<PlayerId> {
        self.phase.actor()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::GameSnapshot;
    use crate::game::session::Session;
    use crate::model::mode::GameMode;
    use crate::model::player::PlayerId;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn idle_snapshot_is_empty() {
        let snapshot = Session::idle(GameMode::ThreePlayer).snapshot();
        assert!(snapshot.players.is_empty());
        assert_eq!(snapshot.multiplier, 1);
        assert_eq!(snapshot.actor(), None);
    }

    #[test]
    fn players_follow_turn_order() {
        let mut rng = StdRng::seed_from_u64(5);
        let session = Session::start(GameMode::FourPlayer, &mut rng).bidding;
        let snapshot = session.snapshot();
        let seats: Vec<PlayerId> = snapshot.players.iter().map(|p| p.id).collect();
        assert_eq!(seats, GameMode::FourPlayer.turn_order());
        assert_eq!(snapshot.remaining_cards[&PlayerId::TopAi], 25);
        assert_eq!(snapshot.actor(), Some(PlayerId::Human));
    }

    #[test]
    fn json_roundtrip_preserves_state() {
        let mut rng = StdRng::seed_from_u64(6);
        let session = Session::start(GameMode::ThreePlayer, &mut rng)
            .bidding
            .decide_landlord(PlayerId::LeftAi)
            .unwrap();
        let snapshot = session.snapshot();
        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"phase\": \"playing\""));
        assert!(json.contains("\"landlord\": \"left_ai\""));
        let restored = GameSnapshot::from_json(&json).unwrap();
        assert_eq!(restored, snapshot);
    }
}
