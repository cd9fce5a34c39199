use crate::engine::{self, Side};
use crate::game::event::{AudioCue, GameEvent};
use crate::game::phase::GamePhase;
use crate::game::snapshot::GameSnapshot;
use crate::model::action::TurnAction;
use crate::model::card::Card;
use crate::model::deck::Deck;
use crate::model::mode::GameMode;
use crate::model::player::{Player, PlayerId};
use crate::rules::{Classification, classify};
use std::collections::BTreeMap;
use std::fmt;

/// The whole state of one hand.
///
/// Every transition borrows the current session and returns a new one;
/// a rejected event leaves the original untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    mode: GameMode,
    players: BTreeMap<PlayerId, Player>,
    landlord: Option<PlayerId>,
    bottom_cards: Vec<Card>,
    revealed_bottom: Vec<Card>,
    phase: GamePhase,
    multiplier: u32,
    last_played: BTreeMap<PlayerId, TurnAction>,
    last_actor: Option<PlayerId>,
    discarded: Vec<Card>,
    plays_by_seat: BTreeMap<PlayerId, u32>,
    auction: Auction,
    trick: Trick,
    spring: bool,
    hint_selection: Vec<Card>,
    audio_cue: Option<AudioCue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Auction {
    opening: Option<PlayerId>,
    pending: Option<PlayerId>,
    passes: usize,
    robbers_left: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Trick {
    owner: Option<PlayerId>,
    standing: Option<Classification>,
    passes: usize,
}

/// The three snapshots published while a hand starts.
#[derive(Debug, Clone)]
pub struct StartStages {
    pub shuffling: Session,
    pub dealing: Session,
    pub bidding: Session,
}

impl StartStages {
    pub fn into_vec(self) -> Vec<Session> {
        vec![self.shuffling, self.dealing, self.bidding]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    NotInPhase {
        event: &'static str,
        phase: &'static str,
    },
    UnknownSeat(PlayerId),
    OutOfTurn {
        expected: PlayerId,
        actual: PlayerId,
    },
    InvalidBid {
        score: u8,
        min: u8,
        max: u8,
    },
    InvalidSelection,
    CardsNotInHand,
    NotDominant,
    MustLead,
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::NotInPhase { event, phase } => {
                write!(f, "{event} is not accepted while {phase}")
            }
            ActionError::UnknownSeat(seat) => write!(f, "{seat} has no seat in this mode"),
            ActionError::OutOfTurn { expected, actual } => {
                write!(f, "expected {expected} to act but got {actual}")
            }
            ActionError::InvalidBid { score, min, max } => {
                write!(f, "bid {score} must be 0 or between {min} and {max}")
            }
            ActionError::InvalidSelection => write!(f, "selection does not form a pattern"),
            ActionError::CardsNotInHand => write!(f, "selection is not held in hand"),
            ActionError::NotDominant => write!(f, "selection does not beat the standing play"),
            ActionError::MustLead => write!(f, "the trick leader cannot pass"),
        }
    }
}

impl std::error::Error for ActionError {}

impl Default for Session {
    fn default() -> Self {
        Self::idle(GameMode::default())
    }
}

impl Session {
    pub fn idle(mode: GameMode) -> Self {
        Self {
            mode,
            players: BTreeMap::new(),
            landlord: None,
            bottom_cards: Vec::new(),
            revealed_bottom: Vec::new(),
            phase: GamePhase::Idle,
            multiplier: 1,
            last_played: BTreeMap::new(),
            last_actor: None,
            discarded: Vec::new(),
            plays_by_seat: BTreeMap::new(),
            auction: Auction::default(),
            trick: Trick::default(),
            spring: false,
            hint_selection: Vec::new(),
            audio_cue: None,
        }
    }

    /// Shuffles a fresh deck for `mode` and deals it, producing the
    /// shuffling, dealing and bidding stages in order.
    pub fn start<R: rand::Rng + ?Sized>(mode: GameMode, rng: &mut R) -> StartStages {
        Self::start_with_deck(mode, Deck::generate(mode, rng))
    }

    pub fn start_with_deck(mode: GameMode, deck: Deck) -> StartStages {
        let mut shuffling = Self::idle(mode);
        shuffling.phase = GamePhase::Shuffling;
        shuffling.audio_cue = Some(AudioCue::Shuffle);

        let dealt = engine::deal(mode, deck);
        let mut dealing = Self::idle(mode);
        dealing.players = dealt
            .hands
            .into_iter()
            .map(|(seat, hand)| (seat, Player::seated(seat, hand)))
            .collect();
        dealing.bottom_cards = dealt.bottom;
        dealing.phase = GamePhase::Dealing;
        dealing.audio_cue = Some(AudioCue::Deal);

        let opening = mode.turn_order()[0];
        let mut bidding = dealing.clone();
        bidding.phase = GamePhase::Bidding {
            current_bid: 0,
            bidder: opening,
        };
        bidding.auction.opening = Some(opening);
        bidding.audio_cue = None;

        StartStages {
            shuffling,
            dealing,
            bidding,
        }
    }

    /// Applies one event and returns the sessions to publish, in order.
    /// `Start` yields its three stages; every other event yields one.
    pub fn apply<R: rand::Rng + ?Sized>(
        &self,
        event: &GameEvent,
        rng: &mut R,
    ) -> Result<Vec<Session>, ActionError> {
        let next = match event {
            GameEvent::Start { mode } => return Ok(Self::start(*mode, rng).into_vec()),
            GameEvent::Bid { player, score } => self.bid(*player, *score)?,
            GameEvent::Rob { player, score } => self.rob(*player, *score)?,
            GameEvent::DecideLandlord { player } => self.decide_landlord(*player)?,
            GameEvent::PlayCards { player, action } => self.play(*player, action)?,
            GameEvent::Finish => self.finish(),
        };
        Ok(vec![next])
    }

    /// Back to idle, keeping only the mode.
    pub fn finish(&self) -> Session {
        Self::idle(self.mode)
    }

    pub fn bid(&self, player: PlayerId, score: u8) -> Result<Session, ActionError> {
        let GamePhase::Bidding {
            current_bid,
            bidder,
        } = self.phase
        else {
            return Err(self.wrong_phase("bid"));
        };
        self.ensure_turn(player, bidder)?;
        let max = self.mode.max_bid();
        if score != 0 && (score <= current_bid || score > max) {
            return Err(ActionError::InvalidBid {
                score,
                min: current_bid + 1,
                max,
            });
        }

        let mut next = self.begin_transition();
        if score == 0 {
            next.auction.passes += 1;
            if next.auction.passes >= self.mode.player_count() {
                let fallback = self.auction.opening.unwrap_or(player);
                return Ok(next.assign_landlord(fallback));
            }
            next.phase = GamePhase::Bidding {
                current_bid,
                bidder: self.mode.next_seat(player),
            };
        } else {
            next.auction.pending = Some(player);
            next.auction.robbers_left = self.mode.player_count() - 1;
            next.multiplier = next.multiplier.max(u32::from(score));
            next.phase = GamePhase::Robbing {
                current_bid: score,
                robber: self.mode.next_seat(player),
            };
        }
        Ok(next)
    }

    pub fn rob(&self, player: PlayerId, score: u8) -> Result<Session, ActionError> {
        let GamePhase::Robbing {
            current_bid,
            robber,
        } = self.phase
        else {
            return Err(self.wrong_phase("rob"));
        };
        self.ensure_turn(player, robber)?;
        let max = self.mode.max_bid();
        if score > max {
            return Err(ActionError::InvalidBid {
                score,
                min: current_bid,
                max,
            });
        }

        let mut next = self.begin_transition();
        let mut bid = current_bid;
        if score > 0 && score >= current_bid {
            next.auction.pending = Some(player);
            bid = bid.max(score);
            next.multiplier = next.multiplier.max(u32::from(bid));
        }
        next.auction.robbers_left = next.auction.robbers_left.saturating_sub(1);
        if next.auction.robbers_left == 0 {
            let landlord = next.auction.pending.unwrap_or(player);
            return Ok(next.assign_landlord(landlord));
        }
        next.phase = GamePhase::Robbing {
            current_bid: bid,
            robber: self.mode.next_seat(player),
        };
        Ok(next)
    }

    pub fn decide_landlord(&self, player: PlayerId) -> Result<Session, ActionError> {
        if !matches!(
            self.phase,
            GamePhase::Bidding { .. } | GamePhase::Robbing { .. }
        ) {
            return Err(self.wrong_phase("decide_landlord"));
        }
        self.ensure_seated(player)?;
        Ok(self.begin_transition().assign_landlord(player))
    }

    pub fn play(&self, player: PlayerId, action: &TurnAction) -> Result<Session, ActionError> {
        let GamePhase::Playing { current_player, .. } = &self.phase else {
            return Err(self.wrong_phase("play_cards"));
        };
        self.ensure_turn(player, *current_player)?;

        match action {
            TurnAction::Pass => self.pass(player),
            TurnAction::Play { cards, .. } => self.play_cards(player, cards),
        }
    }

    fn pass(&self, player: PlayerId) -> Result<Session, ActionError> {
        let (Some(standing), Some(owner)) = (self.standing_action(), self.trick.owner) else {
            return Err(ActionError::MustLead);
        };

        let mut next = self.begin_transition();
        next.audio_cue = Some(AudioCue::Pass);
        next.last_played.insert(player, TurnAction::Pass);
        next.last_actor = Some(player);
        next.trick.passes += 1;

        let last_action = if next.trick.passes >= self.mode.player_count() - 1 {
            next.trick = Trick::default();
            None
        } else {
            Some(standing)
        };
        let next_player = self.mode.next_seat(player);
        debug_assert!(last_action.is_some() || next_player == owner);
        next.phase = GamePhase::Playing {
            current_player: next_player,
            last_action,
        };
        Ok(next)
    }

    fn play_cards(&self, player: PlayerId, cards: &[Card]) -> Result<Session, ActionError> {
        let classification = classify(cards);
        if !classification.is_valid() {
            return Err(ActionError::InvalidSelection);
        }
        let seat = self.seat(player)?;
        if !seat.hand.contains_all(cards) {
            return Err(ActionError::CardsNotInHand);
        }
        if let Some(standing) = &self.trick.standing {
            if !classification.beats(standing) {
                return Err(ActionError::NotDominant);
            }
        }

        let action = TurnAction::play(cards.to_vec(), classification.pattern);
        let remaining = seat.hand.without(cards);
        let emptied = engine::is_win(&remaining);

        let mut next = self.begin_transition();
        next.audio_cue = Some(AudioCue::Play);
        next.players.insert(player, seat.with_hand(remaining));
        next.discarded.extend_from_slice(cards);
        *next.plays_by_seat.entry(player).or_default() += 1;
        next.multiplier = engine::next_multiplier(next.multiplier, &action);
        next.last_played.insert(player, action.clone());
        next.last_actor = Some(player);
        next.trick = Trick {
            owner: Some(player),
            standing: Some(classification),
            passes: 0,
        };

        if emptied {
            return Ok(next.settle(player));
        }
        next.phase = GamePhase::Playing {
            current_player: self.mode.next_seat(player),
            last_action: Some(action),
        };
        Ok(next)
    }

    /// Copy of this session with a hint stored for display. Phase, hands and
    /// multiplier are unchanged; the audio cue is dropped so it fires once.
    pub fn with_hint(&self, cards: Vec<Card>) -> Session {
        Session {
            hint_selection: cards,
            audio_cue: None,
            last_actor: None,
            ..self.clone()
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn phase(&self) -> &GamePhase {
        &self.phase
    }

    pub fn players(&self) -> &BTreeMap<PlayerId, Player> {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn landlord(&self) -> Option<PlayerId> {
        self.landlord
    }

    pub fn bottom_cards(&self) -> &[Card] {
        &self.bottom_cards
    }

    pub fn revealed_bottom(&self) -> &[Card] {
        &self.revealed_bottom
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    pub fn last_played(&self) -> &BTreeMap<PlayerId, TurnAction> {
        &self.last_played
    }

    /// Seat behind the play or pass this session was produced by.
    pub fn last_actor(&self) -> Option<PlayerId> {
        self.last_actor
    }

    pub fn discarded(&self) -> &[Card] {
        &self.discarded
    }

    pub fn is_spring(&self) -> bool {
        self.spring
    }

    pub fn hint_selection(&self) -> &[Card] {
        &self.hint_selection
    }

    pub fn audio_cue(&self) -> Option<AudioCue> {
        self.audio_cue
    }

    /// The play the current seat has to beat, if any.
    pub fn standing_action(&self) -> Option<TurnAction> {
        match &self.phase {
            GamePhase::Playing { last_action, .. } => last_action.clone(),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(self)
    }

    /// Cards in hands, in the bottom stack and in the discard pile add up
    /// to the deck once a hand has been dealt.
    pub fn conservation_holds(&self) -> bool {
        let held: usize = self.players.values().map(|p| p.hand.len()).sum();
        let total = held + self.bottom_cards.len() + self.discarded.len();
        match self.phase {
            GamePhase::Idle | GamePhase::Shuffling => total == 0,
            _ => total == self.mode.deck_size(),
        }
    }

    fn begin_transition(&self) -> Session {
        Session {
            hint_selection: Vec::new(),
            audio_cue: None,
            last_actor: None,
            ..self.clone()
        }
    }

    fn assign_landlord(mut self, landlord: PlayerId) -> Session {
        let bottom = std::mem::take(&mut self.bottom_cards);
        self.players = self
            .players
            .iter()
            .map(|(&seat, player)| {
                let updated = if seat == landlord {
                    player
                        .with_hand(engine::award_bottom(&player.hand, &bottom))
                        .with_landlord(true)
                } else {
                    player.with_landlord(false)
                };
                (seat, updated)
            })
            .collect();
        self.revealed_bottom = bottom;
        self.landlord = Some(landlord);
        self.multiplier = self.multiplier.max(1);
        self.auction = Auction::default();
        self.trick = Trick::default();
        self.phase = GamePhase::Playing {
            current_player: landlord,
            last_action: None,
        };
        self
    }

    fn settle(mut self, winner: PlayerId) -> Session {
        let landlord = self.landlord.unwrap_or(winner);
        let winners = Side::of(winner, landlord);
        let losers = winners.opponent();
        let losing_plays: u32 = self
            .plays_by_seat
            .iter()
            .filter(|(seat, _)| Side::of(**seat, landlord) == losers)
            .map(|(_, plays)| *plays)
            .sum();

        self.spring = engine::is_spring(losing_plays);
        self.multiplier = engine::apply_spring(self.multiplier, losing_plays);
        let deltas = engine::settlement_deltas(self.mode, landlord, winners, self.multiplier);
        for (seat, delta) in deltas {
            if let Some(player) = self.players.get_mut(&seat) {
                player.score += delta;
            }
        }

        let human_side = Side::of(PlayerId::Human, landlord);
        self.audio_cue = Some(if human_side == winners {
            AudioCue::Win
        } else {
            AudioCue::Lose
        });
        self.trick = Trick::default();
        self.phase = GamePhase::Settled {
            landlord,
            winner,
            multiplier: self.multiplier,
        };
        self
    }

    fn seat(&self, player: PlayerId) -> Result<&Player, ActionError> {
        self.players
            .get(&player)
            .ok_or(ActionError::UnknownSeat(player))
    }

    fn ensure_seated(&self, player: PlayerId) -> Result<(), ActionError> {
        self.seat(player).map(|_| ())
    }

    fn ensure_turn(&self, player: PlayerId, expected: PlayerId) -> Result<(), ActionError> {
        self.ensure_seated(player)?;
        if player != expected {
            return Err(ActionError::OutOfTurn {
                expected,
                actual: player,
            });
        }
        Ok(())
    }

    fn wrong_phase(&self, event: &'static str) -> ActionError {
        ActionError::NotInPhase {
            event,
            phase: self.phase.name(),
        }
    }
}
