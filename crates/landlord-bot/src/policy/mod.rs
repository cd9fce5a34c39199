mod heuristic;

pub use heuristic::HeuristicPolicy;

use crate::bot::BotDifficulty;
use landlord_core::model::action::TurnAction;
use landlord_core::model::card::Card;
use landlord_core::model::hand::Hand;
use landlord_core::model::mode::GameMode;
use landlord_core::model::player::PlayerId;
use landlord_core::{GameEvent, GamePhase, Session};

/// What a policy sees when asked to act for a seat.
pub struct PolicyContext<'a> {
    pub seat: PlayerId,
    pub mode: GameMode,
    pub hand: &'a Hand,
    /// The play to beat this trick, if any.
    pub standing: Option<&'a TurnAction>,
}

/// Decision interface shared by bot seats and the human-seat hint.
pub trait Policy: Send {
    fn difficulty(&self) -> BotDifficulty;

    fn set_difficulty(&mut self, difficulty: BotDifficulty);

    /// Opening bid, `0` to pass.
    fn choose_bid(&mut self, ctx: &PolicyContext) -> u8;

    /// Counter-bid while robbing: the bot's own bid when it reaches the
    /// standing one, otherwise `0`.
    fn choose_rob(&mut self, ctx: &PolicyContext, current_bid: u8) -> u8 {
        let bid = self.choose_bid(ctx);
        if bid > 0 && bid >= current_bid { bid } else { 0 }
    }

    fn choose_play(&mut self, ctx: &PolicyContext) -> TurnAction;

    fn choose_hint(&mut self, ctx: &PolicyContext) -> Vec<Card>;
}

/// The event `policy` would send for `seat` in the current phase, or
/// `None` when `seat` is not the one to act.
///
/// An opening bid that does not top the standing bid is sent as a pass.
pub fn propose<P: Policy + ?Sized>(
    policy: &mut P,
    session: &Session,
    seat: PlayerId,
) -> Option<GameEvent> {
    if session.phase().actor() != Some(seat) {
        return None;
    }
    let player = session.player(seat)?;
    let mut ctx = PolicyContext {
        seat,
        mode: session.mode(),
        hand: &player.hand,
        standing: None,
    };
    let event = match session.phase() {
        GamePhase::Bidding { current_bid, .. } => {
            let bid = policy.choose_bid(&ctx);
            GameEvent::Bid {
                player: seat,
                score: if bid > *current_bid { bid } else { 0 },
            }
        }
        GamePhase::Robbing { current_bid, .. } => GameEvent::Rob {
            player: seat,
            score: policy.choose_rob(&ctx, *current_bid),
        },
        GamePhase::Playing { last_action, .. } => {
            ctx.standing = last_action.as_ref();
            GameEvent::PlayCards {
                player: seat,
                action: policy.choose_play(&ctx),
            }
        }
        _ => return None,
    };
    Some(event)
}
