use super::{Policy, PolicyContext};
use crate::bot::{BotDifficulty, bid_strength, choose_bid, choose_hint, choose_play};
use landlord_core::model::action::TurnAction;
use landlord_core::model::card::{Card, friendly};
use tracing::{Level, event};

/// Rule-based bot covering both difficulty profiles.
#[derive(Debug, Clone, Default)]
pub struct HeuristicPolicy {
    difficulty: BotDifficulty,
}

impl HeuristicPolicy {
    pub fn new(difficulty: BotDifficulty) -> Self {
        Self { difficulty }
    }

    pub fn casual() -> Self {
        Self::new(BotDifficulty::Casual)
    }

    pub fn thinking() -> Self {
        Self::new(BotDifficulty::Thinking)
    }
}

impl Policy for HeuristicPolicy {
    fn difficulty(&self) -> BotDifficulty {
        self.difficulty
    }

    fn set_difficulty(&mut self, difficulty: BotDifficulty) {
        self.difficulty = difficulty;
    }

    fn choose_bid(&mut self, ctx: &PolicyContext) -> u8 {
        let bid = choose_bid(ctx.hand, ctx.mode);
        event!(
            target: "landlord_bot::decision",
            Level::DEBUG,
            seat = %ctx.seat,
            difficulty = %self.difficulty,
            strength = bid_strength(ctx.hand),
            bid,
            "bid_decision"
        );
        bid
    }

    fn choose_play(&mut self, ctx: &PolicyContext) -> TurnAction {
        let action = choose_play(ctx.hand, ctx.standing, self.difficulty);
        log_play_decision(ctx, self.difficulty, &action);
        action
    }

    fn choose_hint(&mut self, ctx: &PolicyContext) -> Vec<Card> {
        choose_hint(ctx.hand, ctx.standing, self.difficulty)
    }
}

fn log_play_decision(ctx: &PolicyContext, difficulty: BotDifficulty, action: &TurnAction) {
    if !tracing::enabled!(target: "landlord_bot::decision", Level::DEBUG) {
        return;
    }

    let standing = ctx
        .standing
        .map(|play| friendly(play.cards()))
        .unwrap_or_default();
    let chosen = match action {
        TurnAction::Pass => "pass".to_string(),
        TurnAction::Play { cards, .. } => friendly(cards),
    };
    let pattern = action.pattern().map(|p| p.as_str()).unwrap_or("pass");

    event!(
        target: "landlord_bot::decision",
        Level::DEBUG,
        seat = %ctx.seat,
        difficulty = %difficulty,
        hand_size = ctx.hand.len(),
        standing = %standing,
        pattern,
        chosen = %chosen,
        "play_decision"
    );
}

#[cfg(test)]
mod tests {
    use super::HeuristicPolicy;
    use crate::bot::BotDifficulty;
    use crate::policy::{Policy, PolicyContext};
    use landlord_core::model::action::TurnAction;
    use landlord_core::model::card::Card;
    use landlord_core::model::hand::Hand;
    use landlord_core::model::mode::GameMode;
    use landlord_core::model::pattern::CardPattern;
    use landlord_core::model::player::PlayerId;
    use landlord_core::model::rank::Rank;
    use landlord_core::model::suit::Suit;

    fn strong_hand() -> Hand {
        let mut cards: Vec<Card> = Suit::STANDARD
            .iter()
            .map(|&suit| Card::new(Rank::Two, suit))
            .collect();
        cards.push(Card::black_joker());
        cards.push(Card::red_joker());
        cards.push(Card::new(Rank::Four, Suit::Club));
        Hand::with_cards(cards)
    }

    fn weak_hand() -> Hand {
        Hand::with_cards(vec![
            Card::new(Rank::Three, Suit::Club),
            Card::new(Rank::Six, Suit::Heart),
            Card::new(Rank::Eight, Suit::Spade),
        ])
    }

    fn ctx<'a>(hand: &'a Hand, standing: Option<&'a TurnAction>) -> PolicyContext<'a> {
        PolicyContext {
            seat: PlayerId::LeftAi,
            mode: GameMode::ThreePlayer,
            hand,
            standing,
        }
    }

    #[test]
    fn weak_hand_never_bids() {
        let hand = weak_hand();
        for difficulty in BotDifficulty::ALL {
            let mut policy = HeuristicPolicy::new(difficulty);
            assert_eq!(policy.choose_bid(&ctx(&hand, None)), 0);
            assert_eq!(policy.choose_rob(&ctx(&hand, None), 1), 0);
        }
    }

    #[test]
    fn strong_hand_robs_at_or_above_standing_bid() {
        let hand = strong_hand();
        let mut policy = HeuristicPolicy::casual();
        assert_eq!(policy.choose_bid(&ctx(&hand, None)), 3);
        assert_eq!(policy.choose_rob(&ctx(&hand, None), 3), 3);
    }

    #[test]
    fn difficulty_switch_is_observable() {
        let mut policy = HeuristicPolicy::default();
        assert_eq!(policy.difficulty(), BotDifficulty::Casual);
        policy.set_difficulty(BotDifficulty::Thinking);
        assert_eq!(policy.difficulty(), BotDifficulty::Thinking);
        assert_eq!(HeuristicPolicy::thinking().difficulty(), BotDifficulty::Thinking);
    }

    #[test]
    fn play_beats_standing_single() {
        let hand = strong_hand();
        let standing = TurnAction::play(vec![Card::new(Rank::Ace, Suit::Spade)], CardPattern::Single);
        let mut policy = HeuristicPolicy::thinking();
        let action = policy.choose_play(&ctx(&hand, Some(&standing)));
        assert_eq!(action.pattern(), Some(CardPattern::Single));
        assert_eq!(action.cards()[0].rank, Rank::Two);
        let hint = policy.choose_hint(&ctx(&hand, Some(&standing)));
        assert_eq!(hint, action.cards());
    }
}
