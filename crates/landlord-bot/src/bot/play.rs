use super::BotDifficulty;
use landlord_core::model::action::TurnAction;
use landlord_core::model::card::{Card, total_weight};
use landlord_core::model::hand::Hand;
use landlord_core::model::pattern::CardPattern;
use landlord_core::rules::{Classification, classify};

/// Every play a bot considers from `hand`, in order: singles (hand order),
/// then pairs, triples and bombs by descending rank. Sequences and
/// airplanes are never proposed.
pub fn play_candidates(hand: &Hand) -> Vec<TurnAction> {
    let mut candidates: Vec<TurnAction> = hand
        .iter()
        .map(|&card| TurnAction::play(vec![card], CardPattern::Single))
        .collect();

    let groups = hand.rank_groups();
    for (size, pattern) in [(2, CardPattern::Pair), (3, CardPattern::Triple)] {
        for group in groups.values().rev().filter(|g| g.len() >= size) {
            candidates.push(TurnAction::play(group[..size].to_vec(), pattern));
        }
    }
    for group in groups.values().rev().filter(|g| g.len() == 4) {
        candidates.push(TurnAction::play(group.clone(), CardPattern::Bomb));
    }
    candidates
}

/// Picks a play for `hand` against the `standing` play, or passes when no
/// candidate beats it.
pub fn choose_play(
    hand: &Hand,
    standing: Option<&TurnAction>,
    difficulty: BotDifficulty,
) -> TurnAction {
    let to_beat = standing
        .filter(|action| !action.is_pass())
        .map(|action| classify(action.cards()));
    let legal = legal_candidates(hand, to_beat.as_ref());
    if legal.is_empty() {
        return TurnAction::Pass;
    }

    let picked = match difficulty {
        BotDifficulty::Casual => cheapest(&legal),
        BotDifficulty::Thinking => thinking_pick(&legal, standing, to_beat.is_some()),
    };
    picked.cloned().unwrap_or(TurnAction::Pass)
}

/// Cards to highlight for a seat: the bot's own play, or the lowest card
/// when the bot would pass.
pub fn choose_hint(
    hand: &Hand,
    standing: Option<&TurnAction>,
    difficulty: BotDifficulty,
) -> Vec<Card> {
    match choose_play(hand, standing, difficulty) {
        TurnAction::Play { cards, .. } => cards,
        TurnAction::Pass => hand.lowest(1),
    }
}

fn legal_candidates(hand: &Hand, to_beat: Option<&Classification>) -> Vec<TurnAction> {
    let candidates = play_candidates(hand);
    match to_beat {
        None => candidates,
        Some(standing) => candidates
            .into_iter()
            .filter(|candidate| classify(candidate.cards()).beats(standing))
            .collect(),
    }
}

fn cheapest(candidates: &[TurnAction]) -> Option<&TurnAction> {
    candidates.iter().min_by_key(|c| total_weight(c.cards()))
}

fn thinking_pick<'a>(
    candidates: &'a [TurnAction],
    standing: Option<&TurnAction>,
    has_standing: bool,
) -> Option<&'a TurnAction> {
    let mut sorted: Vec<&TurnAction> = candidates.iter().collect();
    sorted.sort_by_key(|c| total_weight(c.cards()));

    let preferred = match standing {
        Some(previous) if has_standing => sorted.iter().find(|c| {
            c.pattern() == previous.pattern() && c.cards().len() == previous.cards().len()
        }),
        _ => sorted
            .iter()
            .find(|c| c.pattern() == Some(CardPattern::Single)),
    };
    preferred.or_else(|| sorted.first()).copied()
}
