use landlord_core::model::hand::Hand;
use landlord_core::model::mode::GameMode;
use landlord_core::model::rank::Rank;

const STRONG_HAND: u32 = 6;
const FAIR_HAND: u32 = 3;

/// Rough hand strength: half the high cards (K and above), two points per
/// bomb and one per joker.
pub fn bid_strength(hand: &Hand) -> u32 {
    let high = hand.iter().filter(|c| c.rank >= Rank::King).count();
    let jokers = hand.iter().filter(|c| c.is_joker()).count();
    let bombs = hand
        .rank_groups()
        .values()
        .filter(|group| group.len() == 4)
        .count();
    let score = high / 2 + bombs * 2 + jokers;
    u32::try_from(score).unwrap_or(u32::MAX)
}

/// Bid for a hand, in `0..=mode.max_bid()`.
pub fn choose_bid(hand: &Hand, mode: GameMode) -> u8 {
    let base = mode.max_bid();
    let strength = bid_strength(hand);
    if strength >= STRONG_HAND {
        base
    } else if strength >= FAIR_HAND {
        base.saturating_sub(1)
    } else {
        0
    }
}
