use crate::model::card::Card;
use crate::model::deck::Deck;
use crate::model::hand::Hand;
use crate::model::mode::GameMode;
use crate::model::player::PlayerId;
use std::collections::BTreeMap;

/// Hands and bottom stack produced by a deal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    pub hands: BTreeMap<PlayerId, Hand>,
    pub bottom: Vec<Card>,
}

impl Deal {
    pub fn card_count(&self) -> usize {
        self.hands.values().map(Hand::len).sum::<usize>() + self.bottom.len()
    }
}

/// Round-robin deal from the top of the deck, one card per seat in the
/// mode's deal order, until only the bottom stack remains.
pub fn deal(mode: GameMode, deck: Deck) -> Deal {
    let order = mode.deal_order();
    let bottom_count = mode.bottom_count();
    let mut cards = deck.into_cards();
    let dealt = cards.len().saturating_sub(bottom_count);
    let bottom = cards.split_off(dealt);

    let mut piles: BTreeMap<PlayerId, Vec<Card>> =
        order.iter().map(|&seat| (seat, Vec::new())).collect();
    for (index, card) in cards.into_iter().enumerate() {
        let seat = order[index % order.len()];
        piles.entry(seat).or_default().push(card);
    }

    let hands = piles
        .into_iter()
        .map(|(seat, cards)| (seat, Hand::with_cards(cards)))
        .collect();

    Deal { hands, bottom }
}

/// The landlord's hand after picking up the bottom cards.
pub fn award_bottom(hand: &Hand, bottom: &[Card]) -> Hand {
    let mut next = hand.clone();
    next.extend_from(bottom);
    next
}

pub fn is_win(hand: &Hand) -> bool {
    hand.is_empty()
}
