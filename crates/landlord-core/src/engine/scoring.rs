use crate::model::action::TurnAction;
use crate::model::mode::GameMode;
use crate::model::pattern::CardPattern;
use crate::model::player::PlayerId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Landlord,
    Peasants,
}

impl Side {
    pub fn of(seat: PlayerId, landlord: PlayerId) -> Self {
        if seat == landlord {
            Side::Landlord
        } else {
            Side::Peasants
        }
    }

    pub const fn opponent(self) -> Self {
        match self {
            Side::Landlord => Side::Peasants,
            Side::Peasants => Side::Landlord,
        }
    }
}

/// Stake after an action: doubled by a bomb, quadrupled by a rocket.
pub fn next_multiplier(base: u32, action: &TurnAction) -> u32 {
    match action {
        TurnAction::Pass => base,
        TurnAction::Play { pattern, .. } => match pattern {
            CardPattern::Bomb => base.saturating_mul(2),
            CardPattern::Rocket => base.saturating_mul(4),
            _ => base,
        },
    }
}

/// A spring: the losing side made no successful play during the hand.
pub fn is_spring(losing_side_plays: u32) -> bool {
    losing_side_plays == 0
}

pub fn apply_spring(multiplier: u32, losing_side_plays: u32) -> u32 {
    if is_spring(losing_side_plays) {
        multiplier.saturating_mul(2)
    } else {
        multiplier
    }
}

/// Per-seat score movement for one settled hand. Each peasant moves by the
/// multiplier; the landlord carries the opposite sum.
pub fn settlement_deltas(
    mode: GameMode,
    landlord: PlayerId,
    winners: Side,
    multiplier: u32,
) -> BTreeMap<PlayerId, i32> {
    let stake = i32::try_from(multiplier).unwrap_or(i32::MAX);
    let peasants = i32::try_from(mode.player_count() - 1).unwrap_or(1);
    let sign = match winners {
        Side::Landlord => 1,
        Side::Peasants => -1,
    };

    mode.turn_order()
        .iter()
        .map(|&seat| {
            let delta = if seat == landlord {
                sign * stake.saturating_mul(peasants)
            } else {
                -sign * stake
            };
            (seat, delta)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{Side, apply_spring, next_multiplier, settlement_deltas};
    use crate::model::action::TurnAction;
    use crate::model::mode::GameMode;
    use crate::model::pattern::CardPattern;
    use crate::model::player::PlayerId;

    #[test]
    fn bombs_double_and_rockets_quadruple() {
        let bomb = TurnAction::play(Vec::new(), CardPattern::Bomb);
        let rocket = TurnAction::play(Vec::new(), CardPattern::Rocket);
        let pair = TurnAction::play(Vec::new(), CardPattern::Pair);
        assert_eq!(next_multiplier(3, &bomb), 6);
        assert_eq!(next_multiplier(3, &rocket), 12);
        assert_eq!(next_multiplier(3, &pair), 3);
        assert_eq!(next_multiplier(3, &TurnAction::Pass), 3);
    }

    #[test]
    fn spring_doubles_only_when_losers_never_played() {
        assert_eq!(apply_spring(2, 0), 4);
        assert_eq!(apply_spring(2, 1), 2);
    }

    #[test]
    fn landlord_win_collects_from_each_peasant() {
        let deltas = settlement_deltas(GameMode::ThreePlayer, PlayerId::LeftAi, Side::Landlord, 4);
        assert_eq!(deltas[&PlayerId::LeftAi], 8);
        assert_eq!(deltas[&PlayerId::Human], -4);
        assert_eq!(deltas[&PlayerId::RightAi], -4);
        assert_eq!(deltas.values().sum::<i32>(), 0);
    }

    #[test]
    fn peasant_win_in_four_player_mode() {
        let deltas = settlement_deltas(GameMode::FourPlayer, PlayerId::Human, Side::Peasants, 2);
        assert_eq!(deltas[&PlayerId::Human], -6);
        assert_eq!(deltas[&PlayerId::TopAi], 2);
        assert_eq!(deltas.len(), 4);
        assert_eq!(deltas.values().sum::<i32>(), 0);
    }

    #[test]
    fn side_lookup() {
        assert_eq!(Side::of(PlayerId::Human, PlayerId::Human), Side::Landlord);
        assert_eq!(Side::of(PlayerId::TopAi, PlayerId::Human), Side::Peasants);
        assert_eq!(Side::Landlord.opponent(), Side::Peasants);
    }
}
