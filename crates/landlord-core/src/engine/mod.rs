pub mod deal;
pub mod scoring;

pub use deal::{Deal, award_bottom, deal, is_win};
pub use scoring::{Side, apply_spring, is_spring, next_multiplier, settlement_deltas};
