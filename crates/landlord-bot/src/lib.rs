pub mod bot;
pub mod policy;

pub use bot::{BotDifficulty, bid_strength, choose_bid, choose_hint, choose_play, play_candidates};
pub use policy::{HeuristicPolicy, Policy, PolicyContext, propose};
