#![deny(warnings)]

//! Deterministic self-play tournaments for the landlord bots.

pub mod analytics;
pub mod config;
pub mod logging;
pub mod tournament;
