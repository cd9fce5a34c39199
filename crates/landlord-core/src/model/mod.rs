pub mod action;
pub mod card;
pub mod deck;
pub mod hand;
pub mod mode;
pub mod pattern;
pub mod player;
pub mod rank;
pub mod suit;
