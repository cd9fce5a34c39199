#![deny(warnings)]
pub mod config;
pub mod controller;
pub mod observer;
pub mod scheduler;
pub mod shared;

pub use config::TableConfig;
pub use controller::GameController;
pub use observer::{ObserverId, ObserverRegistry};
pub use scheduler::{ScheduledTurn, TurnScheduler};
pub use shared::SharedController;
