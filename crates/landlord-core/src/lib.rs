#![deny(warnings)]
pub mod engine;
pub mod game;
pub mod model;
pub mod rules;

pub use game::event::{AudioCue, GameEvent};
pub use game::phase::GamePhase;
pub use game::session::{ActionError, Session, StartStages};
pub use game::snapshot::GameSnapshot;

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "landlord"
    }

    pub const fn codename() -> &'static str {
        "Dou Dizhu"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::AppInfo;

    #[test]
    fn exposes_static_metadata() {
        assert_eq!(AppInfo::name(), "landlord");
        assert_eq!(AppInfo::codename(), "Dou Dizhu");
        assert!(!AppInfo::version().is_empty());
    }
}
