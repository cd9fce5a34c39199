use landlord_bot::BotDifficulty;
use landlord_core::model::mode::GameMode;
use std::time::Duration;
use tracing::warn;

const DEFAULT_AI_DELAY_MS: u64 = 500;

/// Table settings, read from `LANDLORD_*` environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    pub mode: GameMode,
    pub difficulty: BotDifficulty,
    pub ai_delay: Duration,
    pub seed: Option<u64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::ThreePlayer,
            difficulty: BotDifficulty::Casual,
            ai_delay: Duration::from_millis(DEFAULT_AI_DELAY_MS),
            seed: None,
        }
    }
}

impl TableConfig {
    pub fn from_env() -> Self {
        Self::from_reader(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Unparseable values
    /// keep the default and are reported once at WARN.
    pub fn from_reader<F>(mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = read("LANDLORD_MODE") {
            match raw.parse::<GameMode>() {
                Ok(mode) => config.mode = mode,
                Err(_) => warn!(value = %raw, "ignoring LANDLORD_MODE"),
            }
        }

        if let Some(raw) = read("LANDLORD_BOT_DIFFICULTY") {
            match BotDifficulty::parse(&raw) {
                Some(difficulty) => config.difficulty = difficulty,
                None => warn!(value = %raw, "ignoring LANDLORD_BOT_DIFFICULTY"),
            }
        }

        if let Some(raw) = read("LANDLORD_AI_DELAY_MS") {
            match raw.trim().parse::<u64>() {
                Ok(ms) => config.ai_delay = Duration::from_millis(ms),
                Err(_) => warn!(value = %raw, "ignoring LANDLORD_AI_DELAY_MS"),
            }
        }

        if let Some(raw) = read("LANDLORD_SEED") {
            match raw.trim().parse::<u64>() {
                Ok(seed) => config.seed = Some(seed),
                Err(_) => warn!(value = %raw, "ignoring LANDLORD_SEED"),
            }
        }

        config
    }

    pub fn with_mode(mut self, mode: GameMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_difficulty(mut self, difficulty: BotDifficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_ai_delay(mut self, delay: Duration) -> Self {
        self.ai_delay = delay;
        self
    }
}
