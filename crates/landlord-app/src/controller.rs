use crate::config::TableConfig;
use crate::observer::{ObserverId, ObserverRegistry};
use crate::scheduler::{ScheduledTurn, TurnScheduler};
use landlord_bot::{BotDifficulty, HeuristicPolicy, Policy, PolicyContext, propose};
use landlord_core::model::action::TurnAction;
use landlord_core::model::card::Card;
use landlord_core::model::player::PlayerId;
use landlord_core::rules::classify;
use landlord_core::{ActionError, GameEvent, GamePhase, GameSnapshot, Session};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Single owner of the session. Every change, human or bot, goes through
/// [`GameController::dispatch`].
pub struct GameController {
    session: Session,
    config: TableConfig,
    policy: HeuristicPolicy,
    rng: Box<dyn RngCore + Send>,
    scheduler: TurnScheduler,
    observers: ObserverRegistry,
}

impl GameController {
    pub fn new(config: TableConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    pub fn with_rng<R>(config: TableConfig, rng: R) -> Self
    where
        R: RngCore + Send + 'static,
    {
        Self {
            session: Session::idle(config.mode),
            config,
            policy: HeuristicPolicy::new(config.difficulty),
            rng: Box::new(rng),
            scheduler: TurnScheduler::new(),
            observers: ObserverRegistry::new(),
        }
    }

    /// Applies one event. A rejected event leaves the session untouched and
    /// publishes nothing. An accepted one retires every pending bot turn,
    /// so only the seat that acts after this transition gets scheduled.
    pub fn dispatch(&mut self, event: GameEvent) -> Result<GameSnapshot, ActionError> {
        let stages = match self.session.apply(&event, &mut self.rng) {
            Ok(stages) => stages,
            Err(err) => {
                info!(
                    target: "landlord_app::controller",
                    event = event.name(),
                    phase = self.session.phase().name(),
                    error = %err,
                    "rejected event"
                );
                return Err(err);
            }
        };

        let cancelled = self.scheduler.cancel_all();
        if cancelled > 0 {
            debug!(
                target: "landlord_app::controller",
                event = event.name(),
                cancelled,
                "cancelled pending bot turns"
            );
        }

        for stage in stages {
            self.session = stage;
            debug!(
                target: "landlord_app::controller",
                event = event.name(),
                phase = self.session.phase().name(),
                multiplier = self.session.multiplier(),
                "accepted transition"
            );
            self.publish();
        }
        self.schedule_bot_turn();
        Ok(self.snapshot())
    }

    /// Advances the virtual clock by `elapsed`, running every bot turn that
    /// falls due, including turns scheduled by earlier bot moves inside the
    /// same window. Returns how many bot events were applied.
    pub fn tick(&mut self, elapsed: Duration) -> usize {
        let mut budget = elapsed;
        let mut applied = 0;
        loop {
            let step = match self.scheduler.time_until_next() {
                Some(wait) if wait <= budget => wait,
                _ => {
                    let _ = self.scheduler.advance(budget);
                    break;
                }
            };
            budget -= step;
            for turn in self.scheduler.advance(step) {
                if self.run_scheduled(turn) {
                    applied += 1;
                }
            }
        }
        applied
    }

    /// Runs bot turns until the human seat has to act or nothing is pending.
    pub fn run_until_human(&mut self) -> usize {
        let mut applied = 0;
        while let Some(wait) = self.scheduler.time_until_next() {
            applied += self.tick(wait);
        }
        applied
    }

    /// Stores the bot's suggestion for `seat` in the snapshot and returns it.
    pub fn request_hint(&mut self, seat: PlayerId) -> Result<Vec<Card>, ActionError> {
        let GamePhase::Playing { last_action, .. } = self.session.phase() else {
            return Err(ActionError::NotInPhase {
                event: "hint",
                phase: self.session.phase().name(),
            });
        };
        let player = self
            .session
            .player(seat)
            .ok_or(ActionError::UnknownSeat(seat))?;
        let ctx = PolicyContext {
            seat,
            mode: self.session.mode(),
            hand: &player.hand,
            standing: last_action.as_ref(),
        };
        let hint = self.policy.choose_hint(&ctx);
        self.session = self.session.with_hint(hint.clone());
        self.publish();
        Ok(hint)
    }

    /// The event the heuristic bot would submit for `seat` right now, if it
    /// is that seat's turn.
    pub fn proposed_event(&mut self, seat: PlayerId) -> Option<GameEvent> {
        propose(&mut self.policy, &self.session, seat)
    }

    /// The human seat's move when it is played on autopilot: the bot bid,
    /// or the hint when it is a legal play, otherwise a pass.
    pub fn autopilot_event(&mut self) -> Option<GameEvent> {
        let seat = PlayerId::Human;
        if !matches!(self.session.phase(), GamePhase::Playing { .. }) {
            return self.proposed_event(seat);
        }
        if self.session.phase().actor() != Some(seat) {
            return None;
        }
        let hint = self.request_hint(seat).ok()?;
        let classification = classify(&hint);
        let standing = self
            .session
            .standing_action()
            .map(|action| classify(action.cards()));
        let legal = match standing {
            Some(standing) => classification.beats(&standing),
            None => classification.is_valid(),
        };
        let action = if legal {
            TurnAction::play(hint, classification.pattern)
        } else {
            TurnAction::Pass
        };
        Some(GameEvent::PlayCards {
            player: seat,
            action,
        })
    }

    pub fn subscribe<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut(&GameSnapshot) + Send + 'static,
    {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.session.snapshot()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn set_difficulty(&mut self, difficulty: BotDifficulty) {
        self.config.difficulty = difficulty;
        self.policy.set_difficulty(difficulty);
    }

    pub fn difficulty(&self) -> BotDifficulty {
        self.policy.difficulty()
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn pending_turns(&self) -> usize {
        self.scheduler.pending().len()
    }

    fn publish(&mut self) {
        let snapshot = self.session.snapshot();
        self.observers.publish(&snapshot);
    }

    fn schedule_bot_turn(&mut self) {
        if let Some(seat) = self.session.phase().actor() {
            if !seat.is_human() {
                self.scheduler.schedule(seat, self.config.ai_delay);
            }
        }
    }

    fn run_scheduled(&mut self, turn: ScheduledTurn) -> bool {
        if !self.scheduler.is_current(&turn) {
            debug!(target: "landlord_app::controller", turn = turn.id, "dropping stale bot turn");
            return false;
        }
        let Some(event) = self.proposed_event(turn.seat) else {
            debug!(
                target: "landlord_app::controller",
                seat = %turn.seat,
                "bot turn no longer applies"
            );
            return false;
        };
        match self.dispatch(event) {
            Ok(_) => true,
            Err(err) => {
                warn!(
                    target: "landlord_app::controller",
                    seat = %turn.seat,
                    error = %err,
                    "bot proposed a rejected event"
                );
                false
            }
        }
    }
}

impl std::fmt::Debug for GameController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameController")
            .field("phase", self.session.phase())
            .field("config", &self.config)
            .field("pending_turns", &self.scheduler.pending().len())
            .finish()
    }
}
