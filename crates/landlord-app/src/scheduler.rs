use landlord_core::model::player::PlayerId;
use std::time::Duration;

/// A bot turn waiting for its thinking delay to elapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTurn {
    pub id: u64,
    pub epoch: u64,
    pub seat: PlayerId,
    pub due: Duration,
}

/// Delayed bot turns on a virtual clock.
///
/// Every turn carries the epoch it was scheduled in. `cancel_all` drops the
/// queue and bumps the epoch, so a turn captured before a restart can be
/// recognised as stale even if a caller still holds it.
#[derive(Debug, Default)]
pub struct TurnScheduler {
    now: Duration,
    epoch: u64,
    next_id: u64,
    queue: Vec<ScheduledTurn>,
}

impl TurnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, seat: PlayerId, delay: Duration) -> ScheduledTurn {
        self.next_id += 1;
        let turn = ScheduledTurn {
            id: self.next_id,
            epoch: self.epoch,
            seat,
            due: self.now + delay,
        };
        self.queue.push(turn);
        turn
    }

    /// Drops every pending turn. Returns how many were cancelled.
    pub fn cancel_all(&mut self) -> usize {
        self.epoch += 1;
        let cancelled = self.queue.len();
        self.queue.clear();
        cancelled
    }

    /// Moves the clock forward and hands back every turn now due, earliest
    /// first.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<ScheduledTurn> {
        self.now += elapsed;
        let now = self.now;
        let (mut due, waiting): (Vec<_>, Vec<_>) =
            self.queue.drain(..).partition(|turn| turn.due <= now);
        self.queue = waiting;
        due.sort_by_key(|turn| (turn.due, turn.id));
        due
    }

    pub fn pending(&self) -> &[ScheduledTurn] {
        &self.queue
    }

    /// Time until the earliest pending turn is due, if any.
    pub fn time_until_next(&self) -> Option<Duration> {
        self.queue
            .iter()
            .map(|turn| turn.due.saturating_sub(self.now))
            .min()
    }

    /// False once `cancel_all` has run since `turn` was scheduled.
    pub fn is_current(&self, turn: &ScheduledTurn) -> bool {
        turn.epoch == self.epoch
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn now(&self) -> Duration {
        self.now
    }
}
