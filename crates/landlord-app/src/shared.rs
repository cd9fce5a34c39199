use crate::controller::GameController;
use crate::observer::{ObserverId, ObserverRegistry};
use landlord_core::model::card::Card;
use landlord_core::model::player::PlayerId;
use landlord_core::{ActionError, GameEvent, GameSnapshot};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Cloneable handle for driving one controller from several threads.
/// Events are serialised by the lock, so each is fully applied before the
/// next one is looked at.
///
/// Snapshots are queued while the controller is locked and handed to
/// observers after the lock is released, in publication order. An observer
/// may dispatch through a clone of this handle; the snapshots that dispatch
/// produces are delivered once the current callback returns. Observers run
/// under the registry lock, so a callback must not call `subscribe` or
/// `unsubscribe`.
#[derive(Clone)]
pub struct SharedController {
    inner: Arc<Mutex<GameController>>,
    observers: Arc<Mutex<ObserverRegistry>>,
    outbox: Arc<Mutex<VecDeque<GameSnapshot>>>,
    delivering: Arc<AtomicBool>,
}

impl SharedController {
    pub fn new(mut controller: GameController) -> Self {
        let outbox = Arc::new(Mutex::new(VecDeque::new()));
        let queue = Arc::clone(&outbox);
        controller.subscribe(move |snapshot| queue.lock().push_back(snapshot.clone()));
        Self {
            inner: Arc::new(Mutex::new(controller)),
            observers: Arc::new(Mutex::new(ObserverRegistry::new())),
            outbox,
            delivering: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn dispatch(&self, event: GameEvent) -> Result<GameSnapshot, ActionError> {
        let result = self.inner.lock().dispatch(event);
        self.deliver();
        result
    }

    pub fn tick(&self, elapsed: Duration) -> usize {
        let applied = self.inner.lock().tick(elapsed);
        self.deliver();
        applied
    }

    pub fn request_hint(&self, seat: PlayerId) -> Result<Vec<Card>, ActionError> {
        let result = self.inner.lock().request_hint(seat);
        self.deliver();
        result
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.inner.lock().snapshot()
    }

    pub fn subscribe<F>(&self, observer: F) -> ObserverId
    where
        F: FnMut(&GameSnapshot) + Send + 'static,
    {
        self.observers.lock().subscribe(observer)
    }

    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        self.observers.lock().unsubscribe(id)
    }

    /// Runs `f` with exclusive access to the controller. Anything it
    /// publishes is delivered after `f` returns.
    pub fn with<T>(&self, f: impl FnOnce(&mut GameController) -> T) -> T {
        let value = {
            let mut guard = self.inner.lock();
            f(&mut guard)
        };
        self.deliver();
        value
    }

    /// Drains the outbox into the observers. Only one caller delivers at a
    /// time; a nested or concurrent call leaves its snapshots to the one
    /// already draining.
    fn deliver(&self) {
        loop {
            if self.delivering.swap(true, Ordering::AcqRel) {
                return;
            }
            loop {
                let next = self.outbox.lock().pop_front();
                let Some(snapshot) = next else { break };
                self.observers.lock().publish(&snapshot);
            }
            self.delivering.store(false, Ordering::Release);
            // A snapshot queued between the last pop and the release above
            // has nobody left to deliver it.
            if self.outbox.lock().is_empty() {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SharedController;
    use crate::config::TableConfig;
    use crate::controller::GameController;
    use landlord_core::model::mode::GameMode;
    use landlord_core::model::player::PlayerId;
    use landlord_core::{GameEvent, GamePhase};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn events_from_several_threads_apply_one_at_a_time() {
        let shared = SharedController::new(GameController::new(
            TableConfig::default().with_seed(21),
        ));
        shared
            .dispatch(GameEvent::Start {
                mode: GameMode::ThreePlayer,
            })
            .unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let handle = shared.clone();
                thread::spawn(move || {
                    handle
                        .dispatch(GameEvent::DecideLandlord {
                            player: PlayerId::LeftAi,
                        })
                        .is_ok()
                })
            })
            .collect();
        let accepted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(accepted, 1);
        let snapshot = shared.snapshot();
        assert_eq!(snapshot.landlord, Some(PlayerId::LeftAi));
        assert_eq!(shared.with(|c| c.pending_turns()), 1);
        assert!(shared.tick(Duration::from_millis(500)) >= 1);
        assert!(matches!(
            shared.snapshot().phase,
            GamePhase::Playing { .. } | GamePhase::Settled { .. }
        ));
    }

    #[test]
    fn observer_can_dispatch_through_the_handle() {
        let shared = SharedController::new(GameController::new(
            TableConfig::default().with_seed(22),
        ));
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let handle = shared.clone();
        shared.subscribe(move |snapshot| {
            sink.lock().push(snapshot.phase.name());
            if let GamePhase::Bidding {
                bidder: PlayerId::Human,
                ..
            } = snapshot.phase
            {
                handle
                    .dispatch(GameEvent::DecideLandlord {
                        player: PlayerId::Human,
                    })
                    .unwrap();
            }
        });

        shared
            .dispatch(GameEvent::Start {
                mode: GameMode::ThreePlayer,
            })
            .unwrap();

        assert_eq!(shared.snapshot().landlord, Some(PlayerId::Human));
        assert_eq!(
            seen.lock().as_slice(),
            &["shuffling", "dealing", "bidding", "playing"]
        );
    }

    #[test]
    fn unsubscribed_observers_stop_receiving() {
        let shared = SharedController::new(GameController::new(
            TableConfig::default().with_seed(23),
        ));
        let count = Arc::new(parking_lot::Mutex::new(0usize));
        let sink = Arc::clone(&count);
        let id = shared.subscribe(move |_| *sink.lock() += 1);
        shared
            .dispatch(GameEvent::Start {
                mode: GameMode::ThreePlayer,
            })
            .unwrap();
        assert_eq!(*count.lock(), 3);
        assert!(shared.unsubscribe(id));
        shared.dispatch(GameEvent::Finish).unwrap();
        assert_eq!(*count.lock(), 3);
    }
}
