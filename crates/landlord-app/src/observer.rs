use landlord_core::GameSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

type Callback = Box<dyn FnMut(&GameSnapshot) + Send>;

/// Snapshot subscribers, notified in subscription order.
#[derive(Default)]
pub struct ObserverRegistry {
    next_id: u64,
    observers: Vec<(ObserverId, Callback)>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut(&GameSnapshot) + Send + 'static,
    {
        self.next_id += 1;
        let id = ObserverId(self.next_id);
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub fn publish(&mut self, snapshot: &GameSnapshot) {
        for (_, observer) in self.observers.iter_mut() {
            observer(snapshot);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::ObserverRegistry;
    use landlord_core::Session;
    use landlord_core::model::mode::GameMode;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn publish_reaches_current_subscribers_only() {
        let mut registry = ObserverRegistry::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&first);
        let first_id = registry.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let counter = Arc::clone(&second);
        registry.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let snapshot = Session::idle(GameMode::ThreePlayer).snapshot();
        registry.publish(&snapshot);
        assert!(registry.unsubscribe(first_id));
        assert!(!registry.unsubscribe(first_id));
        registry.publish(&snapshot);

        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 2);
        assert_eq!(registry.len(), 1);
    }
}
