//! Completion event fan-out — explicit publish/subscribe with a typed
//! payload.
//!
//! [`EventBus`] holds zero or more subscribers registered before an
//! invocation starts. When a text completion succeeds the orchestrator
//! emits one [`CompletionEvent`]; subscribers fire synchronously, in
//! registration order, all on the same event instance. A failed completion
//! emits nothing.
//!
//! Subscribers must be quick and must not depend on each other's side
//! effects — dependent network work belongs in the pipeline branches, not
//! in a subscriber closure.

// ---------------------------------------------------------------------------
// CompletionEvent
// ---------------------------------------------------------------------------

/// Notification that a text completion is ready.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionEvent {
    /// The completion text, exactly as extracted from the response.
    pub text: String,
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// A boxed subscriber callback.
pub type Subscriber = Box<dyn Fn(&CompletionEvent) + Send + Sync>;

/// Synchronous, registration-ordered event dispatch.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Subscriber>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber. Insertion order is dispatch order.
    pub fn subscribe(&mut self, f: impl Fn(&CompletionEvent) + Send + Sync + 'static) {
        self.subscribers.push(Box::new(f));
    }

    /// Number of registered subscribers.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Fire `event` at every subscriber, in registration order. Returns the
    /// number of subscribers notified.
    pub fn emit(&self, event: &CompletionEvent) -> usize {
        for sub in &self.subscribers {
            sub(event);
        }
        self.subscribers.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn emit_with_no_subscribers_is_a_no_op() {
        let bus = EventBus::new();
        let notified = bus.emit(&CompletionEvent { text: "x".into() });
        assert_eq!(notified, 0);
    }

    #[test]
    fn subscribers_fire_in_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();

        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            bus.subscribe(move |_| order.lock().unwrap().push(tag));
        }

        bus.emit(&CompletionEvent { text: "go".into() });
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn all_subscribers_see_the_same_payload() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();

        for _ in 0..3 {
            let seen = Arc::clone(&seen);
            bus.subscribe(move |e| seen.lock().unwrap().push(e.text.clone()));
        }

        bus.emit(&CompletionEvent { text: "the tower".into() });

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen.iter().all(|t| t == "the tower"));
    }

    #[test]
    fn emit_reports_subscriber_count() {
        let mut bus = EventBus::new();
        bus.subscribe(|_| {});
        bus.subscribe(|_| {});
        assert_eq!(bus.emit(&CompletionEvent { text: String::new() }), 2);
        assert_eq!(bus.len(), 2);
    }
}
