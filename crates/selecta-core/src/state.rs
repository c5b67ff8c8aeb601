//! State management for Selecta applications.
//!
//! Authoritative state lives in a [`Store`] and only changes through
//! messages. Widgets never own it; they emit messages, the owner dispatches
//! them and pushes the new state back down.
//!
//! # Examples
//!
//! ```
//! use selecta_core::{State, Store};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Default, Serialize, Deserialize)]
//! struct Nickname {
//!     text: String,
//! }
//!
//! impl State for Nickname {
//!     type Message = String;
//!
//!     fn update(&mut self, msg: String) {
//!         self.text = msg;
//!     }
//! }
//!
//! let mut store = Store::new(Nickname::default());
//! store.dispatch("bob".to_string());
//! assert_eq!(store.state().text, "bob");
//! ```

use serde::{Deserialize, Serialize};

/// Application state trait.
pub trait State: Clone + Serialize + for<'de> Deserialize<'de> + Send + Sync {
    /// Message type for state updates
    type Message: Send;

    /// Update state in response to a message.
    fn update(&mut self, msg: Self::Message);
}

/// Type alias for state change subscribers.
type Subscriber<S> = Box<dyn Fn(&S) + Send + Sync>;

/// Store owns a state value and notifies subscribers after every update.
pub struct Store<S: State> {
    state: S,
    subscribers: Vec<Subscriber<S>>,
}

impl<S: State> Store<S> {
    /// Create a new store with initial state.
    pub fn new(initial: S) -> Self {
        Self {
            state: initial,
            subscribers: Vec::new(),
        }
    }

    /// Get current state.
    pub const fn state(&self) -> &S {
        &self.state
    }

    /// Apply a message and notify subscribers.
    pub fn dispatch(&mut self, msg: S::Message) {
        self.state.update(msg);
        self.notify_subscribers();
    }

    /// Replace the whole state (e.g. form reset) and notify subscribers.
    pub fn replace(&mut self, state: S) {
        self.state = state;
        self.notify_subscribers();
    }

    /// Subscribe to state changes.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        self.subscribers.push(Box::new(callback));
    }

    fn notify_subscribers(&self) {
        for subscriber in &self.subscribers {
            subscriber(&self.state);
        }
    }
}

impl<S: State + std::fmt::Debug> std::fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("subscriber_count", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    struct Tally {
        count: i32,
    }

    enum TallyMessage {
        Add(i32),
        Reset,
    }

    impl State for Tally {
        type Message = TallyMessage;

        fn update(&mut self, msg: TallyMessage) {
            match msg {
                TallyMessage::Add(n) => self.count += n,
                TallyMessage::Reset => self.count = 0,
            }
        }
    }

    #[test]
    fn test_store_dispatch_updates_state() {
        let mut store = Store::new(Tally::default());
        store.dispatch(TallyMessage::Add(5));
        assert_eq!(store.state().count, 5);
        store.dispatch(TallyMessage::Reset);
        assert_eq!(store.state().count, 0);
    }

    #[test]
    fn test_store_notifies_once_per_change() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);

        let mut store = Store::new(Tally::default());
        store.subscribe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        store.dispatch(TallyMessage::Add(1));
        store.replace(Tally { count: 9 });

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(store.state().count, 9);
    }

    #[test]
    fn test_subscribers_see_updated_state() {
        let counts = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&counts);

        let mut store = Store::new(Tally::default());
        store.subscribe(move |s: &Tally| sink.lock().unwrap().push(s.count));
        store.dispatch(TallyMessage::Add(2));
        store.dispatch(TallyMessage::Add(3));

        assert_eq!(*counts.lock().unwrap(), vec![2, 5]);
    }
}
