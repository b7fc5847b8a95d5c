// src/services/state_holder.rs
// DOCUMENTATION: Observable single-slot state container
// PURPOSE: Current value + change subscription for view-model state

use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;

/// Observable holder of one state value
/// DOCUMENTATION: Wraps a watch channel. All writes go through the sender,
/// which serializes them; the last completed write wins. Once closed, every
/// write is dropped so late task completions cannot revive a torn-down screen
pub struct StateHolder<T> {
    sender: watch::Sender<T>,
    live: AtomicBool,
}

impl<T: Clone> StateHolder<T> {
    pub fn new(initial: T) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender,
            live: AtomicBool::new(true),
        }
    }

    /// Clone of the current value
    pub fn get(&self) -> T {
        self.sender.borrow().clone()
    }

    /// Receiver that sees the current value and every later change
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.sender.subscribe()
    }

    /// Replace the value. Returns false if the holder is closed
    pub fn set(&self, value: T) -> bool {
        if !self.is_live() {
            return false;
        }
        self.sender.send_replace(value);
        true
    }

    /// Reduce the current value into a new one
    /// DOCUMENTATION: `reducer` returns None to leave the state untouched
    /// (no notification is sent). Returns whether a new value was published
    pub fn update<F>(&self, reducer: F) -> bool
    where
        F: FnOnce(&T) -> Option<T>,
    {
        if !self.is_live() {
            return false;
        }
        self.sender.send_if_modified(|state| match reducer(state) {
            Some(next) => {
                *state = next;
                true
            }
            None => false,
        })
    }

    /// Stop accepting writes
    pub fn close(&self) {
        self.live.store(false, Ordering::SeqCst);
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_publishes_only_changes() {
        let holder = StateHolder::new(1);
        let mut rx = holder.subscribe();

        assert!(!holder.update(|_| None));
        assert!(!rx.has_changed().unwrap());

        assert!(holder.update(|n| Some(n + 1)));
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), 2);
    }

    #[test]
    fn test_closed_holder_drops_writes() {
        let holder = StateHolder::new("open");
        holder.close();

        assert!(!holder.set("late"));
        assert!(!holder.update(|_| Some("later")));
        assert_eq!(holder.get(), "open");
        assert!(!holder.is_live());
    }

    #[tokio::test]
    async fn test_subscriber_sees_latest_value() {
        let holder = StateHolder::new(0);
        let mut rx = holder.subscribe();

        holder.set(1);
        holder.set(2);

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), 2);
    }
}
