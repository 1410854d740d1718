#![forbid(unsafe_code)]

//! Observer registry for synchronous change notification.
//!
//! [`Observers`] holds callbacks keyed by [`SubId`]. `notify` calls every
//! callback in subscription order and returns only after the last one has
//! run, so a mutation that notifies before returning is fully observed by
//! the time its caller continues.
//!
//! The registry is single-threaded by construction (callbacks are not
//! `Send`). Producers on other threads go through
//! [`Mailbox`](crate::mailbox::Mailbox) instead.

use std::fmt;

/// A unique identifier for a subscription.
pub type SubId = u64;

type Callback<T> = Box<dyn FnMut(&T)>;

/// Ordered set of observers for values of type `T`.
pub struct Observers<T> {
    next_id: SubId,
    entries: Vec<(SubId, Callback<T>)>,
}

impl<T> fmt::Debug for Observers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.entries.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl<T> Default for Observers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Observers<T> {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            next_id: 1,
            entries: Vec::new(),
        }
    }

    /// Register `callback` and return its id.
    pub fn subscribe(&mut self, callback: impl FnMut(&T) + 'static) -> SubId {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, Box::new(callback)));
        id
    }

    /// Remove the observer with `id`. Returns `true` if it was registered.
    pub fn unsubscribe(&mut self, id: SubId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() < before
    }

    /// Call every observer with `value`, in subscription order.
    pub fn notify(&mut self, value: &T) {
        for (_, callback) in &mut self.entries {
            callback(value);
        }
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no observers are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
