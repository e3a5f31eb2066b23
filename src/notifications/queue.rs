//! Queue Store
//!
//! Holds notifications requested before a surface exists (pending) and the
//! ones currently eligible for rendering (active). Toasts use the FIFO
//! `ListQueue`; dialogs use the last-show-wins `SingleSlot`.

use std::collections::VecDeque;

/// Items that can be addressed by a key for removal
pub trait Keyed {
    type Key: PartialEq + Copy + std::fmt::Debug;

    fn key(&self) -> Self::Key;
}

/// Where an item ended up after `enqueue_or_show`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Active,
    Pending,
}

/// FIFO store for list-style notifications
#[derive(Debug)]
pub struct ListQueue<T: Keyed> {
    pending: VecDeque<T>,
    active: Vec<T>,
    max_pending: Option<usize>,
}

impl<T: Keyed> ListQueue<T> {
    /// Create an unbounded store
    pub fn new() -> Self {
        Self::with_max_pending(None)
    }

    /// Create a store whose pending buffer holds at most `max_pending` items
    pub fn with_max_pending(max_pending: Option<usize>) -> Self {
        Self {
            pending: VecDeque::new(),
            active: Vec::new(),
            max_pending,
        }
    }

    /// Append to the active list when mounted, to the pending buffer otherwise.
    ///
    /// A full pending buffer evicts its oldest item, which is returned.
    pub fn enqueue_or_show(&mut self, item: T, mounted: bool) -> (Placement, Option<T>) {
        if mounted {
            self.active.push(item);
            return (Placement::Active, None);
        }

        let evicted = match self.max_pending {
            Some(max) if self.pending.len() >= max => self.pending.pop_front(),
            _ => None,
        };
        self.pending.push_back(item);
        (Placement::Pending, evicted)
    }

    /// Remove the item with `key` from wherever it currently lives
    pub fn remove(&mut self, key: T::Key) -> Option<(T, Placement)> {
        if let Some(pos) = self.active.iter().position(|item| item.key() == key) {
            return Some((self.active.remove(pos), Placement::Active));
        }
        if let Some(pos) = self.pending.iter().position(|item| item.key() == key) {
            return self.pending.remove(pos).map(|item| (item, Placement::Pending));
        }
        None
    }

    /// Move every pending item, in order, to the end of the active list.
    ///
    /// Returns the number of items moved; they are the last entries of
    /// `active()`.
    pub fn drain_into_active(&mut self) -> usize {
        let drained = self.pending.len();
        self.active.extend(self.pending.drain(..));
        drained
    }

    /// Remove every active and pending item
    pub fn clear(&mut self) -> Vec<T> {
        let mut removed: Vec<T> = self.active.drain(..).collect();
        removed.extend(self.pending.drain(..));
        removed
    }

    pub fn active(&self) -> &[T] {
        &self.active
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn contains(&self, key: T::Key) -> bool {
        self.active.iter().chain(self.pending.iter()).any(|item| item.key() == key)
    }
}

impl<T: Keyed> Default for ListQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Single-item store where the latest item replaces the previous one
#[derive(Debug)]
pub struct SingleSlot<T: Keyed> {
    pending: Option<T>,
    active: Option<T>,
}

impl<T: Keyed> SingleSlot<T> {
    pub fn new() -> Self {
        Self {
            pending: None,
            active: None,
        }
    }

    /// Replace the active item when mounted, the pending one otherwise.
    /// Returns whatever was replaced.
    pub fn enqueue_or_show(&mut self, item: T, mounted: bool) -> (Placement, Option<T>) {
        if mounted {
            (Placement::Active, self.active.replace(item))
        } else {
            (Placement::Pending, self.pending.replace(item))
        }
    }

    /// Clear whichever slot holds `key`
    pub fn remove(&mut self, key: T::Key) -> Option<(T, Placement)> {
        if self.active.as_ref().is_some_and(|item| item.key() == key) {
            return self.active.take().map(|item| (item, Placement::Active));
        }
        if self.pending.as_ref().is_some_and(|item| item.key() == key) {
            return self.pending.take().map(|item| (item, Placement::Pending));
        }
        None
    }

    /// Promote the pending item, replacing any active one. Returns `true`
    /// when something was promoted.
    pub fn drain_into_active(&mut self) -> bool {
        match self.pending.take() {
            Some(item) => {
                self.active = Some(item);
                true
            }
            None => false,
        }
    }

    /// Empty both slots, returning the previously active item
    pub fn clear(&mut self) -> Option<T> {
        self.pending = None;
        self.active.take()
    }

    pub fn active(&self) -> Option<&T> {
        self.active.as_ref()
    }

    pub fn active_mut(&mut self) -> Option<&mut T> {
        self.active.as_mut()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl<T: Keyed> Default for SingleSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}
