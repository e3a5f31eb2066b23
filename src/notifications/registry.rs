//! Subscriber Registry
//!
//! Holds the at-most-one display surface of a manager. Registering a new
//! surface replaces the old one; there is no fan-out.
//!
//! Snapshots are handed to the surface after the owner's lock is released.
//! Each one is stamped with a version under that lock, and a `DeliveryGate`
//! renders them one at a time, dropping any that a newer one overtook.

use std::cell::Cell;
use std::sync::Arc;
use log::{debug, trace};
use parking_lot::ReentrantMutex;

use crate::notifications::traits::DisplaySurface;

/// Slot for a single display surface
pub struct SubscriberRegistry<S: ?Sized> {
    name: &'static str,
    surface: Option<Arc<dyn DisplaySurface<S>>>,
    issued: u64,
}

impl<S: ?Sized> SubscriberRegistry<S> {
    /// Create an empty registry. `name` only appears in log output.
    pub fn new(name: &'static str) -> Self {
        Self { name, surface: None, issued: 0 }
    }

    /// Store `surface`, returning `true` when an earlier one was replaced
    pub fn register(&mut self, surface: Arc<dyn DisplaySurface<S>>) -> bool {
        let replaced = self.surface.replace(surface).is_some();
        if replaced {
            debug!("{} surface replaced", self.name);
        } else {
            debug!("{} surface registered", self.name);
        }
        replaced
    }

    /// Drop the current surface. Returns `false` when nothing was registered.
    pub fn unregister(&mut self) -> bool {
        match self.surface.take() {
            Some(_) => {
                debug!("{} surface unregistered", self.name);
                true
            }
            None => {
                debug!("{} surface already unregistered", self.name);
                false
            }
        }
    }

    /// Whether a surface is registered
    pub fn is_registered(&self) -> bool {
        self.surface.is_some()
    }

    /// Clone of the current surface, for delivery outside the owner's lock
    pub fn current(&self) -> Option<Arc<dyn DisplaySurface<S>>> {
        self.surface.clone()
    }

    /// Version for a snapshot taken now. Call under the owner's lock.
    pub fn stamp(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }
}

/// Serializes renders to a surface in version order.
///
/// Reentrant: a surface may call back into its manager from `render`, and
/// the nested delivery goes through on the same thread.
#[derive(Default)]
pub struct DeliveryGate {
    delivered: ReentrantMutex<Cell<u64>>,
}

impl DeliveryGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `render` for the snapshot stamped `version`, unless a newer
    /// snapshot already reached the surface. Returns whether it ran.
    pub fn deliver(&self, version: u64, render: impl FnOnce()) -> bool {
        let delivered = self.delivered.lock();
        if version < delivered.get() {
            trace!("Skipping snapshot v{}, v{} already delivered", version, delivered.get());
            return false;
        }
        delivered.set(version);
        render();
        true
    }
}
