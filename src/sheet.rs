//! Bottom sheet controller
//!
//! Open/closed state owned by the controller and observed by one surface.
//! Parents hold the controller (or a `dyn ModalController`) to command the
//! sheet without reaching into the surface.

use std::sync::Arc;
use log::debug;
use parking_lot::Mutex;

use crate::notifications::registry::{DeliveryGate, SubscriberRegistry};
use crate::notifications::traits::{DisplaySurface, ModalController};

struct SheetState {
    open: bool,
    registry: SubscriberRegistry<bool>,
}

struct SheetShared {
    state: Mutex<SheetState>,
    gate: DeliveryGate,
}

/// Shared open/closed state of a sheet
#[derive(Clone)]
pub struct SheetController {
    shared: Arc<SheetShared>,
}

impl Default for SheetController {
    fn default() -> Self {
        Self::new()
    }
}

impl SheetController {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(SheetShared {
                state: Mutex::new(SheetState {
                    open: false,
                    registry: SubscriberRegistry::new("Sheet"),
                }),
                gate: DeliveryGate::new(),
            }),
        }
    }

    /// Register the surface; it immediately receives the current state
    pub fn register(&self, surface: Arc<dyn DisplaySurface<bool>>) {
        let (open, version) = {
            let mut state = self.shared.state.lock();
            state.registry.register(Arc::clone(&surface));
            (state.open, state.registry.stamp())
        };
        self.shared.gate.deliver(version, || surface.render(&open));
    }

    pub fn unregister(&self) {
        self.shared.state.lock().registry.unregister();
    }

    fn set_open(&self, open: bool) {
        let (surface, version) = {
            let mut state = self.shared.state.lock();
            if state.open == open {
                return;
            }
            state.open = open;
            (state.registry.current(), state.registry.stamp())
        };

        debug!("Sheet {}", if open { "opened" } else { "closed" });
        if let Some(surface) = surface {
            self.shared.gate.deliver(version, || surface.render(&open));
        }
    }

    /// Flip the current state
    pub fn toggle(&self) {
        let open = self.shared.state.lock().open;
        self.set_open(!open);
    }
}

impl ModalController for SheetController {
    fn open(&self) {
        self.set_open(true);
    }

    fn close(&self) {
        self.set_open(false);
    }

    fn is_open(&self) -> bool {
        self.shared.state.lock().open
    }
}
