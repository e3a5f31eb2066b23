//! Display Surface and Controller Traits
//!
//! Seams between the managers and whatever renders their state.

/// A component that renders notification state.
///
/// Exactly one surface is registered with a manager at a time. The manager
/// calls `render` with a fresh snapshot after every change; the surface must
/// treat it as read-only and call back into the manager for any change.
pub trait DisplaySurface<S: ?Sized>: Send + Sync {
    /// Render the latest state
    fn render(&self, state: &S);
}

impl<S, F> DisplaySurface<S> for F
where
    S: ?Sized,
    F: Fn(&S) + Send + Sync,
{
    fn render(&self, state: &S) {
        self(state)
    }
}

/// Capability handed to a parent so it can command a child's open state
/// without owning it.
pub trait ModalController: Send + Sync {
    /// Present the modal
    fn open(&self);

    /// Close the modal
    fn close(&self);

    /// Whether the modal is currently presented
    fn is_open(&self) -> bool;
}

/// Counters describing what a manager has done since creation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryStats {
    /// Notifications accepted by `show`
    pub shown: u64,

    /// Notifications buffered because no surface was registered
    pub buffered: u64,

    /// Buffered notifications moved to the active state on `register`
    pub drained: u64,

    /// Notifications removed by `hide` or a dismiss handle
    pub dismissed: u64,

    /// Notifications removed by their auto-dismiss timer
    pub auto_dismissed: u64,

    /// Snapshots delivered to a surface
    pub deliveries: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use parking_lot::Mutex;

    #[test]
    fn test_closure_is_a_surface() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let surface: Arc<dyn DisplaySurface<[u32]>> =
            Arc::new(move |items: &[u32]| sink.lock().push(items.len()));

        surface.render(&[1, 2, 3]);
        surface.render(&[]);

        assert_eq!(*seen.lock(), vec![3, 0]);
    }

    #[test]
    fn test_stats_default_is_zeroed() {
        let stats = DeliveryStats::default();
        assert_eq!(stats.shown, 0);
        assert_eq!(stats.deliveries, 0);
    }
}
