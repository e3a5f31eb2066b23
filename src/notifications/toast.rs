//! Toast Manager
//!
//! Transient notifications shown as a FIFO list. Toasts requested before a
//! surface registers are buffered and delivered together, in order, when it
//! does. Every active toast owns an auto-dismiss timer that is cancelled if
//! the toast is removed first.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Weak};
use std::time::Duration;
use log::{debug, trace, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::icons::Icon;
use crate::notifications::config::NotificationConfig;
use crate::notifications::error::{NotificationError, NotificationResult};
use crate::notifications::id::NotificationId;
use crate::notifications::queue::{Keyed, ListQueue, Placement};
use crate::notifications::registry::{DeliveryGate, SubscriberRegistry};
use crate::notifications::traits::{DeliveryStats, DisplaySurface};
use crate::timer::{TimerDriver, TimerHandle};

/// Display intent of a toast. Kinds only differ in presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Info,
    Error,
}

impl ToastKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Info => "info",
            ToastKind::Error => "error",
        }
    }

    pub fn icon(&self) -> Icon {
        match self {
            ToastKind::Success => Icon::Success,
            ToastKind::Info => Icon::Info,
            ToastKind::Error => Icon::Error,
        }
    }
}

impl FromStr for ToastKind {
    type Err = NotificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "success" => Ok(ToastKind::Success),
            "info" => Ok(ToastKind::Info),
            "error" => Ok(ToastKind::Error),
            _ => Err(NotificationError::invalid_kind(s)),
        }
    }
}

impl fmt::Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a caller asks to show
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastRequest {
    pub kind: ToastKind,
    pub title: String,
    /// Overrides the manager's default auto-dismiss delay
    pub timeout: Option<Duration>,
}

impl ToastRequest {
    pub fn new(kind: ToastKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            timeout: None,
        }
    }

    pub fn success(title: impl Into<String>) -> Self {
        Self::new(ToastKind::Success, title)
    }

    pub fn info(title: impl Into<String>) -> Self {
        Self::new(ToastKind::Info, title)
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(ToastKind::Error, title)
    }

    /// Build a request from an untyped kind name
    pub fn parse(kind: &str, title: impl Into<String>) -> NotificationResult<Self> {
        Ok(Self::new(kind.parse()?, title))
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn into_toast(self, default_timeout: Duration) -> NotificationResult<Toast> {
        if self.title.trim().is_empty() {
            return Err(NotificationError::MissingTitle);
        }

        Ok(Toast {
            id: NotificationId::next(),
            kind: self.kind,
            title: self.title,
            timeout: self.timeout.unwrap_or(default_timeout),
        })
    }
}

/// A toast accepted by the manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    id: NotificationId,
    kind: ToastKind,
    title: String,
    timeout: Duration,
}

impl Toast {
    pub fn id(&self) -> NotificationId {
        self.id
    }

    pub fn kind(&self) -> ToastKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Resolved auto-dismiss delay
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Keyed for Toast {
    type Key = NotificationId;

    fn key(&self) -> NotificationId {
        self.id
    }
}

#[derive(Debug, Clone, Copy)]
enum Removal {
    Dismissed,
    Expired,
}

struct ToastState {
    queue: ListQueue<Toast>,
    registry: SubscriberRegistry<[Toast]>,
    timers: HashMap<NotificationId, TimerHandle>,
    stats: DeliveryStats,
}

struct ToastShared {
    state: Mutex<ToastState>,
    gate: DeliveryGate,
    timer: Arc<dyn TimerDriver>,
    config: NotificationConfig,
}

/// Snapshot waiting to be handed to the surface once the lock is released
struct Delivery {
    surface: Arc<dyn DisplaySurface<[Toast]>>,
    snapshot: Vec<Toast>,
    version: u64,
}

impl Delivery {
    fn send(self, gate: &DeliveryGate) {
        gate.deliver(self.version, || {
            trace!("Delivering {} toast(s) to surface (v{})", self.snapshot.len(), self.version);
            self.surface.render(&self.snapshot);
        });
    }
}

impl ToastShared {
    fn prepare_delivery(state: &mut ToastState) -> Option<Delivery> {
        let surface = state.registry.current()?;
        state.stats.deliveries += 1;
        Some(Delivery {
            surface,
            snapshot: state.queue.active().to_vec(),
            version: state.registry.stamp(),
        })
    }

    fn start_timer(self: &Arc<Self>, state: &mut ToastState, id: NotificationId, timeout: Duration) {
        let weak = Arc::downgrade(self);
        let handle = self.timer.schedule(
            timeout,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.remove(id, Removal::Expired);
                }
            }),
        );
        state.timers.insert(id, handle);
    }

    fn remove(&self, id: NotificationId, reason: Removal) -> bool {
        let delivery = {
            let mut state = self.state.lock();
            let Some((toast, placement)) = state.queue.remove(id) else {
                debug!("Toast {} not present, nothing to hide", id);
                return false;
            };

            if let Some(handle) = state.timers.remove(&id) {
                handle.cancel();
            }

            match reason {
                Removal::Dismissed => state.stats.dismissed += 1,
                Removal::Expired => state.stats.auto_dismissed += 1,
            }
            debug!("Toast {} '{}' removed ({:?})", id, toast.title(), reason);

            match placement {
                Placement::Active => Self::prepare_delivery(&mut state),
                Placement::Pending => None,
            }
        };

        if let Some(delivery) = delivery {
            delivery.send(&self.gate);
        }
        true
    }
}

impl Drop for ToastShared {
    fn drop(&mut self) {
        for handle in self.state.get_mut().timers.values() {
            handle.cancel();
        }
    }
}

/// Handle returned by `show`, bound to a single toast
#[derive(Clone)]
pub struct DismissHandle {
    id: NotificationId,
    shared: Weak<ToastShared>,
}

impl DismissHandle {
    pub fn id(&self) -> NotificationId {
        self.id
    }

    /// Hide the toast this handle was issued for. Returns `false` if it was
    /// already gone or the manager no longer exists.
    pub fn dismiss(&self) -> bool {
        match self.shared.upgrade() {
            Some(shared) => shared.remove(self.id, Removal::Dismissed),
            None => false,
        }
    }
}

impl fmt::Debug for DismissHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DismissHandle").field("id", &self.id).finish()
    }
}

/// Manager for the toast list
///
/// Cloning yields another handle to the same state.
#[derive(Clone)]
pub struct ToastManager {
    shared: Arc<ToastShared>,
}

impl ToastManager {
    /// Create a manager with default configuration
    pub fn new(timer: Arc<dyn TimerDriver>) -> Self {
        Self::with_config(NotificationConfig::default(), timer)
    }

    /// Create a manager with custom configuration
    pub fn with_config(config: NotificationConfig, timer: Arc<dyn TimerDriver>) -> Self {
        let state = ToastState {
            queue: ListQueue::with_max_pending(config.max_pending),
            registry: SubscriberRegistry::new("Toast"),
            timers: HashMap::new(),
            stats: DeliveryStats::default(),
        };

        Self {
            shared: Arc::new(ToastShared {
                state: Mutex::new(state),
                gate: DeliveryGate::new(),
                timer,
                config,
            }),
        }
    }

    /// Show a toast, or buffer it until a surface registers.
    ///
    /// Fails only when the request has a blank title.
    pub fn show(&self, request: ToastRequest) -> NotificationResult<DismissHandle> {
        let toast = request.into_toast(self.shared.config.toast_timeout)?;
        let id = toast.id();
        let timeout = toast.timeout();
        debug!("Showing {} toast {} '{}'", toast.kind(), id, toast.title());

        let (delivery, evicted) = {
            let mut state = self.shared.state.lock();
            state.stats.shown += 1;

            let mounted = state.registry.is_registered();
            let (placement, evicted) = state.queue.enqueue_or_show(toast, mounted);
            match placement {
                Placement::Active => {
                    self.shared.start_timer(&mut state, id, timeout);
                    (ToastShared::prepare_delivery(&mut state), evicted)
                }
                Placement::Pending => {
                    state.stats.buffered += 1;
                    debug!("No toast surface registered, buffered {}", id);
                    (None, evicted)
                }
            }
        };

        if let Some(evicted) = evicted {
            warn!(
                "Pending toast buffer full, dropped oldest toast {} '{}'",
                evicted.id(),
                evicted.title()
            );
        }
        if let Some(delivery) = delivery {
            delivery.send(&self.shared.gate);
        }

        Ok(DismissHandle {
            id,
            shared: Arc::downgrade(&self.shared),
        })
    }

    pub fn success(&self, title: impl Into<String>) -> NotificationResult<DismissHandle> {
        self.show(ToastRequest::success(title))
    }

    pub fn info(&self, title: impl Into<String>) -> NotificationResult<DismissHandle> {
        self.show(ToastRequest::info(title))
    }

    pub fn error(&self, title: impl Into<String>) -> NotificationResult<DismissHandle> {
        self.show(ToastRequest::error(title))
    }

    /// Remove a toast. Unknown ids are ignored; returns whether one was removed.
    pub fn hide(&self, id: NotificationId) -> bool {
        self.shared.remove(id, Removal::Dismissed)
    }

    /// Remove every active and buffered toast
    pub fn clear(&self) {
        let delivery = {
            let mut state = self.shared.state.lock();
            let removed = state.queue.clear();
            if removed.is_empty() {
                return;
            }

            for handle in state.timers.drain().map(|(_, handle)| handle) {
                handle.cancel();
            }
            state.stats.dismissed += removed.len() as u64;
            debug!("Cleared {} toast(s)", removed.len());
            ToastShared::prepare_delivery(&mut state)
        };

        if let Some(delivery) = delivery {
            delivery.send(&self.shared.gate);
        }
    }

    /// Register the display surface, replacing any previous one.
    ///
    /// Buffered toasts move to the active list and the surface receives the
    /// resulting list once. A surface registering while toasts are still
    /// active from an earlier mount receives that list instead.
    ///
    /// Renders are serialized: a snapshot overtaken by a newer one is not
    /// delivered, so the surface always ends on the latest list.
    ///
    /// The manager keeps the surface alive. A surface that captures a clone
    /// of this manager forms a reference cycle, so the manager and its
    /// pending timers live until `unregister` is called.
    pub fn register(&self, surface: Arc<dyn DisplaySurface<[Toast]>>) {
        let delivery = {
            let mut state = self.shared.state.lock();
            state.registry.register(surface);

            let drained = state.queue.drain_into_active();
            if drained > 0 {
                state.stats.drained += drained as u64;
                let active = state.queue.active();
                let fresh: Vec<(NotificationId, Duration)> = active[active.len() - drained..]
                    .iter()
                    .map(|toast| (toast.id(), toast.timeout()))
                    .collect();
                for (id, timeout) in fresh {
                    self.shared.start_timer(&mut state, id, timeout);
                }
                debug!("Drained {} buffered toast(s) into the active list", drained);
            }

            if state.queue.active().is_empty() {
                None
            } else {
                ToastShared::prepare_delivery(&mut state)
            }
        };

        if let Some(delivery) = delivery {
            delivery.send(&self.shared.gate);
        }
    }

    /// Register a closure as the display surface
    pub fn register_fn<F>(&self, surface: F)
    where
        F: Fn(&[Toast]) + Send + Sync + 'static,
    {
        self.register(Arc::new(surface));
    }

    /// Drop the display surface. Later toasts are buffered. Safe to repeat.
    pub fn unregister(&self) {
        self.shared.state.lock().registry.unregister();
    }

    /// Snapshot of the active list
    pub fn active(&self) -> Vec<Toast> {
        self.shared.state.lock().queue.active().to_vec()
    }

    pub fn pending_count(&self) -> usize {
        self.shared.state.lock().queue.pending_len()
    }

    pub fn is_mounted(&self) -> bool {
        self.shared.state.lock().registry.is_registered()
    }

    pub fn stats(&self) -> DeliveryStats {
        self.shared.state.lock().stats.clone()
    }

    pub fn config(&self) -> &NotificationConfig {
        &self.shared.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::ManualTimer;

    type Frames = Arc<Mutex<Vec<Vec<String>>>>;

    fn setup() -> (ToastManager, ManualTimer) {
        let timer = ManualTimer::new();
        (ToastManager::new(Arc::new(timer.clone())), timer)
    }

    fn recorder(manager: &ToastManager) -> Frames {
        let frames: Frames = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&frames);
        manager.register_fn(move |toasts: &[Toast]| {
            sink.lock().push(toasts.iter().map(|t| t.title().to_string()).collect());
        });
        frames
    }

    fn titles(manager: &ToastManager) -> Vec<String> {
        manager.active().iter().map(|t| t.title().to_string()).collect()
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("success".parse::<ToastKind>().unwrap(), ToastKind::Success);
        assert_eq!("INFO".parse::<ToastKind>().unwrap(), ToastKind::Info);
        assert_eq!("Error".parse::<ToastKind>().unwrap(), ToastKind::Error);
        assert_eq!(
            "warning".parse::<ToastKind>(),
            Err(NotificationError::InvalidKind("warning".to_string()))
        );
        assert_eq!(ToastKind::Error.icon(), Icon::Error);
    }

    #[test]
    fn test_blank_title_is_rejected() {
        let (manager, _timer) = setup();
        assert_eq!(manager.info("   ").unwrap_err(), NotificationError::MissingTitle);
        assert_eq!(manager.stats().shown, 0);
    }

    #[test]
    fn test_show_while_mounted_delivers_immediately() {
        let (manager, _timer) = setup();
        let frames = recorder(&manager);
        assert!(frames.lock().is_empty());

        manager.success("Saved").unwrap();
        manager.info("Synced").unwrap();

        assert_eq!(
            *frames.lock(),
            vec![vec!["Saved".to_string()], vec!["Saved".to_string(), "Synced".to_string()]]
        );
    }

    #[test]
    fn test_dismiss_handle_removes_only_its_toast() {
        let (manager, _timer) = setup();
        let _frames = recorder(&manager);

        let first = manager.info("first").unwrap();
        let second = manager.info("second").unwrap();

        assert!(second.dismiss());
        assert!(!second.dismiss());
        assert_eq!(titles(&manager), vec!["first"]);
        assert_eq!(manager.active()[0].id(), first.id());
    }

    #[test]
    fn test_auto_dismiss_uses_default_and_override() {
        let (manager, timer) = setup();
        let _frames = recorder(&manager);

        manager.info("default").unwrap();
        manager
            .show(ToastRequest::error("long").with_timeout(Duration::from_secs(5)))
            .unwrap();

        timer.advance(Duration::from_millis(2000));
        assert_eq!(titles(&manager), vec!["long"]);

        timer.advance(Duration::from_secs(3));
        assert!(manager.active().is_empty());
        assert_eq!(manager.stats().auto_dismissed, 2);
    }

    #[test]
    fn test_manual_hide_cancels_timer() {
        let (manager, timer) = setup();
        let _frames = recorder(&manager);

        let handle = manager.info("bye").unwrap();
        assert_eq!(timer.pending(), 1);

        assert!(manager.hide(handle.id()));
        assert_eq!(timer.pending(), 0);
        assert_eq!(timer.advance(Duration::from_secs(10)), 0);
        assert_eq!(manager.stats().dismissed, 1);
        assert_eq!(manager.stats().auto_dismissed, 0);
    }

    #[test]
    fn test_buffered_toasts_wait_for_surface_before_timing_out() {
        let (manager, timer) = setup();
        manager.info("queued").unwrap();

        assert_eq!(timer.pending(), 0);
        timer.advance(Duration::from_secs(60));
        assert_eq!(manager.pending_count(), 1);

        let frames = recorder(&manager);
        assert_eq!(*frames.lock(), vec![vec!["queued".to_string()]]);
        assert_eq!(timer.pending(), 1);
    }

    #[test]
    fn test_hide_buffered_toast() {
        let (manager, _timer) = setup();
        let handle = manager.info("never shown").unwrap();

        assert!(handle.dismiss());
        assert_eq!(manager.pending_count(), 0);

        let frames = recorder(&manager);
        assert!(frames.lock().is_empty());
    }

    #[test]
    fn test_remount_receives_active_list() {
        let (manager, _timer) = setup();
        let _first = recorder(&manager);
        manager.info("still here").unwrap();

        manager.unregister();
        let second = recorder(&manager);
        assert_eq!(*second.lock(), vec![vec!["still here".to_string()]]);
    }

    #[test]
    fn test_register_with_nothing_to_show_stays_silent() {
        let (manager, _timer) = setup();
        let frames = recorder(&manager);
        assert!(frames.lock().is_empty());
        assert_eq!(manager.stats().deliveries, 0);
    }

    #[test]
    fn test_max_pending_drops_oldest() {
        let timer = ManualTimer::new();
        let config = NotificationConfig::builder().with_max_pending(2).build().unwrap();
        let manager = ToastManager::with_config(config, Arc::new(timer));

        for title in ["a", "b", "c"] {
            manager.info(title).unwrap();
        }
        assert_eq!(manager.pending_count(), 2);

        let frames = recorder(&manager);
        assert_eq!(*frames.lock(), vec![vec!["b".to_string(), "c".to_string()]]);
    }

    #[test]
    fn test_clear_removes_everything() {
        let (manager, timer) = setup();
        let frames = recorder(&manager);
        manager.info("one").unwrap();
        manager.info("two").unwrap();

        manager.clear();
        assert!(manager.active().is_empty());
        assert_eq!(timer.pending(), 0);
        assert_eq!(frames.lock().last().unwrap().len(), 0);
    }

    #[test]
    fn test_surface_may_reenter_manager() {
        let (manager, _timer) = setup();
        let reentrant = manager.clone();
        manager.register_fn(move |toasts: &[Toast]| {
            if let Some(toast) = toasts.iter().find(|t| t.kind() == ToastKind::Error) {
                reentrant.hide(toast.id());
            }
        });

        manager.error("auto-rejected").unwrap();
        manager.success("kept").unwrap();
        assert_eq!(titles(&manager), vec!["kept"]);
    }

    #[test]
    fn test_handle_outliving_manager_is_inert() {
        let (manager, timer) = setup();
        let handle = manager.info("orphan").unwrap();
        drop(manager);

        assert!(!handle.dismiss());
        assert_eq!(timer.advance(Duration::from_secs(5)), 0);
    }

    #[test]
    fn test_concurrent_shows_end_on_latest_list() {
        use std::sync::mpsc;
        use std::thread;

        let (manager, _timer) = setup();
        let (entered_tx, entered_rx) = mpsc::channel();
        let entered_tx = Mutex::new(Some(entered_tx));
        let frames: Frames = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&frames);

        // The first render stalls, letting another thread's show overtake it
        manager.register_fn(move |toasts: &[Toast]| {
            if let Some(tx) = entered_tx.lock().take() {
                tx.send(()).unwrap();
                thread::sleep(Duration::from_millis(100));
            }
            sink.lock().push(toasts.iter().map(|t| t.title().to_string()).collect());
        });

        let slow = manager.clone();
        let worker = thread::spawn(move || {
            slow.info("X").unwrap();
        });
        entered_rx.recv().unwrap();
        manager.info("Y").unwrap();
        worker.join().unwrap();

        assert_eq!(titles(&manager), vec!["X", "Y"]);
        assert_eq!(frames.lock().last().unwrap(), &titles(&manager));
    }
}
