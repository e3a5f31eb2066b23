//! Dialog Manager
//!
//! A single modal dialog at a time. Showing a dialog replaces whatever was
//! active (or buffered, before a surface registers). Button loading state is
//! updated in place through `progress`.

use std::fmt;
use std::sync::{Arc, Weak};
use log::{debug, trace, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::icons::Icon;
use crate::notifications::error::{NotificationError, NotificationResult};
use crate::notifications::id::NotificationId;
use crate::notifications::queue::{Keyed, Placement, SingleSlot};
use crate::notifications::registry::{DeliveryGate, SubscriberRegistry};
use crate::notifications::traits::{DeliveryStats, DisplaySurface, ModalController};

/// Visual weight of a dialog button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
    Outline,
}

/// Callback run when a button is pressed
pub type PressHandler = Arc<dyn Fn() + Send + Sync>;

/// One action of a dialog
#[derive(Clone)]
pub struct DialogButton {
    label: String,
    variant: ButtonVariant,
    on_press: PressHandler,
    is_loading: bool,
}

impl DialogButton {
    pub fn new<F>(label: impl Into<String>, on_press: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            variant: ButtonVariant::default(),
            on_press: Arc::new(on_press),
            is_loading: false,
        }
    }

    #[must_use]
    pub fn with_variant(mut self, variant: ButtonVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn variant(&self) -> ButtonVariant {
        self.variant
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Run the press handler directly, bypassing the manager
    pub fn press(&self) {
        (self.on_press)();
    }
}

impl fmt::Debug for DialogButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogButton")
            .field("label", &self.label)
            .field("variant", &self.variant)
            .field("is_loading", &self.is_loading)
            .finish()
    }
}

/// What a caller asks to show
#[derive(Debug, Clone)]
pub struct DialogRequest {
    title: Option<String>,
    description: Option<String>,
    icon: Option<Icon>,
    dismissible: bool,
    buttons: Vec<DialogButton>,
}

impl Default for DialogRequest {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            icon: None,
            dismissible: true,
            buttons: Vec::new(),
        }
    }
}

impl DialogRequest {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Resolve the icon by name; unknown names use the fallback icon
    #[must_use]
    pub fn with_icon_name(self, name: &str) -> Self {
        self.with_icon(Icon::from_name(name))
    }

    /// Whether a user dismissal (backdrop tap, back gesture) may close it
    #[must_use]
    pub fn dismissible(mut self, dismissible: bool) -> Self {
        self.dismissible = dismissible;
        self
    }

    #[must_use]
    pub fn with_button(mut self, button: DialogButton) -> Self {
        self.buttons.push(button);
        self
    }

    fn into_dialog(self, id: NotificationId) -> NotificationResult<Dialog> {
        let has_text = |text: &Option<String>| text.as_deref().is_some_and(|t| !t.trim().is_empty());
        if !has_text(&self.title) && !has_text(&self.description) {
            return Err(NotificationError::EmptyDialog);
        }

        Ok(Dialog {
            id,
            request: self,
        })
    }
}

/// A dialog accepted by the manager
#[derive(Debug, Clone)]
pub struct Dialog {
    id: NotificationId,
    request: DialogRequest,
}

impl Dialog {
    pub fn id(&self) -> NotificationId {
        self.id
    }

    pub fn title(&self) -> Option<&str> {
        self.request.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.request.description.as_deref()
    }

    pub fn icon(&self) -> Option<Icon> {
        self.request.icon
    }

    pub fn is_dismissible(&self) -> bool {
        self.request.dismissible
    }

    pub fn buttons(&self) -> &[DialogButton] {
        &self.request.buttons
    }

    /// Content of this dialog with every loading flag cleared
    fn to_request(&self) -> DialogRequest {
        let mut request = self.request.clone();
        for button in &mut request.buttons {
            button.is_loading = false;
        }
        request
    }
}

impl Keyed for Dialog {
    type Key = NotificationId;

    fn key(&self) -> NotificationId {
        self.id
    }
}

struct DialogState {
    slot: SingleSlot<Dialog>,
    registry: SubscriberRegistry<Option<Dialog>>,
    last_closed: Option<DialogRequest>,
    stats: DeliveryStats,
}

struct DialogShared {
    state: Mutex<DialogState>,
    gate: DeliveryGate,
}

struct Delivery {
    surface: Arc<dyn DisplaySurface<Option<Dialog>>>,
    snapshot: Option<Dialog>,
    version: u64,
}

impl Delivery {
    fn send(self, gate: &DeliveryGate) {
        gate.deliver(self.version, || {
            trace!(
                "Delivering dialog {:?} to surface (v{})",
                self.snapshot.as_ref().map(Dialog::id),
                self.version
            );
            self.surface.render(&self.snapshot);
        });
    }
}

impl DialogShared {
    fn prepare_delivery(state: &mut DialogState) -> Option<Delivery> {
        let surface = state.registry.current()?;
        state.stats.deliveries += 1;
        Some(Delivery {
            surface,
            snapshot: state.slot.active().cloned(),
            version: state.registry.stamp(),
        })
    }

    fn send(&self, delivery: Option<Delivery>) {
        if let Some(delivery) = delivery {
            delivery.send(&self.gate);
        }
    }

    fn show(&self, request: DialogRequest, id: NotificationId) -> NotificationResult<()> {
        let dialog = request.into_dialog(id)?;

        let delivery = {
            let mut state = self.state.lock();
            state.stats.shown += 1;

            let mounted = state.registry.is_registered();
            let (placement, replaced) = state.slot.enqueue_or_show(dialog, mounted);
            if let Some(replaced) = replaced {
                debug!("Dialog {} replaced by {}", replaced.id(), id);
            }

            match placement {
                Placement::Active => {
                    debug!("Showing dialog {}", id);
                    Self::prepare_delivery(&mut state)
                }
                Placement::Pending => {
                    state.stats.buffered += 1;
                    debug!("No dialog surface registered, buffered {}", id);
                    None
                }
            }
        };

        self.send(delivery);
        Ok(())
    }

    /// Close the active dialog, or only the one with `target` when given
    fn close(&self, target: Option<NotificationId>) -> bool {
        let delivery = {
            let mut state = self.state.lock();
            let closed = match target {
                Some(id) => state.slot.remove(id),
                None => {
                    let had_pending = state.slot.has_pending();
                    match state.slot.clear() {
                        Some(dialog) => Some((dialog, Placement::Active)),
                        None if had_pending => {
                            state.stats.dismissed += 1;
                            debug!("Dropped buffered dialog");
                            return true;
                        }
                        None => None,
                    }
                }
            };

            let Some((dialog, placement)) = closed else {
                debug!("No matching dialog to close");
                return false;
            };

            state.stats.dismissed += 1;
            debug!("Closed dialog {}", dialog.id());
            state.last_closed = Some(dialog.to_request());

            match placement {
                Placement::Active => Self::prepare_delivery(&mut state),
                Placement::Pending => None,
            }
        };

        self.send(delivery);
        true
    }

    fn progress(&self, target: Option<NotificationId>, is_loading: bool, button_index: Option<usize>) -> bool {
        let delivery = {
            let mut state = self.state.lock();
            let Some(dialog) = state.slot.active_mut() else {
                debug!("No active dialog, ignoring progress update");
                return false;
            };

            if target.is_some_and(|id| id != dialog.id()) {
                debug!("Dialog {} no longer active, ignoring progress update", dialog.id());
                return false;
            }

            let buttons = &mut dialog.request.buttons;
            let index = button_index.or_else(|| buttons.len().checked_sub(1));
            let Some(button) = index.and_then(|i| buttons.get_mut(i)) else {
                debug!("Dialog has no button at {:?}, ignoring progress update", index);
                return false;
            };

            button.is_loading = is_loading;
            Self::prepare_delivery(&mut state)
        };

        self.send(delivery);
        true
    }

    fn press(&self, button_index: usize) -> bool {
        let handler = {
            let state = self.state.lock();
            let Some(button) = state.slot.active().and_then(|d| d.buttons().get(button_index)) else {
                debug!("No dialog button at {}, ignoring press", button_index);
                return false;
            };
            if button.is_loading() {
                debug!("Button '{}' is busy, ignoring press", button.label());
                return false;
            }
            Arc::clone(&button.on_press)
        };

        handler();
        true
    }
}

/// Handle returned by `show`, bound to a single dialog
#[derive(Clone)]
pub struct DialogHandle {
    id: NotificationId,
    shared: Weak<DialogShared>,
}

impl DialogHandle {
    pub fn id(&self) -> NotificationId {
        self.id
    }

    /// Close this dialog if it is still the active or buffered one
    pub fn dismiss(&self) -> bool {
        self.shared
            .upgrade()
            .is_some_and(|shared| shared.close(Some(self.id)))
    }

    /// `progress` restricted to this dialog
    pub fn progress(&self, is_loading: bool, button_index: Option<usize>) -> bool {
        self.shared
            .upgrade()
            .is_some_and(|shared| shared.progress(Some(self.id), is_loading, button_index))
    }
}

impl fmt::Debug for DialogHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogHandle").field("id", &self.id).finish()
    }
}

/// Manager for the single modal dialog
///
/// Cloning yields another handle to the same state.
#[derive(Clone)]
pub struct DialogManager {
    shared: Arc<DialogShared>,
}

impl Default for DialogManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogManager {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(DialogShared {
                state: Mutex::new(DialogState {
                    slot: SingleSlot::new(),
                    registry: SubscriberRegistry::new("Dialog"),
                    last_closed: None,
                    stats: DeliveryStats::default(),
                }),
                gate: DeliveryGate::new(),
            }),
        }
    }

    /// Show a dialog, replacing the current one.
    ///
    /// Fails only when the dialog has neither title nor description.
    pub fn show(&self, request: DialogRequest) -> NotificationResult<DialogHandle> {
        self.show_as(request, NotificationId::next())
    }

    /// Show under an id chosen by the caller, so button handlers built
    /// beforehand already know which dialog they belong to
    fn show_as(&self, request: DialogRequest, id: NotificationId) -> NotificationResult<DialogHandle> {
        self.shared.show(request, id)?;
        Ok(DialogHandle {
            id,
            shared: Arc::downgrade(&self.shared),
        })
    }

    /// Close whatever dialog is active. Returns `false` if there was none.
    pub fn hide(&self) -> bool {
        self.shared.close(None)
    }

    /// User-initiated dismissal from the surface; ignored for dialogs that
    /// are not dismissible.
    pub fn dismiss(&self) -> bool {
        let active = self
            .shared
            .state
            .lock()
            .slot
            .active()
            .map(|dialog| (dialog.id(), dialog.is_dismissible()));

        match active {
            Some((id, true)) => self.shared.close(Some(id)),
            Some((_, false)) => {
                debug!("Active dialog is not dismissible");
                false
            }
            None => false,
        }
    }

    /// Set the loading flag of one button of the active dialog.
    ///
    /// Without an index the **last** button is updated. By convention the
    /// last button is the confirming action (see `confirm`), so a bare
    /// `progress(true, None)` marks the confirm button as busy. This is a
    /// positional rule, not a lookup of the primary variant.
    ///
    /// No active dialog or a missing button is a no-op returning `false`.
    pub fn progress(&self, is_loading: bool, button_index: Option<usize>) -> bool {
        self.shared.progress(None, is_loading, button_index)
    }

    /// Press a button of the active dialog. The handler runs without any
    /// manager lock held. Buttons marked loading ignore presses.
    pub fn press(&self, button_index: usize) -> bool {
        self.shared.press(button_index)
    }

    /// Two-button confirmation dialog.
    ///
    /// Cancel closes the dialog and runs `on_cancel`. Confirm marks itself
    /// loading and runs `on_confirm`: success closes the dialog, failure
    /// clears the loading flag and leaves the dialog open.
    pub fn confirm<F, G>(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
        on_confirm: F,
        on_cancel: G,
    ) -> NotificationResult<DialogHandle>
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
        G: Fn() + Send + Sync + 'static,
    {
        let id = NotificationId::next();

        let cancel = {
            let shared = Arc::downgrade(&self.shared);
            move || {
                if let Some(shared) = shared.upgrade() {
                    shared.close(Some(id));
                }
                on_cancel();
            }
        };

        let confirm = {
            let shared = Arc::downgrade(&self.shared);
            move || {
                let Some(shared) = shared.upgrade() else {
                    return;
                };
                shared.progress(Some(id), true, None);
                match on_confirm() {
                    Ok(()) => {
                        shared.close(Some(id));
                    }
                    Err(e) => {
                        warn!("Confirm action for dialog {} failed: {:#}", id, e);
                        shared.progress(Some(id), false, None);
                    }
                }
            }
        };

        let request = DialogRequest::new()
            .with_title(title)
            .with_description(description)
            .with_icon(Icon::Question)
            .with_button(DialogButton::new("Cancel", cancel).with_variant(ButtonVariant::Outline))
            .with_button(DialogButton::new("Confirm", confirm).with_variant(ButtonVariant::Primary));

        self.show_as(request, id)
    }

    /// Single-button acknowledgement dialog. OK closes it, then runs `on_press`.
    pub fn alert<F>(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
        on_press: F,
    ) -> NotificationResult<DialogHandle>
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = NotificationId::next();
        let ok = {
            let shared = Arc::downgrade(&self.shared);
            move || {
                if let Some(shared) = shared.upgrade() {
                    shared.close(Some(id));
                }
                on_press();
            }
        };

        let request = DialogRequest::new()
            .with_title(title)
            .with_description(description)
            .with_icon(Icon::Info)
            .with_button(DialogButton::new("OK", ok));

        self.show_as(request, id)
    }

    /// Register the display surface, replacing any previous one. A buffered
    /// dialog becomes active and is delivered once.
    ///
    /// A surface that captures a clone of this manager keeps it alive until
    /// `unregister` is called.
    pub fn register(&self, surface: Arc<dyn DisplaySurface<Option<Dialog>>>) {
        let delivery = {
            let mut state = self.shared.state.lock();
            state.registry.register(surface);

            if state.slot.drain_into_active() {
                state.stats.drained += 1;
                debug!("Buffered dialog promoted to active");
            }

            if state.slot.active().is_some() {
                DialogShared::prepare_delivery(&mut state)
            } else {
                None
            }
        };

        self.shared.send(delivery);
    }

    /// Register a closure as the display surface
    pub fn register_fn<F>(&self, surface: F)
    where
        F: Fn(&Option<Dialog>) + Send + Sync + 'static,
    {
        self.register(Arc::new(surface));
    }

    /// Drop the display surface together with the dialog it was showing.
    /// Later dialogs are buffered. Safe to repeat.
    pub fn unregister(&self) {
        let mut state = self.shared.state.lock();
        if state.registry.unregister() {
            if let Some(dialog) = state.slot.clear() {
                debug!("Dialog {} discarded with its surface", dialog.id());
            }
        }
    }

    /// Snapshot of the active dialog
    pub fn active(&self) -> Option<Dialog> {
        self.shared.state.lock().slot.active().cloned()
    }

    pub fn is_mounted(&self) -> bool {
        self.shared.state.lock().registry.is_registered()
    }

    pub fn stats(&self) -> DeliveryStats {
        self.shared.state.lock().stats.clone()
    }
}

impl ModalController for DialogManager {
    /// Re-present the most recently closed dialog, if any
    fn open(&self) {
        let request = {
            let state = self.shared.state.lock();
            if state.slot.active().is_some() {
                return;
            }
            state.last_closed.clone()
        };

        match request {
            Some(request) => {
                if let Err(e) = self.shared.show(request, NotificationId::next()) {
                    warn!("Could not reopen dialog: {}", e);
                }
            }
            None => debug!("No dialog to reopen"),
        }
    }

    fn close(&self) {
        self.hide();
    }

    fn is_open(&self) -> bool {
        self.shared.state.lock().slot.active().is_some()
    }
}
