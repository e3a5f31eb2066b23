//! Scripted demo scenario

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use log::{debug, info};
use crate::notifications::{DialogManager, ModalController, NotificationConfig, ToastManager, ToastRequest};
use crate::sheet::SheetController;
use crate::timer::{TimerDriver, TokioTimer};
use super::console::{ConsoleDialogSurface, ConsoleSheetSurface, ConsoleToastSurface};

/// Managers wired together for one demo run
pub struct DemoContext {
    pub toasts: ToastManager,
    pub dialogs: DialogManager,
    pub sheet: SheetController,
}

impl DemoContext {
    pub fn new(config: NotificationConfig, timer: Arc<dyn TimerDriver>) -> Self {
        Self {
            toasts: ToastManager::with_config(config, timer),
            dialogs: DialogManager::new(),
            sheet: SheetController::new(),
        }
    }

    /// Attach the console surfaces, as a root view would on mount
    pub fn mount_console(&self) {
        self.toasts.register(Arc::new(ConsoleToastSurface));
        self.dialogs.register(Arc::new(ConsoleDialogSurface));
        self.sheet.register(Arc::new(ConsoleSheetSurface));
    }

    pub fn unmount(&self) {
        self.toasts.unregister();
        self.dialogs.unregister();
        self.sheet.unregister();
    }
}

/// Raise notifications before the surfaces exist, mount them, then drive
/// dialogs, toasts and the sheet through a short session.
pub fn run_script(context: &DemoContext) -> Result<()> {
    info!("Raising notifications before mount");
    context.toasts.info("Loading profile")?;
    context.toasts.success("Welcome back")?;
    context.dialogs.alert("What's new", "Notifications now queue until the screen is ready", || {
        debug!("Release notes acknowledged");
    })?;

    info!("Mounting console surfaces");
    context.mount_console();

    // Acknowledge the buffered alert
    context.dialogs.press(0);

    let toasts = context.toasts.clone();
    context.dialogs.confirm(
        "Delete draft?",
        "This cannot be undone",
        move || {
            toasts.success("Draft deleted")?;
            Ok(())
        },
        || debug!("Deletion cancelled"),
    )?;
    context.dialogs.press(1);

    let failed = context.toasts.show(
        ToastRequest::error("Sync failed").with_timeout(Duration::from_millis(500)),
    )?;
    context.toasts.show(ToastRequest::parse("info", "Retrying in background")?)?;
    failed.dismiss();

    context.sheet.open();
    context.sheet.close();

    Ok(())
}

/// Run the scripted scenario and wait for every toast to time out
pub async fn run_demo(config: NotificationConfig) -> Result<()> {
    let timer = TokioTimer::current().context("Demo requires a tokio runtime")?;
    let settle = config.toast_timeout + Duration::from_millis(100);
    let context = DemoContext::new(config, Arc::new(timer));

    run_script(&context)?;

    debug!("Waiting {:?} for toasts to expire", settle);
    tokio::time::sleep(settle).await;

    let toast_stats = context.toasts.stats();
    let dialog_stats = context.dialogs.stats();
    info!(
        "Toasts: {} shown, {} buffered, {} dismissed, {} expired, {} deliveries",
        toast_stats.shown,
        toast_stats.buffered,
        toast_stats.dismissed,
        toast_stats.auto_dismissed,
        toast_stats.deliveries
    );
    info!(
        "Dialogs: {} shown, {} dismissed, {} deliveries",
        dialog_stats.shown, dialog_stats.dismissed, dialog_stats.deliveries
    );

    context.unmount();
    Ok(())
}
