//! Notification Flow Integration Tests
//!
//! Drives the public API the way an application would:
//! - Toasts and dialogs raised before any surface exists
//! - Surfaces remounting and reentrant calls from inside a render
//! - Configuration files feeding the managers

use std::fs;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use parking_lot::Mutex;
use tempfile::TempDir;

use toastmaster::config::ConfigManager;
use toastmaster::icons::Icon;
use toastmaster::notifications::{
    Dialog, DialogButton, DialogManager, DialogRequest, ModalController, NotificationError,
    Toast, ToastKind, ToastManager, ToastRequest,
};
use toastmaster::timer::ManualTimer;

fn toast_manager() -> (ToastManager, ManualTimer) {
    let timer = ManualTimer::new();
    (ToastManager::new(Arc::new(timer.clone())), timer)
}

fn record_toasts(manager: &ToastManager) -> Arc<Mutex<Vec<Vec<String>>>> {
    let frames = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&frames);
    manager.register_fn(move |toasts: &[Toast]| {
        sink.lock().push(toasts.iter().map(|t| t.title().to_string()).collect());
    });
    frames
}

#[test]
fn test_remount_delivers_current_list() {
    let (toasts, _timer) = toast_manager();
    let first = record_toasts(&toasts);
    toasts.info("kept across remount").unwrap();
    toasts.unregister();

    let second = record_toasts(&toasts);
    assert_eq!(first.lock().len(), 1);
    assert_eq!(*second.lock(), vec![vec!["kept across remount".to_string()]]);
}

#[test]
fn test_register_with_nothing_pending_is_silent() {
    let (toasts, _timer) = toast_manager();
    let frames = record_toasts(&toasts);
    assert!(frames.lock().is_empty());
    assert_eq!(toasts.stats().deliveries, 0);
}

#[test]
fn test_surface_may_hide_from_inside_render() {
    let (toasts, _timer) = toast_manager();
    let manager = toasts.clone();
    let frames = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&frames);

    toasts.register_fn(move |list: &[Toast]| {
        sink.lock().push(list.len());
        // Errors are closed by the surface as soon as they appear
        if let Some(error) = list.iter().find(|t| t.kind() == ToastKind::Error) {
            manager.hide(error.id());
        }
    });

    toasts.info("stays").unwrap();
    toasts.error("closes itself").unwrap();

    assert_eq!(*frames.lock(), vec![1, 2, 1]);
    assert_eq!(toasts.active().len(), 1);
}

#[test]
fn test_hide_buffered_toast_before_mount() {
    let (toasts, _timer) = toast_manager();
    let doomed = toasts.info("never seen").unwrap();
    toasts.info("seen").unwrap();

    assert!(doomed.dismiss());
    let frames = record_toasts(&toasts);
    assert_eq!(*frames.lock(), vec![vec!["seen".to_string()]]);
}

#[test]
fn test_validation_errors() {
    let (toasts, _timer) = toast_manager();
    assert_eq!(toasts.info("   ").unwrap_err(), NotificationError::MissingTitle);
    assert!(matches!(
        ToastRequest::parse("warning", "Disk almost full"),
        Err(NotificationError::InvalidKind(kind)) if kind == "warning"
    ));

    let dialogs = DialogManager::new();
    assert_eq!(
        dialogs.show(DialogRequest::new()).unwrap_err(),
        NotificationError::EmptyDialog
    );
    assert_eq!(toasts.stats().shown, 0);
}

#[test]
fn test_managers_shared_across_threads() {
    let (toasts, timer) = toast_manager();
    let frames = record_toasts(&toasts);

    let workers: Vec<_> = (0..4)
        .map(|worker| {
            let toasts = toasts.clone();
            thread::spawn(move || {
                for i in 0..25 {
                    toasts.info(format!("w{}-{}", worker, i)).unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(toasts.active().len(), 100);

    // Overtaken snapshots may be skipped, but the surface ends on the live list
    let titles: Vec<String> = toasts.active().iter().map(|t| t.title().to_string()).collect();
    {
        let frames = frames.lock();
        assert!(!frames.is_empty() && frames.len() <= 100);
        assert_eq!(frames.last().unwrap(), &titles);
    }

    // Per-thread order survives interleaving
    for worker in 0..4 {
        let prefix = format!("w{}-", worker);
        let own: Vec<usize> = titles
            .iter()
            .filter_map(|t| t.strip_prefix(&prefix))
            .map(|n| n.parse().unwrap())
            .collect();
        assert_eq!(own, (0..25).collect::<Vec<_>>());
    }

    timer.advance(Duration::from_secs(2));
    assert!(toasts.active().is_empty());
    assert_eq!(toasts.stats().auto_dismissed, 100);
}

#[test]
fn test_confirm_flow_before_mount() {
    let dialogs = DialogManager::new();
    let (toasts, _timer) = toast_manager();
    let toast_frames = record_toasts(&toasts);

    let notifier = toasts.clone();
    dialogs
        .confirm(
            "Leave team?",
            "You will lose access to shared boards",
            move || {
                notifier.success("Left team")?;
                Ok(())
            },
            || {},
        )
        .unwrap();

    let seen: Arc<Mutex<Vec<Option<Icon>>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    dialogs.register_fn(move |dialog: &Option<Dialog>| {
        sink.lock().push(dialog.as_ref().and_then(|d| d.icon()));
    });

    assert_eq!(*seen.lock(), vec![Some(Icon::Question)]);
    assert!(dialogs.press(1));
    assert!(dialogs.active().is_none());
    assert_eq!(toast_frames.lock().last().unwrap(), &vec!["Left team".to_string()]);
}

#[test]
fn test_confirm_failure_keeps_dialog_open() {
    let dialogs = DialogManager::new();
    dialogs.register_fn(|_: &Option<Dialog>| {});
    dialogs
        .confirm("Publish?", "Visible to everyone", || anyhow::bail!("offline"), || {})
        .unwrap();

    assert!(dialogs.press(1));
    let dialog = dialogs.active().unwrap();
    assert!(dialog.buttons().iter().all(|b| !b.is_loading()));
    assert!(dialogs.is_open());
}

#[test]
fn test_button_progress_round_trip() {
    let dialogs = DialogManager::new();
    dialogs.register_fn(|_: &Option<Dialog>| {});
    let handle = dialogs
        .show(
            DialogRequest::new()
                .with_title("Upload")
                .with_button(DialogButton::new("Cancel", || {}))
                .with_button(DialogButton::new("Upload", || {})),
        )
        .unwrap();

    assert!(handle.progress(true, Some(0)));
    let buttons: Vec<bool> = dialogs.active().unwrap().buttons().iter().map(|b| b.is_loading()).collect();
    assert_eq!(buttons, vec![true, false]);

    assert!(!handle.progress(true, Some(7)));
    assert!(handle.dismiss());
    assert!(!handle.progress(false, None));
}

#[test]
fn test_config_file_drives_manager() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("toastmaster.toml");
    fs::write(&config_path, "[toast]\ndefault-timeout-ms = 400\nmax-pending = 2\n")
        .expect("Failed to write config file");

    let config = ConfigManager::load_from_file(config_path)
        .unwrap()
        .get_notification_config()
        .unwrap();

    let timer = ManualTimer::new();
    let toasts = ToastManager::with_config(config, Arc::new(timer.clone()));
    for title in ["a", "b", "c"] {
        toasts.info(title).unwrap();
    }
    assert_eq!(toasts.pending_count(), 2);

    let frames = record_toasts(&toasts);
    assert_eq!(*frames.lock(), vec![vec!["b".to_string(), "c".to_string()]]);

    timer.advance(Duration::from_millis(400));
    assert!(toasts.active().is_empty());
}
