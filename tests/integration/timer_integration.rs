//! Timer Integration Tests
//!
//! Toast auto-dismiss on a real tokio runtime.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use parking_lot::Mutex;

use toastmaster::notifications::{NotificationConfig, Toast, ToastManager, ToastRequest};
use toastmaster::timer::{TimerDriver, TokioTimer};

fn tokio_manager(timeout_ms: u64) -> ToastManager {
    let config = NotificationConfig::builder()
        .with_toast_timeout(Duration::from_millis(timeout_ms))
        .build()
        .expect("valid config");
    let timer = TokioTimer::current().expect("inside a tokio runtime");
    ToastManager::with_config(config, Arc::new(timer))
}

#[tokio::test]
async fn test_toast_expires_on_runtime() {
    let toasts = tokio_manager(50);
    let frames = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&frames);
    toasts.register_fn(move |list: &[Toast]| sink.lock().push(list.len()));

    toasts.info("short lived").unwrap();
    assert_eq!(toasts.active().len(), 1);

    tokio::time::sleep(Duration::from_millis(300)).await;

    assert!(toasts.active().is_empty());
    assert_eq!(*frames.lock(), vec![1, 0]);
    assert_eq!(toasts.stats().auto_dismissed, 1);
}

#[tokio::test]
async fn test_per_toast_timeout_overrides_default() {
    let toasts = tokio_manager(5_000);
    toasts.register_fn(|_: &[Toast]| {});

    toasts.show(ToastRequest::info("quick").with_timeout(Duration::from_millis(30))).unwrap();
    toasts.info("slow").unwrap();

    tokio::time::sleep(Duration::from_millis(250)).await;

    let titles: Vec<String> = toasts.active().iter().map(|t| t.title().to_string()).collect();
    assert_eq!(titles, vec!["slow"]);
}

#[tokio::test]
async fn test_manual_dismiss_cancels_timer() {
    let toasts = tokio_manager(100);
    toasts.register_fn(|_: &[Toast]| {});

    let handle = toasts.info("closed by hand").unwrap();
    assert!(handle.dismiss());

    tokio::time::sleep(Duration::from_millis(300)).await;

    let stats = toasts.stats();
    assert_eq!(stats.dismissed, 1);
    assert_eq!(stats.auto_dismissed, 0);
}

#[tokio::test]
async fn test_dropped_manager_makes_timers_noops() {
    let toasts = tokio_manager(30);
    toasts.register_fn(|_: &[Toast]| {});
    let handle = toasts.info("orphan").unwrap();
    drop(toasts);

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(!handle.dismiss());
}

#[tokio::test]
async fn test_cancelled_handle_never_fires() {
    let timer = TokioTimer::current().unwrap();
    let fired = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&fired);
    let handle = timer.schedule(
        Duration::from_millis(30),
        Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }),
    );
    handle.cancel();

    let counter = Arc::clone(&fired);
    timer.schedule(
        Duration::from_millis(30),
        Box::new(move || {
            counter.fetch_add(10, Ordering::SeqCst);
        }),
    );

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 10);
}
