//! Toast and Dialog Notification Managers
//!
//! Imperative notification API usable from anywhere in an application,
//! decoupled from whatever renders it.
//!
//! # Architecture
//!
//! - **Queue Store** (`queue`): pending buffer plus active state
//! - **Subscriber Registry** (`registry`): the single display surface
//! - **Managers** (`ToastManager`, `DialogManager`): `show` / `hide` /
//!   `progress` plus `register` / `unregister` for the surface
//!
//! Requests made before a surface registers are buffered and delivered in
//! one go when it does. Managers are plain values; pass clones to whatever
//! needs to raise notifications.
//!
//! # Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use toastmaster::notifications::{Toast, ToastManager};
//! use toastmaster::timer::ManualTimer;
//!
//! let toasts = ToastManager::new(Arc::new(ManualTimer::new()));
//!
//! // Before any surface exists: buffered
//! let saved = toasts.success("Saved").unwrap();
//!
//! // Surface mounts and receives ["Saved"]
//! toasts.register_fn(|list: &[Toast]| {
//!     for toast in list {
//!         println!("[{}] {}", toast.kind(), toast.title());
//!     }
//! });
//!
//! saved.dismiss();
//! ```

pub mod config;
pub mod dialog;
pub mod error;
pub mod id;
pub mod queue;
pub mod registry;
pub mod toast;
pub mod traits;


// Re-export core types for convenience
pub use config::NotificationConfig;
pub use dialog::{ButtonVariant, Dialog, DialogButton, DialogHandle, DialogManager, DialogRequest};
pub use error::{NotificationError, NotificationResult};
pub use id::NotificationId;
pub use toast::{DismissHandle, Toast, ToastKind, ToastManager, ToastRequest};
pub use traits::{DeliveryStats, DisplaySurface, ModalController};
