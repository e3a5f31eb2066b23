//! Application orchestration module

pub mod console;
pub mod execution;
pub mod initialization;

pub use initialization::{
    load_configuration,
    configure_logging,
    configure_notifications
};
pub use execution::run_demo;
