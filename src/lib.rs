pub mod app;
pub mod cli;
pub mod config;
pub mod icons;
pub mod logging;
pub mod notifications;
pub mod sheet;
pub mod timer;
