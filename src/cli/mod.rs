//! CLI module containing argument parsing for the demo binary

pub mod args;

pub use args::Args;
