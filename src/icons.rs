//! Icon registry
//!
//! Symbolic icon names resolve through a closed enum. Unknown names fall
//! back to `Icon::Fallback` instead of failing.

use std::fmt;
use serde::{Deserialize, Serialize};

/// Icons available to notification surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Icon {
    Success,
    Info,
    Error,
    Warning,
    Cancel,
    Question,
    Fallback,
}

impl Icon {
    /// Every registered icon, fallback last
    pub const ALL: [Icon; 7] = [
        Icon::Success,
        Icon::Info,
        Icon::Error,
        Icon::Warning,
        Icon::Cancel,
        Icon::Question,
        Icon::Fallback,
    ];

    /// Resolve a symbolic name, case-insensitively
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "success" | "check" => Icon::Success,
            "info" => Icon::Info,
            "error" => Icon::Error,
            "warning" | "warn" => Icon::Warning,
            "cancel" | "close" => Icon::Cancel,
            "question" | "help" => Icon::Question,
            _ => Icon::Fallback,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Icon::Success => "success",
            Icon::Info => "info",
            Icon::Error => "error",
            Icon::Warning => "warning",
            Icon::Cancel => "cancel",
            Icon::Question => "question",
            Icon::Fallback => "fallback",
        }
    }

    /// Single-glyph rendering for text surfaces
    pub fn glyph(&self) -> &'static str {
        match self {
            Icon::Success => "✔",
            Icon::Info => "ℹ",
            Icon::Error => "✖",
            Icon::Warning => "⚠",
            Icon::Cancel => "×",
            Icon::Question => "?",
            Icon::Fallback => "•",
        }
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
