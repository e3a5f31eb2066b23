//! Notification System Error Types
//!
//! Only request validation can fail. Dismissing an unknown notification,
//! updating a dialog that is no longer shown or unregistering twice are
//! no-ops and never reach this type.

use thiserror::Error;

/// Result type for notification operations
pub type NotificationResult<T> = Result<T, NotificationError>;

/// Errors that can occur in the notification system
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotificationError {
    /// Toast requested without a title
    #[error("Notification title must not be empty")]
    MissingTitle,

    /// Toast kind outside the closed set
    #[error("Invalid toast kind: {0}. Valid kinds: success, info, error")]
    InvalidKind(String),

    /// Dialog requested with neither title nor description
    #[error("Dialog requires a title or a description")]
    EmptyDialog,

    /// Configuration value could not be applied
    #[error("Invalid notification configuration for '{key}': {value}")]
    InvalidConfig { key: String, value: String },
}

impl NotificationError {
    /// Create an invalid kind error
    pub fn invalid_kind<S: Into<String>>(kind: S) -> Self {
        Self::InvalidKind(kind.into())
    }

    /// Create an invalid configuration error
    pub fn invalid_config<K: Into<String>, V: Into<String>>(key: K, value: V) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            NotificationError::MissingTitle.to_string(),
            "Notification title must not be empty"
        );
        assert_eq!(
            NotificationError::invalid_kind("warning").to_string(),
            "Invalid toast kind: warning. Valid kinds: success, info, error"
        );
        assert_eq!(
            NotificationError::invalid_config("default-timeout-ms", "0").to_string(),
            "Invalid notification configuration for 'default-timeout-ms': 0"
        );
    }
}
