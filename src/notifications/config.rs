//! Notification Manager Configuration
//!
//! Tunables shared by the toast and dialog managers, with a builder in the
//! same style as the rest of the crate's configuration.
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use toastmaster::notifications::NotificationConfig;
//!
//! let config = NotificationConfig::builder()
//!     .with_toast_timeout(Duration::from_secs(3))
//!     .with_max_pending(50)
//!     .build()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::time::Duration;
use serde::{Deserialize, Serialize};

use crate::notifications::error::{NotificationError, NotificationResult};

/// Auto-dismiss delay applied to toasts that do not carry their own
pub const DEFAULT_TOAST_TIMEOUT: Duration = Duration::from_millis(2000);

/// Notification manager configuration parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Default auto-dismiss delay for toasts
    pub toast_timeout: Duration,
    /// Upper bound on toasts buffered before a surface registers (None = unbounded)
    pub max_pending: Option<usize>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            toast_timeout: DEFAULT_TOAST_TIMEOUT,
            max_pending: None,
        }
    }
}

impl NotificationConfig {
    pub fn builder() -> NotificationConfigBuilder {
        NotificationConfigBuilder {
            config: Self::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> NotificationResult<()> {
        if self.toast_timeout.is_zero() {
            return Err(NotificationError::invalid_config("default-timeout-ms", "0"));
        }

        if self.max_pending == Some(0) {
            return Err(NotificationError::invalid_config("max-pending", "0"));
        }

        Ok(())
    }
}

/// Builder for `NotificationConfig`
#[derive(Debug, Clone)]
pub struct NotificationConfigBuilder {
    config: NotificationConfig,
}

impl NotificationConfigBuilder {
    /// Set the default toast auto-dismiss delay
    pub fn with_toast_timeout(mut self, timeout: Duration) -> Self {
        self.config.toast_timeout = timeout;
        self
    }

    /// Bound the pending toast buffer
    pub fn with_max_pending(mut self, max_pending: usize) -> Self {
        self.config.max_pending = Some(max_pending);
        self
    }

    /// Build and validate
    pub fn build(self) -> NotificationResult<NotificationConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NotificationConfig::default();
        assert_eq!(config.toast_timeout, Duration::from_millis(2000));
        assert!(config.max_pending.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = NotificationConfig::builder()
            .with_toast_timeout(Duration::from_millis(500))
            .with_max_pending(8)
            .build()
            .unwrap();

        assert_eq!(config.toast_timeout, Duration::from_millis(500));
        assert_eq!(config.max_pending, Some(8));
    }

    #[test]
    fn test_builder_rejects_zero_values() {
        assert!(NotificationConfig::builder()
            .with_toast_timeout(Duration::ZERO)
            .build()
            .is_err());
        assert!(NotificationConfig::builder().with_max_pending(0).build().is_err());
    }
}
