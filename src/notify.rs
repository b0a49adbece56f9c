//! Transient user-facing notifications
//!
//! Mutations raise a success or error notification when they settle. The sink
//! is a trait so embedders can route notifications into their own UI layer;
//! the default routes through the `log` facade.

use std::sync::{Arc, Mutex};

use log::{error, info};

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// A transient user-visible notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

/// Destination for transient notifications
pub trait NotificationSink: Send + Sync {
    fn publish(&self, notification: Notification);
}

/// Default sink: notifications become log records
#[derive(Debug, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn publish(&self, notification: Notification) {
        match notification.severity {
            Severity::Success => info!("{}", notification.message),
            Severity::Error => error!("{}", notification.message),
        }
    }
}

/// In-memory sink for tests and embedders that render notifications themselves
#[derive(Debug, Default)]
pub struct MemorySink {
    inner: Mutex<Vec<Notification>>,
}

impl MemorySink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// All notifications published so far, oldest first
    pub fn drain(&self) -> Vec<Notification> {
        let mut inner = self.inner.lock().unwrap();
        std::mem::take(&mut *inner)
    }
}

impl NotificationSink for MemorySink {
    fn publish(&self, notification: Notification) {
        let mut inner = self.inner.lock().unwrap();
        inner.push(notification);
    }
}
