//! Outbound reporting interfaces
//!
//! The core knows nothing about how notifications or status text are
//! rendered. A tray icon, a desktop notification daemon or a log file are
//! all equally valid sinks.

/// How prominently a notification should be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Routine information (updated, unchanged, please configure)
    Info,
    /// Transient trouble that the next tick may resolve
    Warning,
    /// Needs user action
    Error,
}

/// A notification produced by a reconciliation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub severity: Severity,
}

impl Notification {
    /// Create a notification under the updater's product title
    pub fn new(body: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: crate::status::PRODUCT_NAME.to_string(),
            body: body.into(),
            severity,
        }
    }

    /// Deliver this notification to a sink
    pub fn deliver(&self, notifier: &dyn Notifier) {
        notifier.notify(&self.title, &self.body, self.severity);
    }
}

/// Sink for user-visible notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, body: &str, severity: Severity);
}

/// Sink for the tooltip-style status line
pub trait StatusSink: Send + Sync {
    /// Replace the displayed status text
    fn set_status_text(&self, text: &str);
}
