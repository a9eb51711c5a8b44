//! Log-backed notification and status sinks
//!
//! A headless daemon has no tray icon; notifications become log events at
//! a level matching their severity.

use duckdns_core::{Notifier, Severity, StatusSink};
use tracing::{debug, error, info, warn};

/// Notifier writing to the tracing subscriber
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, body: &str, severity: Severity) {
        let body = body.replace('\n', " ");
        match severity {
            Severity::Info => info!("[{}] {}", title, body),
            Severity::Warning => warn!("[{}] {}", title, body),
            Severity::Error => error!("[{}] {}", title, body),
        }
    }
}

/// Status sink writing to the tracing subscriber at debug level
#[derive(Debug, Default)]
pub struct LogStatusSink;

impl StatusSink for LogStatusSink {
    fn set_status_text(&self, text: &str) {
        debug!("Status: {}", text.replace('\n', " | "));
    }
}
