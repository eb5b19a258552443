//! crates/docqa_client_core/src/notifier.rs
//!
//! The single-slot alert used by the upload and document list flows.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use crate::domain::{AlertMessage, Severity};
use crate::ports::AlertSurface;
use crate::render::render_alert;

/// Shows at most one alert. A new alert silently replaces the current one;
/// nothing is queued and nothing expires on a timer.
pub struct Notifier {
    surface: Arc<dyn AlertSurface>,
    current: Mutex<Option<AlertMessage>>,
}

impl Notifier {
    pub fn new(surface: Arc<dyn AlertSurface>) -> Self {
        Self {
            surface,
            current: Mutex::new(None),
        }
    }

    pub fn show(&self, text: impl Into<String>, severity: Severity) {
        let alert = AlertMessage {
            text: text.into(),
            severity,
        };
        debug!(severity = severity.as_str(), text = %alert.text, "Showing alert.");
        let markup = render_alert(&alert);
        *self.slot() = Some(alert);
        self.surface.replace(Some(markup));
    }

    pub fn success(&self, text: impl Into<String>) {
        self.show(text, Severity::Success);
    }

    pub fn danger(&self, text: impl Into<String>) {
        self.show(text, Severity::Danger);
    }

    /// The user's explicit close control.
    pub fn dismiss(&self) {
        self.clear();
    }

    pub fn clear(&self) {
        *self.slot() = None;
        self.surface.replace(None);
    }

    pub fn current(&self) -> Option<AlertMessage> {
        self.slot().clone()
    }

    fn slot(&self) -> MutexGuard<'_, Option<AlertMessage>> {
        self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
