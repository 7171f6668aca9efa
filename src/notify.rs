//! Notification sinks.
//!
//! Every component reports lifecycle events as plain strings. Delivery is
//! fire-and-forget: a sink never reports failure back to the scheduler.

use std::sync::{Arc, Mutex, PoisonError};

use crossbeam_channel::Sender;

pub trait Notify: Send + Sync {
    fn notify(&self, message: &str);
}

pub type SharedNotifier = Arc<dyn Notify>;

/// Forwards notifications to the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notify for LogNotifier {
    fn notify(&self, message: &str) {
        log::info!(target: "notify", "{}", message);
    }
}

impl Notify for Sender<String> {
    fn notify(&self, message: &str) {
        // A disconnected receiver means nobody is listening anymore.
        let _ = self.send(message.to_string());
    }
}

/// Keeps every notification in memory.
#[derive(Clone, Debug, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn new() -> RecordingNotifier {
        RecordingNotifier::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|message| message.contains(needle))
    }

    pub fn clear(&self) {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl Notify for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}
