use std::sync::{Arc, Mutex, PoisonError};

use tracing::{info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub level: Level,
    pub message: String,
}

/// Transient user notifications, drained by the front end after each command.
#[derive(Clone, Debug, Default)]
pub struct Toaster {
    pending: Arc<Mutex<Vec<Toast>>>,
}

impl Toaster {
    pub fn success(&self, message: impl Into<String>) {
        let message = message.into();
        info!(toast = %message);
        self.push(Level::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        let message = message.into();
        warn!(toast = %message);
        self.push(Level::Error, message);
    }

    pub fn drain(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.lock())
    }

    pub fn last(&self) -> Option<Toast> {
        self.lock().last().cloned()
    }

    fn push(&self, level: Level, message: String) {
        self.lock().push(Toast { level, message });
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Toast>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
