//! Client-side navigation sink.

use parking_lot::Mutex;
use tracing::info;

/// Receives forced redirects, such as the jump to `/login` after a 401.
pub trait Navigator: Send + Sync {
    fn redirect(&self, to: &str);
}

/// A navigator that records every location it is sent to.
#[derive(Debug, Default)]
pub struct History {
    entries: Mutex<Vec<String>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent location, if any redirect happened.
    pub fn current(&self) -> Option<String> {
        self.entries.lock().last().cloned()
    }

    /// All recorded locations, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }
}

impl Navigator for History {
    fn redirect(&self, to: &str) {
        info!(to, "Redirecting");
        self.entries.lock().push(to.to_string());
    }
}
