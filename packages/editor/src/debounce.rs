//! Cancel-and-reschedule timer.
//!
//! Time is supplied by the host as milliseconds on a monotonic clock, so the
//! engine stays deterministic and runs unchanged under wasm. At most one run
//! is pending; every `schedule` pushes it back.

/// Delay between the last keystroke and the autocomplete reindex
pub const REINDEX_DELAY_MS: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debouncer {
    delay_ms: u64,
    due_at: Option<u64>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(REINDEX_DELAY_MS)
    }
}

impl Debouncer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            due_at: None,
        }
    }

    /// Cancel any pending run and schedule a new one `delay_ms` after `now_ms`
    pub fn schedule(&mut self, now_ms: u64) {
        self.due_at = Some(now_ms.saturating_add(self.delay_ms));
    }

    pub fn cancel(&mut self) {
        self.due_at = None;
    }

    pub fn is_pending(&self) -> bool {
        self.due_at.is_some()
    }

    pub fn due_at(&self) -> Option<u64> {
        self.due_at
    }

    /// True (once) when the pending run is due
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.due_at {
            Some(due) if now_ms >= due => {
                self.due_at = None;
                true
            }
            _ => false,
        }
    }
}
