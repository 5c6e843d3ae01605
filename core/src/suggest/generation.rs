/// Generation counter for lookup supersession
///
/// Every lookup the controller issues is tagged with the next generation.
/// Only a response carrying the latest generation is applied, so a slow
/// answer to an old query can never overwrite a newer one, whatever order
/// the answers arrive in. The underlying request is never cancelled; its
/// result is simply ignored.
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonically increasing lookup generation
#[derive(Debug)]
pub struct GenerationCounter {
    value: AtomicU64,
}

impl GenerationCounter {
    /// Create a new counter starting at 0 (no lookup issued yet)
    pub fn new() -> Self {
        Self {
            value: AtomicU64::new(0),
        }
    }

    /// Issue the next generation
    pub fn next(&self) -> u64 {
        self.value.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Latest issued generation
    pub fn current(&self) -> u64 {
        self.value.load(Ordering::SeqCst)
    }

    /// Whether `generation` is the latest one issued
    pub fn is_current(&self, generation: u64) -> bool {
        generation != 0 && generation == self.current()
    }
}

impl Default for GenerationCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for GenerationCounter {
    fn clone(&self) -> Self {
        Self {
            value: AtomicU64::new(self.current()),
        }
    }
}
