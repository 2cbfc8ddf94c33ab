use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared "startup in progress" flag.
///
/// Written by the callback thread and read by the heartbeat worker. Clones
/// share the same underlying flag.
#[derive(Debug, Clone, Default)]
pub struct StartingFlag {
    raised: Arc<AtomicBool>,
}

impl StartingFlag {
    /// Builds a lowered flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks startup as in progress.
    pub fn raise(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }

    /// Marks startup as finished.
    pub fn lower(&self) {
        self.raised.store(false, Ordering::SeqCst);
    }

    /// Whether startup is in progress.
    #[must_use]
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }
}
