//! Application context double that counts close requests.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::listener::ApplicationContext;

#[derive(Debug, Default)]
pub struct RecordingContext {
    closes: AtomicUsize,
}

impl RecordingContext {
    #[must_use]
    pub fn close_requests(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

impl ApplicationContext for RecordingContext {
    fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}
