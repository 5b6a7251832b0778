//! In-memory transport for tests and offline use

use crate::{error::Result, websocket::client::Transport};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// Transport that records emitted events instead of sending them
#[derive(Debug, Default)]
pub struct MockTransport {
    emitted: Mutex<Vec<(String, Value)>>,
    closes: AtomicUsize,
}

impl MockTransport {
    /// Create an empty mock transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Events emitted so far, in order
    pub fn emitted(&self) -> Vec<(String, Value)> {
        self.emitted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of times `close` was called on the transport
    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

impl Transport for MockTransport {
    fn emit(&self, event: &str, payload: Value) -> Result<()> {
        self.emitted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((event.to_string(), payload));
        Ok(())
    }

    fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}
