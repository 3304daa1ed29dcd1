//! Mock command channel for testing.

use std::collections::VecDeque;
use std::sync::Mutex;

use serde_json::{Value, json};

use super::traits::{ChannelError, RpcChannel};
use crate::frame;
use crate::record::{CompletionEntry, FixedRecord};

/// Mock channel for unit testing command flows without a daemon.
pub struct MockChannel {
    /// Queued responses, popped in order.
    responses: Mutex<VecDeque<Value>>,
    /// Captured calls as (method, params).
    calls: Mutex<Vec<(String, Value)>>,
}

impl MockChannel {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a raw response to be returned on the next call.
    pub fn queue_response(&self, response: Value) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Queue a response carrying the framed completion entry.
    pub fn queue_completion(&self, entry: &CompletionEntry) {
        self.queue_response(json!({"cpl": frame::encode(&entry.to_bytes())}));
    }

    /// Queue a completion with just a status pair set.
    pub fn queue_status(&self, sct: u8, sc: u8) {
        self.queue_completion(&CompletionEntry {
            sct,
            sc,
            ..Default::default()
        });
    }

    /// Get all captured calls.
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    /// Clear captured calls.
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl RpcChannel for MockChannel {
    fn call(&self, method: &str, params: Value) -> Result<Value, ChannelError> {
        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), params));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(ChannelError::Timeout { timeout_ms: 5000 })
    }
}
