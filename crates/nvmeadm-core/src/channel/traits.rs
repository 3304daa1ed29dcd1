//! Command channel abstraction.
//!
//! Defines the `RpcChannel` trait for delivering framed commands to the
//! daemon that owns the controller, allowing different implementations
//! (unix socket, mock, etc.).

use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("failed to connect to {path}: {source}")]
    Connect {
        path: String,
        source: std::io::Error,
    },

    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("server error {code}: {message}")]
    Server { code: i64, message: String },

    #[error("response id {got} does not match request id {want}")]
    IdMismatch { want: u64, got: u64 },

    #[error("timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Abstract command channel: one blocking round trip per call.
///
/// This trait enables:
/// - Production implementation over a unix domain socket
/// - Mock implementation for unit testing
/// - Future alternative backends
pub trait RpcChannel: Send + Sync {
    /// Invoke `method` with `params`, returning the response mapping.
    fn call(&self, method: &str, params: Value) -> Result<Value, ChannelError>;
}
