//! JSON-RPC 2.0 client over a unix domain socket.

use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use super::traits::{ChannelError, RpcChannel};

#[derive(Serialize)]
struct Request<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct Response {
    id: u64,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<ServerError>,
}

#[derive(Deserialize)]
struct ServerError {
    code: i64,
    message: String,
}

/// Production channel speaking JSON-RPC 2.0 to the storage daemon.
///
/// Calls are strictly sequential: the stream is held for the whole
/// request/response round trip, and request ids increase monotonically.
#[derive(Debug)]
pub struct UnixChannel {
    stream: Mutex<UnixStream>,
    next_id: AtomicU64,
}

impl UnixChannel {
    /// Connect to the daemon socket. `timeout` bounds each read and
    /// write on the stream; `None` blocks indefinitely.
    pub fn connect<P: AsRef<Path>>(
        path: P,
        timeout: Option<Duration>,
    ) -> Result<Self, ChannelError> {
        let path = path.as_ref();
        let stream = UnixStream::connect(path).map_err(|source| ChannelError::Connect {
            path: path.display().to_string(),
            source,
        })?;
        stream.set_read_timeout(timeout)?;
        stream.set_write_timeout(timeout)?;
        debug!(path = %path.display(), "connected");
        Ok(Self {
            stream: Mutex::new(stream),
            next_id: AtomicU64::new(1),
        })
    }
}

impl RpcChannel for UnixChannel {
    fn call(&self, method: &str, params: Value) -> Result<Value, ChannelError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let payload = serde_json::to_vec(&Request {
            jsonrpc: "2.0",
            id,
            method,
            params,
        })?;

        let mut stream = self.stream.lock().unwrap();
        stream.write_all(&payload)?;
        stream.flush()?;
        trace!(method, id, len = payload.len(), "request sent");

        let mut de = serde_json::Deserializer::from_reader(&mut *stream);
        let response = Response::deserialize(&mut de)?;
        if response.id != id {
            return Err(ChannelError::IdMismatch {
                want: id,
                got: response.id,
            });
        }
        if let Some(err) = response.error {
            return Err(ChannelError::Server {
                code: err.code,
                message: err.message,
            });
        }
        trace!(method, id, "response received");
        Ok(response.result.unwrap_or(Value::Null))
    }
}
