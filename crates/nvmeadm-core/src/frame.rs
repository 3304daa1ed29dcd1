//! Text-safe framing of raw byte buffers.
//!
//! Command, payload, and completion buffers ride inside JSON strings on
//! the RPC channel. The URL- and filesystem-safe base64 alphabet (`-` and
//! `_` in place of `+` and `/`) keeps them transportable without
//! escaping.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FramingError {
    #[error("malformed text-safe frame: {0}")]
    Malformed(#[from] base64::DecodeError),
}

/// Encode raw bytes into the transport alphabet.
pub fn encode(data: &[u8]) -> String {
    URL_SAFE.encode(data)
}

/// Decode a framed string back into raw bytes.
///
/// Fails on padding errors and on characters outside the alphabet.
pub fn decode(text: &str) -> Result<Vec<u8>, FramingError> {
    Ok(URL_SAFE.decode(text)?)
}
