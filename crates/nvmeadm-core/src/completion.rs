//! Completion extraction and response data rendering.

use serde_json::Value;
use thiserror::Error;

use crate::frame::{self, FramingError};
use crate::record::{CompletionEntry, FixedRecord, LayoutError};

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error(transparent)]
    Framing(#[from] FramingError),

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Decoded outcome of one admin round trip.
#[derive(Debug)]
pub enum CompletionOutcome {
    /// The response carried a completion entry.
    Completed(CompletionEntry),
    /// No completion field; the raw response is echoed for diagnosis.
    Unknown(Value),
}

impl CompletionOutcome {
    /// Extract the completion entry from a response mapping.
    ///
    /// A response without a `cpl` field is an unknown error, not a
    /// decode failure; a `cpl` field that does not unframe or parse is.
    pub fn from_response(response: &Value) -> Result<Self, DecodeError> {
        match response.get("cpl").and_then(Value::as_str) {
            Some(text) => {
                let raw = frame::decode(text)?;
                Ok(CompletionOutcome::Completed(CompletionEntry::from_bytes(
                    &raw,
                )?))
            }
            None => Ok(CompletionOutcome::Unknown(response.clone())),
        }
    }

    /// Combined status value, `None` when no completion was present.
    pub fn status(&self) -> Option<u16> {
        match self {
            CompletionOutcome::Completed(entry) => Some(entry.status()),
            CompletionOutcome::Unknown(_) => None,
        }
    }
}

/// Unframed response data bytes, if the response carried any.
pub fn response_data(response: &Value) -> Result<Option<Vec<u8>>, DecodeError> {
    match response.get("data").and_then(Value::as_str) {
        Some(text) => Ok(Some(frame::decode(text)?)),
        None => Ok(None),
    }
}

/// Render a binary dump, 16 bytes per row with an offset column and an
/// ASCII gutter.
pub fn hex_dump(data: &[u8]) -> String {
    let mut out = String::from("buffer:\t 0  1  2  3  4  5  6  7  8  9  10 11 12 13 14 15");
    let mut ascii = String::new();
    for (i, &b) in data.iter().enumerate() {
        if i % 16 == 0 {
            if !ascii.is_empty() {
                out.push('\t');
                out.push_str(&ascii);
                ascii.clear();
            }
            out.push_str(&format!("\n{i:04x}\t"));
        }
        out.push_str(&format!(" {b:02x}"));
        ascii.push(if (32..127).contains(&b) { b as char } else { '.' });
    }
    if !ascii.is_empty() {
        out.push('\t');
        out.push_str(&ascii);
    }
    out
}
