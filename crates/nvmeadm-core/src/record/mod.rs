//! Fixed-layout binary records exchanged with the controller.
//!
//! Every record here has a normative byte-for-byte layout: little-endian
//! fields, no implicit padding, bit-fields packed by hand with shift and
//! mask rather than compiler bit-field layout. The [`FixedRecord`] trait
//! carries the exact-size pack/parse pair plus the raw-buffer edits used
//! when a response hands back a partial buffer.

pub mod command;
pub mod completion;
pub mod fw_log;

pub use command::AdminCommand;
pub use completion::CompletionEntry;
pub use fw_log::FirmwareSlotInfo;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("offset {offset} out of range for {size}-byte record")]
    Offset { offset: usize, size: usize },

    #[error("{len} source bytes exceed the {room} bytes available at offset {offset}")]
    Overrun {
        offset: usize,
        len: usize,
        room: usize,
    },

    #[error("buffer too small: expected {expected}, got {actual}")]
    BufferTooSmall { expected: usize, actual: usize },

    #[error("margin {margin} leaves no bytes past offset {offset}")]
    Margin { offset: usize, margin: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A record with a fixed serialized size.
///
/// `to_bytes` is deterministic: the same field values always produce the
/// same buffer, and the buffer length is exactly [`FixedRecord::SIZE`].
pub trait FixedRecord: Sized {
    const SIZE: usize;

    /// Serialize to exactly `SIZE` bytes.
    fn to_bytes(&self) -> Vec<u8>;

    /// Parse from a buffer holding at least `SIZE` bytes.
    fn from_bytes(data: &[u8]) -> Result<Self, LayoutError>;

    /// Overwrite up to `len` bytes of the serialized form at `offset`
    /// with `src`, then re-parse.
    ///
    /// The write window is clipped to the record end; a source longer
    /// than the clipped window is an error, never a silent extension.
    fn splice(&mut self, offset: usize, len: usize, src: &[u8]) -> Result<(), LayoutError> {
        if offset >= Self::SIZE {
            return Err(LayoutError::Offset {
                offset,
                size: Self::SIZE,
            });
        }
        let room = len.min(Self::SIZE - offset);
        if src.len() > room {
            return Err(LayoutError::Overrun {
                offset,
                len: src.len(),
                room,
            });
        }
        let mut raw = self.to_bytes();
        raw[offset..offset + src.len()].copy_from_slice(src);
        *self = Self::from_bytes(&raw)?;
        Ok(())
    }

    /// Serialized bytes from `offset`, excluding the trailing `margin`
    /// bytes.
    ///
    /// The margin form exists for text-bearing tails where a terminator
    /// must stay out of the extracted slice.
    fn bytes_at(&self, offset: usize, margin: usize) -> Result<Vec<u8>, LayoutError> {
        if offset >= Self::SIZE {
            return Err(LayoutError::Offset {
                offset,
                size: Self::SIZE,
            });
        }
        if margin >= Self::SIZE - offset {
            return Err(LayoutError::Margin { offset, margin });
        }
        let raw = self.to_bytes();
        Ok(raw[offset..Self::SIZE - margin].to_vec())
    }
}
