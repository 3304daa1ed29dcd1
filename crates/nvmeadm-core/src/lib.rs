//! nvmeadm-core: NVMe admin-command framing and firmware-update client.
//!
//! This crate builds raw admin commands for a block-storage controller,
//! frames them as text-safe payloads, submits them over a JSON-RPC
//! channel to the daemon that owns the controller, and decodes the
//! returned completions. On top of the passthrough path it implements
//! the multi-chunk firmware download flow, firmware commit status
//! classification, and the firmware slot information query.
//!
//! # Architecture
//!
//! The crate is organized into layers:
//!
//! - **Record**: fixed-layout binary structures (command, completion,
//!   firmware slot log page)
//! - **Frame**: URL-safe text framing for transport inside JSON strings
//! - **Channel**: command channel abstraction (unix socket, mock)
//! - **Admin**: passthrough request assembly and dispatch
//! - **Completion**: status extraction and response data rendering
//! - **Firmware**: chunked download engine, commit, slot information
//!
//! # Example
//!
//! ```no_run
//! use nvmeadm_core::{FirmwareDownload, UnixChannel};
//!
//! let channel = UnixChannel::connect("/var/tmp/nvmeadm.sock", None).expect("connect");
//! let mut download = FirmwareDownload::new(&channel, "Nvme0");
//! download.run_file("firmware.bin").expect("download failed");
//! ```

pub mod admin;
pub mod channel;
pub mod completion;
pub mod config;
pub mod firmware;
pub mod frame;
pub mod record;

// Re-exports for convenience
pub use admin::{AdminError, AdminPassthru, Direction, PayloadSource};
pub use channel::{ChannelError, MockChannel, RpcChannel, UnixChannel};
pub use completion::{CompletionOutcome, DecodeError, hex_dump, response_data};
pub use config::RpcConfig;
pub use firmware::{
    ChunkPlan, CommitStatus, DownloadOutcome, DownloadState, FirmwareDownload, FirmwareError,
    TransferChunk, firmware_commit, firmware_slot_info,
};
pub use frame::FramingError;
pub use record::{AdminCommand, CompletionEntry, FirmwareSlotInfo, FixedRecord, LayoutError};
