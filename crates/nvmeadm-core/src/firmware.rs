//! Firmware update flows: image download, commit, slot information.

use std::fmt;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::admin::{AdminError, AdminPassthru, Direction, PayloadSource};
use crate::channel::RpcChannel;
use crate::completion::{self, CompletionOutcome, DecodeError};
use crate::record::{FirmwareSlotInfo, FixedRecord};

/// Get Log Page.
pub const OPC_GET_LOG_PAGE: u8 = 0x02;
/// Firmware Commit.
pub const OPC_FIRMWARE_COMMIT: u8 = 0x10;
/// Firmware Image Download.
pub const OPC_FIRMWARE_DOWNLOAD: u8 = 0x11;

/// Log page id: Firmware Slot Information.
pub const LID_FIRMWARE_SLOT: u8 = 0x03;

/// Transfer granularity; every offset and length is a whole number of
/// dwords.
pub const DWORD_SIZE: usize = 4;

/// Default per-command transfer size in bytes. Sizes above 8192 tend to
/// exceed what the RPC server accepts in a single request.
pub const DEFAULT_XFER: usize = 4096;

#[derive(Error, Debug)]
pub enum FirmwareError {
    #[error("transfer size {0} is not a positive multiple of 4 bytes")]
    ChunkSize(usize),

    #[error("{what} {value} is not dword aligned")]
    Alignment { what: &'static str, value: usize },

    #[error("failed to read firmware image {path}: {source}")]
    ImageRead {
        path: String,
        source: std::io::Error,
    },

    #[error("command failed with status 0x{status:x}")]
    Status { status: u16 },

    #[error("response carried no completion entry: {0}")]
    NoCompletion(Value),

    #[error("response carried no data")]
    MissingData,

    #[error(transparent)]
    Admin(#[from] AdminError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

// ============================================================================
// Download chunking
// ============================================================================

/// One bounded transfer of the firmware image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferChunk {
    /// Byte offset into the image.
    pub offset: usize,
    /// Byte length, always a whole number of dwords.
    pub len: usize,
}

impl TransferChunk {
    /// Dword count of this transfer.
    pub fn dwords(&self) -> u32 {
        (self.len / DWORD_SIZE) as u32
    }

    /// 0's-based dword count for cdw10.
    pub fn numd(&self) -> u32 {
        self.dwords() - 1
    }

    /// Dword offset for cdw11, including the caller's starting byte
    /// offset within the firmware slot.
    pub fn ofst(&self, base: usize) -> u32 {
        ((self.offset + base) / DWORD_SIZE) as u32
    }
}

/// Chunk schedule for an image: bounded lengths, dword aligned, back to
/// back.
///
/// Sub-dword transfer sizes and misaligned image lengths are rejected up
/// front; a floored tail smaller than one dword could otherwise never
/// drain the remainder.
#[derive(Debug, Clone)]
pub struct ChunkPlan {
    total: usize,
    xfer: usize,
    offset: usize,
}

impl ChunkPlan {
    pub fn new(total: usize, xfer: usize) -> Result<Self, FirmwareError> {
        if xfer < DWORD_SIZE || xfer % DWORD_SIZE != 0 {
            return Err(FirmwareError::ChunkSize(xfer));
        }
        if total % DWORD_SIZE != 0 {
            return Err(FirmwareError::Alignment {
                what: "image length",
                value: total,
            });
        }
        Ok(Self {
            total,
            xfer,
            offset: 0,
        })
    }

    /// Bytes not yet scheduled.
    pub fn remaining(&self) -> usize {
        self.total - self.offset
    }
}

impl Iterator for ChunkPlan {
    type Item = TransferChunk;

    fn next(&mut self) -> Option<TransferChunk> {
        if self.offset >= self.total {
            return None;
        }
        let len = self.remaining().min(self.xfer) / DWORD_SIZE * DWORD_SIZE;
        if len == 0 {
            return None;
        }
        let chunk = TransferChunk {
            offset: self.offset,
            len,
        };
        self.offset += len;
        Some(chunk)
    }
}

// ============================================================================
// Download engine
// ============================================================================

/// Download progress states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DownloadState {
    /// No chunk sent yet.
    #[default]
    Pending,
    /// Chunks in flight.
    Transmitting,
    /// Whole image acknowledged.
    Done,
    /// A chunk failed; the transfer is over.
    Aborted,
}

impl fmt::Display for DownloadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadState::Pending => write!(f, "PENDING"),
            DownloadState::Transmitting => write!(f, "TRANSMITTING"),
            DownloadState::Done => write!(f, "DONE"),
            DownloadState::Aborted => write!(f, "ABORTED"),
        }
    }
}

/// Terminal result of a download attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Whole image transferred and acknowledged.
    Success { chunks: usize, bytes: usize },
    /// Controller reported Overlapping Range (sct 1, sc 0x14).
    OverlappingRange { offset: usize },
    /// Some other non-zero status.
    Failed { status: u16, offset: usize },
    /// A response carried no completion entry.
    NoCompletion { offset: usize },
}

impl DownloadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DownloadOutcome::Success { .. })
    }
}

/// Chunked firmware image upload.
///
/// Chunks go out strictly sequentially, one blocking round trip each.
/// Any non-zero completion status aborts the transfer; aborts are
/// terminal, the caller restarts with an adjusted offset if it wants to
/// resume.
pub struct FirmwareDownload<'a, C: RpcChannel + ?Sized> {
    channel: &'a C,
    name: String,
    /// Per-command transfer limit in bytes.
    pub xfer: usize,
    /// Starting byte offset within the firmware slot, for multi-image
    /// layouts.
    pub base_offset: usize,
    state: DownloadState,
}

impl<'a, C: RpcChannel + ?Sized> FirmwareDownload<'a, C> {
    pub fn new(channel: &'a C, name: &str) -> Self {
        Self {
            channel,
            name: name.to_string(),
            xfer: DEFAULT_XFER,
            base_offset: 0,
            state: DownloadState::Pending,
        }
    }

    pub fn state(&self) -> DownloadState {
        self.state
    }

    /// Read the image from `path` and transfer it.
    pub fn run_file(&mut self, path: &str) -> Result<DownloadOutcome, FirmwareError> {
        let image = std::fs::read(path).map_err(|source| FirmwareError::ImageRead {
            path: path.to_string(),
            source,
        })?;
        info!(path, bytes = image.len(), "firmware image loaded");
        self.run(&image)
    }

    /// Transfer `image` chunk by chunk.
    pub fn run(&mut self, image: &[u8]) -> Result<DownloadOutcome, FirmwareError> {
        if self.base_offset % DWORD_SIZE != 0 {
            return Err(FirmwareError::Alignment {
                what: "starting offset",
                value: self.base_offset,
            });
        }
        let plan = ChunkPlan::new(image.len(), self.xfer)?;
        self.state = DownloadState::Transmitting;

        let mut chunks = 0usize;
        for chunk in plan {
            match self.send_chunk(image, chunk)? {
                CompletionOutcome::Completed(entry) if entry.status() == 0 => {
                    chunks += 1;
                }
                CompletionOutcome::Completed(entry) => {
                    self.state = DownloadState::Aborted;
                    if entry.sct == 0x01 && entry.sc == 0x14 {
                        warn!(offset = chunk.offset, "firmware download error: Overlapping Range");
                        return Ok(DownloadOutcome::OverlappingRange {
                            offset: chunk.offset,
                        });
                    }
                    warn!(
                        status = format_args!("0x{:x}", entry.status()),
                        offset = chunk.offset,
                        "firmware download aborted"
                    );
                    return Ok(DownloadOutcome::Failed {
                        status: entry.status(),
                        offset: chunk.offset,
                    });
                }
                CompletionOutcome::Unknown(raw) => {
                    self.state = DownloadState::Aborted;
                    warn!(response = %raw, "unknown error: response carried no completion");
                    return Ok(DownloadOutcome::NoCompletion {
                        offset: chunk.offset,
                    });
                }
            }
        }

        self.state = DownloadState::Done;
        info!(chunks, bytes = image.len(), "firmware download complete");
        Ok(DownloadOutcome::Success {
            chunks,
            bytes: image.len(),
        })
    }

    fn send_chunk(
        &self,
        image: &[u8],
        chunk: TransferChunk,
    ) -> Result<CompletionOutcome, FirmwareError> {
        let mut cmd = AdminPassthru::new(&self.name, OPC_FIRMWARE_DOWNLOAD);
        cmd.direction = Direction::H2c;
        cmd.cdw10 = chunk.numd();
        cmd.cdw11 = chunk.ofst(self.base_offset);
        cmd.data = Some(PayloadSource::Bytes(
            image[chunk.offset..chunk.offset + chunk.len].to_vec(),
        ));
        cmd.data_len = Some(chunk.len as u32);
        debug!(
            offset = chunk.offset,
            len = chunk.len,
            numd = cmd.cdw10,
            ofst = cmd.cdw11,
            "sending firmware chunk"
        );
        let response = cmd.submit(self.channel)?;
        Ok(CompletionOutcome::from_response(&response)?)
    }
}

// ============================================================================
// Commit
// ============================================================================

/// Classified firmware-commit completion status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitStatus {
    Success,
    InvalidSlot,
    InvalidImage,
    NeedsConventionalReset,
    NeedsSubsystemReset,
    NeedsControllerReset,
    MaxTimeViolation,
    ActivationProhibited,
    OverlappingRange,
    BootPartitionWriteProhibited,
    /// Undocumented pair; carries the combined status value.
    Unknown(u16),
}

impl CommitStatus {
    /// Map an (sct, sc) pair to its documented outcome.
    pub fn classify(sct: u8, sc: u8) -> Self {
        match (sct, sc) {
            (0, 0x00) => CommitStatus::Success,
            (1, 0x06) => CommitStatus::InvalidSlot,
            (1, 0x07) => CommitStatus::InvalidImage,
            (1, 0x0B) => CommitStatus::NeedsConventionalReset,
            (1, 0x10) => CommitStatus::NeedsSubsystemReset,
            (1, 0x11) => CommitStatus::NeedsControllerReset,
            (1, 0x12) => CommitStatus::MaxTimeViolation,
            (1, 0x13) => CommitStatus::ActivationProhibited,
            (1, 0x14) => CommitStatus::OverlappingRange,
            (1, 0x1E) => CommitStatus::BootPartitionWriteProhibited,
            _ => CommitStatus::Unknown(((sct as u16) << 8) | sc as u16),
        }
    }

    /// Whether the commit took effect, possibly pending a reset.
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            CommitStatus::Success
                | CommitStatus::NeedsConventionalReset
                | CommitStatus::NeedsSubsystemReset
                | CommitStatus::NeedsControllerReset
        )
    }
}

impl fmt::Display for CommitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitStatus::Success => write!(f, "success"),
            CommitStatus::InvalidSlot => write!(f, "invalid firmware slot"),
            CommitStatus::InvalidImage => write!(f, "invalid firmware image"),
            CommitStatus::NeedsConventionalReset => {
                write!(f, "success, but activation requires conventional reset")
            }
            CommitStatus::NeedsSubsystemReset => {
                write!(f, "success, but activation requires nvm subsystem reset")
            }
            CommitStatus::NeedsControllerReset => {
                write!(f, "success, but activation requires controller level reset")
            }
            CommitStatus::MaxTimeViolation => {
                write!(f, "firmware activation requires maximum time violation")
            }
            CommitStatus::ActivationProhibited => write!(f, "firmware activation prohibited"),
            CommitStatus::OverlappingRange => write!(f, "overlapping range"),
            CommitStatus::BootPartitionWriteProhibited => {
                write!(f, "boot partition write prohibited")
            }
            CommitStatus::Unknown(status) => write!(f, "unknown status 0x{status:x}"),
        }
    }
}

/// cdw10 for a commit: bpid:1 at bit 31, commit action:3 at bit 3,
/// firmware slot:3 at bit 0.
pub fn commit_cdw10(action: u8, slot: u8, bpid: u8) -> u32 {
    (((bpid & 0x1) as u32) << 31) | (((action & 0x7) as u32) << 3) | (slot & 0x7) as u32
}

/// Issue a Firmware Commit and classify the result.
pub fn firmware_commit<C: RpcChannel + ?Sized>(
    channel: &C,
    name: &str,
    action: u8,
    slot: u8,
    bpid: u8,
) -> Result<CommitStatus, FirmwareError> {
    let mut cmd = AdminPassthru::new(name, OPC_FIRMWARE_COMMIT);
    cmd.cdw10 = commit_cdw10(action, slot, bpid);
    let response = cmd.submit(channel)?;
    match CompletionOutcome::from_response(&response)? {
        CompletionOutcome::Completed(entry) => {
            let status = CommitStatus::classify(entry.sct, entry.sc);
            info!(action, slot, %status, "firmware commit");
            Ok(status)
        }
        CompletionOutcome::Unknown(raw) => Err(FirmwareError::NoCompletion(raw)),
    }
}

// ============================================================================
// Slot information
// ============================================================================

/// Query the Firmware Slot Information log page (LID 0x03).
pub fn firmware_slot_info<C: RpcChannel + ?Sized>(
    channel: &C,
    name: &str,
) -> Result<FirmwareSlotInfo, FirmwareError> {
    let data_len = FirmwareSlotInfo::SIZE as u32;
    let numd = (data_len / DWORD_SIZE as u32) - 1;
    let mut cmd = AdminPassthru::new(name, OPC_GET_LOG_PAGE);
    cmd.cdw10 = ((numd & 0xFFFF) << 16) | LID_FIRMWARE_SLOT as u32;
    cmd.data_len = Some(data_len);
    let response = cmd.submit(channel)?;
    match CompletionOutcome::from_response(&response)? {
        CompletionOutcome::Completed(entry) if entry.status() == 0 => {
            let data = completion::response_data(&response)?.ok_or(FirmwareError::MissingData)?;
            let info = FirmwareSlotInfo::from_bytes(&data)
                .map_err(|e| FirmwareError::Decode(DecodeError::Layout(e)))?;
            debug!(afi = format_args!("0x{:02x}", info.afi), "firmware slot info");
            Ok(info)
        }
        CompletionOutcome::Completed(entry) => Err(FirmwareError::Status {
            status: entry.status(),
        }),
        CompletionOutcome::Unknown(raw) => Err(FirmwareError::NoCompletion(raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::MockChannel;
    use crate::frame;
    use crate::record::AdminCommand;
    use serde_json::json;

    fn sent_command(params: &Value) -> AdminCommand {
        let raw = frame::decode(params["cmdbuf"].as_str().unwrap()).unwrap();
        AdminCommand::from_bytes(&raw).unwrap()
    }

    #[test]
    fn test_chunk_plan_10000_bytes_default_xfer() {
        let chunks: Vec<TransferChunk> = ChunkPlan::new(10000, DEFAULT_XFER).unwrap().collect();
        assert_eq!(
            chunks,
            vec![
                TransferChunk { offset: 0, len: 4096 },
                TransferChunk { offset: 4096, len: 4096 },
                TransferChunk { offset: 8192, len: 1808 },
            ]
        );
        assert_eq!(chunks.iter().map(|c| c.len).sum::<usize>(), 10000);
        assert!(chunks.iter().all(|c| c.len % DWORD_SIZE == 0));
        assert_eq!(chunks[0].numd(), 1023);
        assert_eq!(chunks[2].numd(), 451);
        assert_eq!(chunks[1].ofst(0), 1024);
        assert_eq!(chunks[2].ofst(0), 2048);
        // A caller-supplied base offset shifts every dword offset.
        assert_eq!(chunks[0].ofst(0x1000), 1024);
    }

    #[test]
    fn test_chunk_plan_exact_multiple() {
        let chunks: Vec<TransferChunk> = ChunkPlan::new(8192, 4096).unwrap().collect();
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.len == 4096));
    }

    #[test]
    fn test_chunk_plan_empty_image() {
        assert_eq!(ChunkPlan::new(0, 4096).unwrap().count(), 0);
    }

    #[test]
    fn test_chunk_plan_rejects_bad_sizes() {
        assert!(matches!(
            ChunkPlan::new(4096, 0),
            Err(FirmwareError::ChunkSize(0))
        ));
        assert!(matches!(
            ChunkPlan::new(4096, 2),
            Err(FirmwareError::ChunkSize(2))
        ));
        assert!(matches!(
            ChunkPlan::new(4096, 4098),
            Err(FirmwareError::ChunkSize(4098))
        ));
        assert!(matches!(
            ChunkPlan::new(10001, 4096),
            Err(FirmwareError::Alignment { .. })
        ));
    }

    #[test]
    fn test_download_success() {
        let mock = MockChannel::new();
        mock.queue_status(0, 0);
        mock.queue_status(0, 0);
        mock.queue_status(0, 0);

        let image = vec![0x5A; 10000];
        let mut dl = FirmwareDownload::new(&mock, "Nvme0");
        let outcome = dl.run(&image).unwrap();
        assert_eq!(
            outcome,
            DownloadOutcome::Success {
                chunks: 3,
                bytes: 10000
            }
        );
        assert_eq!(dl.state(), DownloadState::Done);

        let calls = mock.calls();
        assert_eq!(calls.len(), 3);
        for (i, (method, params)) in calls.iter().enumerate() {
            assert_eq!(method, "bdev_nvme_send_cmd");
            assert_eq!(params["data_direction"], "h2c");
            let cmd = sent_command(params);
            assert_eq!(cmd.opc, OPC_FIRMWARE_DOWNLOAD);
            assert_eq!(cmd.cdw11 as usize, i * 4096 / DWORD_SIZE);
        }
        let last = sent_command(&calls[2].1);
        assert_eq!(last.cdw10, 451);
        assert_eq!(calls[2].1["data_len"], 1808);
        let payload = frame::decode(calls[2].1["data"].as_str().unwrap()).unwrap();
        assert_eq!(payload.len(), 1808);
    }

    #[test]
    fn test_download_base_offset_shifts_ofst() {
        let mock = MockChannel::new();
        mock.queue_status(0, 0);

        let mut dl = FirmwareDownload::new(&mock, "Nvme0");
        dl.base_offset = 8192;
        dl.run(&vec![0u8; 512]).unwrap();

        let cmd = sent_command(&mock.calls()[0].1);
        assert_eq!(cmd.cdw11, 2048);
    }

    #[test]
    fn test_download_overlapping_range_aborts() {
        let mock = MockChannel::new();
        mock.queue_status(0, 0);
        mock.queue_status(1, 0x14);
        // A third response queued to prove no further chunk goes out.
        mock.queue_status(0, 0);

        let image = vec![0; 10000];
        let mut dl = FirmwareDownload::new(&mock, "Nvme0");
        let outcome = dl.run(&image).unwrap();
        assert_eq!(outcome, DownloadOutcome::OverlappingRange { offset: 4096 });
        assert_eq!(dl.state(), DownloadState::Aborted);
        assert_eq!(mock.calls().len(), 2);
    }

    #[test]
    fn test_download_generic_failure_aborts() {
        let mock = MockChannel::new();
        mock.queue_status(2, 0x05);

        let mut dl = FirmwareDownload::new(&mock, "Nvme0");
        let outcome = dl.run(&vec![0; 4096]).unwrap();
        assert_eq!(
            outcome,
            DownloadOutcome::Failed {
                status: 0x205,
                offset: 0
            }
        );
        assert_eq!(dl.state(), DownloadState::Aborted);
    }

    #[test]
    fn test_download_missing_completion_aborts() {
        let mock = MockChannel::new();
        mock.queue_response(json!({"echo": "nope"}));

        let mut dl = FirmwareDownload::new(&mock, "Nvme0");
        let outcome = dl.run(&vec![0; 4096]).unwrap();
        assert_eq!(outcome, DownloadOutcome::NoCompletion { offset: 0 });
        assert_eq!(dl.state(), DownloadState::Aborted);
    }

    #[test]
    fn test_download_rejects_misaligned_offset() {
        let mock = MockChannel::new();
        let mut dl = FirmwareDownload::new(&mock, "Nvme0");
        dl.base_offset = 6;
        assert!(matches!(
            dl.run(&[0; 8]),
            Err(FirmwareError::Alignment { .. })
        ));
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn test_commit_status_table() {
        let table = [
            ((0, 0x00), CommitStatus::Success),
            ((1, 0x06), CommitStatus::InvalidSlot),
            ((1, 0x07), CommitStatus::InvalidImage),
            ((1, 0x0B), CommitStatus::NeedsConventionalReset),
            ((1, 0x10), CommitStatus::NeedsSubsystemReset),
            ((1, 0x11), CommitStatus::NeedsControllerReset),
            ((1, 0x12), CommitStatus::MaxTimeViolation),
            ((1, 0x13), CommitStatus::ActivationProhibited),
            ((1, 0x14), CommitStatus::OverlappingRange),
            ((1, 0x1E), CommitStatus::BootPartitionWriteProhibited),
        ];
        for ((sct, sc), expected) in table {
            assert_eq!(CommitStatus::classify(sct, sc), expected);
        }
        assert_eq!(CommitStatus::classify(2, 0x05), CommitStatus::Unknown(0x205));
        assert_eq!(CommitStatus::classify(0, 0x01), CommitStatus::Unknown(0x001));
        assert_eq!(
            CommitStatus::Unknown(0x205).to_string(),
            "unknown status 0x205"
        );
    }

    #[test]
    fn test_commit_success_classes() {
        assert!(CommitStatus::Success.is_success());
        assert!(CommitStatus::NeedsControllerReset.is_success());
        assert!(!CommitStatus::InvalidSlot.is_success());
        assert!(!CommitStatus::Unknown(0x205).is_success());
    }

    #[test]
    fn test_commit_cdw10_encoding() {
        assert_eq!(commit_cdw10(3, 2, 1), (1 << 31) | (3 << 3) | 2);
        // Out-of-range inputs are masked to their field widths.
        assert_eq!(commit_cdw10(0xFF, 0xFF, 0xFF), (1 << 31) | (7 << 3) | 7);
    }

    #[test]
    fn test_firmware_commit_roundtrip() {
        let mock = MockChannel::new();
        mock.queue_status(1, 0x0B);

        let status = firmware_commit(&mock, "Nvme0", 2, 1, 0).unwrap();
        assert_eq!(status, CommitStatus::NeedsConventionalReset);

        let (method, params) = &mock.calls()[0];
        assert_eq!(method, "bdev_nvme_send_cmd");
        let cmd = sent_command(params);
        assert_eq!(cmd.opc, OPC_FIRMWARE_COMMIT);
        assert_eq!(cmd.cdw10, (2 << 3) | 1);
    }

    #[test]
    fn test_firmware_commit_without_completion() {
        let mock = MockChannel::new();
        mock.queue_response(json!({}));
        assert!(matches!(
            firmware_commit(&mock, "Nvme0", 0, 0, 0),
            Err(FirmwareError::NoCompletion(_))
        ));
    }

    #[test]
    fn test_firmware_slot_info_query() {
        let mut page = FirmwareSlotInfo::default();
        page.afi = 0x01;
        page.frs[0].copy_from_slice(b"FW1.0   ");

        let mock = MockChannel::new();
        mock.queue_response(json!({
            "cpl": frame::encode(&crate::record::CompletionEntry::default().to_bytes()),
            "data": frame::encode(&page.to_bytes()),
        }));

        let info = firmware_slot_info(&mock, "Nvme0").unwrap();
        assert_eq!(info.revision(1).as_deref(), Some("FW1.0"));

        let (_, params) = &mock.calls()[0];
        let cmd = sent_command(params);
        assert_eq!(cmd.opc, OPC_GET_LOG_PAGE);
        // numd = 512/4 - 1 in the high half, log page id in the low byte.
        assert_eq!(cmd.cdw10, (127 << 16) | 0x03);
        assert_eq!(params["data_len"], 512);
        assert_eq!(params["data_direction"], "c2h");
    }

    #[test]
    fn test_firmware_slot_info_nonzero_status() {
        let mock = MockChannel::new();
        mock.queue_status(1, 0x09);
        assert!(matches!(
            firmware_slot_info(&mock, "Nvme0"),
            Err(FirmwareError::Status { status: 0x109 })
        ));
    }
}
