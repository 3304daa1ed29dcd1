//! Firmware Slot Information log page.

use std::fmt;

use super::{FixedRecord, LayoutError};

/// Number of firmware revision slots in the log page.
pub const SLOT_COUNT: usize = 7;

/// Firmware Slot Information log page (512 bytes).
///
/// Byte 0 is the Active Firmware Info byte, bytes 8..64 hold seven
/// 8-byte ASCII revision strings, the rest is reserved.
#[derive(Clone, PartialEq, Eq)]
pub struct FirmwareSlotInfo {
    /// Active Firmware Info.
    pub afi: u8,
    rsvd: [u8; 7],
    /// Revision strings frs1..frs7.
    pub frs: [[u8; 8]; SLOT_COUNT],
    rsvd1: [u8; 448],
}

impl Default for FirmwareSlotInfo {
    fn default() -> Self {
        Self {
            afi: 0,
            rsvd: [0; 7],
            frs: [[0; 8]; SLOT_COUNT],
            rsvd1: [0; 448],
        }
    }
}

impl FirmwareSlotInfo {
    /// Revision string for slot 1..=7, trimmed of trailing NULs and
    /// spaces. `None` for an out-of-range slot or an empty entry.
    pub fn revision(&self, slot: usize) -> Option<String> {
        if slot == 0 || slot > SLOT_COUNT {
            return None;
        }
        let raw = &self.frs[slot - 1];
        let text: String = raw
            .iter()
            .map(|&b| if (32..127).contains(&b) { b as char } else { '.' })
            .collect();
        let trimmed = text.trim_end_matches(['.', ' ']).to_string();
        if trimmed.is_empty() { None } else { Some(trimmed) }
    }

    /// Firmware slot currently active, from the AFI byte.
    pub fn active_slot(&self) -> u8 {
        self.afi & 0x7
    }

    /// Firmware slot that becomes active at the next reset, if reported.
    pub fn next_active_slot(&self) -> u8 {
        (self.afi >> 4) & 0x7
    }
}

impl FixedRecord for FirmwareSlotInfo {
    const SIZE: usize = 512;

    fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(Self::SIZE);
        buf.push(self.afi);
        buf.extend_from_slice(&self.rsvd);
        for slot in &self.frs {
            buf.extend_from_slice(slot);
        }
        buf.extend_from_slice(&self.rsvd1);
        buf
    }

    fn from_bytes(data: &[u8]) -> Result<Self, LayoutError> {
        if data.len() < Self::SIZE {
            return Err(LayoutError::BufferTooSmall {
                expected: Self::SIZE,
                actual: data.len(),
            });
        }
        let mut info = Self {
            afi: data[0],
            ..Default::default()
        };
        info.rsvd.copy_from_slice(&data[1..8]);
        for (i, slot) in info.frs.iter_mut().enumerate() {
            let start = 8 + i * 8;
            slot.copy_from_slice(&data[start..start + 8]);
        }
        info.rsvd1.copy_from_slice(&data[64..512]);
        Ok(info)
    }
}

impl fmt::Debug for FirmwareSlotInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirmwareSlotInfo")
            .field("afi", &format_args!("0x{:02x}", self.afi))
            .field("frs", &self.frs)
            .finish()
    }
}

impl fmt::Display for FirmwareSlotInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Firmware Slot Information Log Page:")?;
        write!(f, "\nafi\t: 0x{:x}", self.afi)?;
        for (i, slot) in self.frs.iter().enumerate() {
            if slot.iter().all(|&b| b == 0) {
                continue;
            }
            write!(f, "\nfrs{}\t: 0x", i + 1)?;
            for b in slot.iter().rev() {
                write!(f, "{b:02x}")?;
            }
            let text: String = slot
                .iter()
                .map(|&b| if (32..127).contains(&b) { b as char } else { '.' })
                .collect();
            write!(f, " ({text})")?;
        }
        Ok(())
    }
}
