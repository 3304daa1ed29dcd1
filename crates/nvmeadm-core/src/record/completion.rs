//! Completion queue entry.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fmt;
use std::io::Cursor;

use super::{FixedRecord, LayoutError};

/// Completion queue entry (16 bytes).
///
/// The final dword is a bit-field: cid:16 | ptag:1 | sc:8 | sct:3 |
/// crd:2 | more:1 | dnr:1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletionEntry {
    pub cdw0: u32,
    pub cdw1: u32,
    /// SQ head pointer.
    pub sqhp: u16,
    /// SQ identifier.
    pub sqid: u16,
    /// Command identifier.
    pub cid: u16,
    /// Phase tag, 1 bit.
    pub ptag: u8,
    /// Status code.
    pub sc: u8,
    /// Status code type, 3 bits.
    pub sct: u8,
    /// Command retry delay, 2 bits.
    pub crd: u8,
    /// More status information available, 1 bit.
    pub more: u8,
    /// Do not retry, 1 bit.
    pub dnr: u8,
}

impl CompletionEntry {
    /// Combined status value, `(sct << 8) | sc`. Zero means success.
    pub fn status(&self) -> u16 {
        ((self.sct as u16) << 8) | self.sc as u16
    }

    /// One-line status summary as reported to the user.
    pub fn status_line(&self) -> String {
        format!(
            "NVMe status: NDR: {}, M: {}, CRD: {}, SCT: {}, SC:0x{:02x}",
            self.dnr, self.more, self.crd, self.sct, self.sc
        )
    }
}

impl FixedRecord for CompletionEntry {
    const SIZE: usize = 16;

    fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(Self::SIZE);
        buf.write_u32::<LittleEndian>(self.cdw0).unwrap();
        buf.write_u32::<LittleEndian>(self.cdw1).unwrap();
        buf.write_u16::<LittleEndian>(self.sqhp).unwrap();
        buf.write_u16::<LittleEndian>(self.sqid).unwrap();
        let dw3 = (self.cid as u32)
            | (((self.ptag & 0x1) as u32) << 16)
            | ((self.sc as u32) << 17)
            | (((self.sct & 0x7) as u32) << 25)
            | (((self.crd & 0x3) as u32) << 28)
            | (((self.more & 0x1) as u32) << 30)
            | (((self.dnr & 0x1) as u32) << 31);
        buf.write_u32::<LittleEndian>(dw3).unwrap();
        buf
    }

    fn from_bytes(data: &[u8]) -> Result<Self, LayoutError> {
        if data.len() < Self::SIZE {
            return Err(LayoutError::BufferTooSmall {
                expected: Self::SIZE,
                actual: data.len(),
            });
        }
        let mut cursor = Cursor::new(data);
        let cdw0 = cursor.read_u32::<LittleEndian>()?;
        let cdw1 = cursor.read_u32::<LittleEndian>()?;
        let sqhp = cursor.read_u16::<LittleEndian>()?;
        let sqid = cursor.read_u16::<LittleEndian>()?;
        let dw3 = cursor.read_u32::<LittleEndian>()?;
        Ok(Self {
            cdw0,
            cdw1,
            sqhp,
            sqid,
            cid: (dw3 & 0xFFFF) as u16,
            ptag: ((dw3 >> 16) & 0x1) as u8,
            sc: ((dw3 >> 17) & 0xFF) as u8,
            sct: ((dw3 >> 25) & 0x7) as u8,
            crd: ((dw3 >> 28) & 0x3) as u8,
            more: ((dw3 >> 30) & 0x1) as u8,
            dnr: ((dw3 >> 31) & 0x1) as u8,
        })
    }
}

impl fmt::Display for CompletionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Completion Queue Entry:")?;
        writeln!(f, "\tcdw0\t:0x{:x}", self.cdw0)?;
        writeln!(f, "\tcdw1\t:0x{:x}", self.cdw1)?;
        writeln!(f, "\tsqhp\t:0x{:x}", self.sqhp)?;
        writeln!(f, "\tsqid\t:0x{:x}", self.sqid)?;
        writeln!(f, "\tcid\t:0x{:x}", self.cid)?;
        writeln!(f, "\tptag\t:0x{:x}", self.ptag)?;
        writeln!(f, "\tsc\t:0x{:x}", self.sc)?;
        writeln!(f, "\tsct\t:0x{:x}", self.sct)?;
        writeln!(f, "\tcrd\t:0x{:x}", self.crd)?;
        writeln!(f, "\tmore\t:0x{:x}", self.more)?;
        write!(f, "\tdnr\t:0x{:x}", self.dnr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_size() {
        assert_eq!(CompletionEntry::default().to_bytes().len(), 16);
    }

    #[test]
    fn test_roundtrip() {
        let entry = CompletionEntry {
            cdw0: 0x01020304,
            cdw1: 0x05060708,
            sqhp: 0x1234,
            sqid: 0x5678,
            cid: 0x9ABC,
            ptag: 1,
            sc: 0x14,
            sct: 1,
            crd: 2,
            more: 1,
            dnr: 1,
        };
        let parsed = CompletionEntry::from_bytes(&entry.to_bytes()).unwrap();
        assert_eq!(parsed, entry);
    }

    #[test]
    fn test_status_combines_sct_and_sc() {
        let entry = CompletionEntry {
            sct: 1,
            sc: 0x14,
            ..Default::default()
        };
        assert_eq!(entry.status(), 0x114);
        assert_eq!(CompletionEntry::default().status(), 0);
    }

    #[test]
    fn test_status_dword_bit_positions() {
        let entry = CompletionEntry {
            cid: 0x0001,
            sc: 0xFF,
            sct: 0x7,
            dnr: 1,
            ..Default::default()
        };
        let bytes = entry.to_bytes();
        let dw3 = u32::from_le_bytes(bytes[12..16].try_into().unwrap());
        assert_eq!(dw3 & 0xFFFF, 0x0001);
        assert_eq!((dw3 >> 17) & 0xFF, 0xFF);
        assert_eq!((dw3 >> 25) & 0x7, 0x7);
        assert_eq!(dw3 >> 31, 1);
    }

    #[test]
    fn test_status_line_format() {
        let entry = CompletionEntry {
            sct: 1,
            sc: 0x6,
            ..Default::default()
        };
        assert_eq!(
            entry.status_line(),
            "NVMe status: NDR: 0, M: 0, CRD: 0, SCT: 1, SC:0x06"
        );
    }

    #[test]
    fn test_display_lists_every_field() {
        let entry = CompletionEntry {
            sqhp: 0x20,
            sct: 1,
            sc: 0x14,
            ..Default::default()
        };
        let rendered = entry.to_string();
        assert!(rendered.starts_with("Completion Queue Entry:"));
        assert!(rendered.contains("\tsqhp\t:0x20"));
        assert!(rendered.contains("\tsc\t:0x14"));
        assert!(rendered.contains("\tsct\t:0x1"));
        assert!(rendered.ends_with("\tdnr\t:0x0"));
    }
}
