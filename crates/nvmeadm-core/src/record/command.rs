//! Admin submission entry, command dword 0 through dword 15.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::Cursor;

use super::{FixedRecord, LayoutError};

/// Admin command (64 bytes).
///
/// The metadata and PRP pointers always travel as zero on this transport:
/// payloads move out-of-band in the RPC request, not through guest memory.
/// Sub-byte fields (`fuse`, `rsvd`, `psdt`) are masked to their declared
/// widths when packed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdminCommand {
    /// Opcode.
    pub opc: u8,
    /// Fused operation, 2 bits.
    pub fuse: u8,
    /// Reserved, 4 bits.
    pub rsvd: u8,
    /// PRP or SGL selector, 2 bits.
    pub psdt: u8,
    /// Command identifier.
    pub cid: u16,
    /// Namespace identifier.
    pub nsid: u32,
    pub cdw2: u32,
    pub cdw3: u32,
    /// Metadata pointer.
    pub mptr: u64,
    /// PRP entry 1.
    pub prp1: u64,
    /// PRP entry 2.
    pub prp2: u64,
    pub cdw10: u32,
    pub cdw11: u32,
    pub cdw12: u32,
    pub cdw13: u32,
    pub cdw14: u32,
    pub cdw15: u32,
}

impl AdminCommand {
    pub fn new(opc: u8) -> Self {
        Self {
            opc,
            ..Default::default()
        }
    }
}

impl FixedRecord for AdminCommand {
    const SIZE: usize = 64;

    fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(Self::SIZE);
        // Dword 0 low half: opc:8 | fuse:2 | rsvd:4 | psdt:2
        let dw0_low = (self.opc as u16)
            | (((self.fuse & 0x3) as u16) << 8)
            | (((self.rsvd & 0xF) as u16) << 10)
            | (((self.psdt & 0x3) as u16) << 14);
        buf.write_u16::<LittleEndian>(dw0_low).unwrap();
        buf.write_u16::<LittleEndian>(self.cid).unwrap();
        buf.write_u32::<LittleEndian>(self.nsid).unwrap();
        buf.write_u32::<LittleEndian>(self.cdw2).unwrap();
        buf.write_u32::<LittleEndian>(self.cdw3).unwrap();
        buf.write_u64::<LittleEndian>(self.mptr).unwrap();
        buf.write_u64::<LittleEndian>(self.prp1).unwrap();
        buf.write_u64::<LittleEndian>(self.prp2).unwrap();
        buf.write_u32::<LittleEndian>(self.cdw10).unwrap();
        buf.write_u32::<LittleEndian>(self.cdw11).unwrap();
        buf.write_u32::<LittleEndian>(self.cdw12).unwrap();
        buf.write_u32::<LittleEndian>(self.cdw13).unwrap();
        buf.write_u32::<LittleEndian>(self.cdw14).unwrap();
        buf.write_u32::<LittleEndian>(self.cdw15).unwrap();
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
        let dw0_low = cursor.read_u16::<LittleEndian>()?;
        Ok(Self {
            opc: (dw0_low & 0xFF) as u8,
            fuse: ((dw0_low >> 8) & 0x3) as u8,
            rsvd: ((dw0_low >> 10) & 0xF) as u8,
            psdt: ((dw0_low >> 14) & 0x3) as u8,
            cid: cursor.read_u16::<LittleEndian>()?,
            nsid: cursor.read_u32::<LittleEndian>()?,
            cdw2: cursor.read_u32::<LittleEndian>()?,
            cdw3: cursor.read_u32::<LittleEndian>()?,
            mptr: cursor.read_u64::<LittleEndian>()?,
            prp1: cursor.read_u64::<LittleEndian>()?,
            prp2: cursor.read_u64::<LittleEndian>()?,
            cdw10: cursor.read_u32::<LittleEndian>()?,
            cdw11: cursor.read_u32::<LittleEndian>()?,
            cdw12: cursor.read_u32::<LittleEndian>()?,
            cdw13: cursor.read_u32::<LittleEndian>()?,
            cdw14: cursor.read_u32::<LittleEndian>()?,
            cdw15: cursor.read_u32::<LittleEndian>()?,
        })
    }
}
