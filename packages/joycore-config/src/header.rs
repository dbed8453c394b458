use core::ops::Range;

use alloc::string::String;
use thiserror::Error;

use crate::{
    decode::{Decode, DecodeError, take},
    encode::Encode,
};

/// Magic number at the start of every stored config ("JOYC" read as a
/// little-endian `u32`).
pub const CONFIG_MAGIC: u32 = 0x4A4F_5943;

/// Config layout version written by current firmware.
pub const CONFIG_VERSION: u16 = 7;

/// Byte range of the checksum field within the header.
pub(crate) const CHECKSUM_FIELD: Range<usize> = 8..12;

/// The 16 byte header at the start of a config blob.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ConfigHeader {
    pub magic: u32,
    pub version: u16,
    /// Total blob size as declared by the writer. Never trusted by the decoder.
    pub size: u16,
    pub checksum: u32,
    pub reserved: [u8; 4],
}

impl ConfigHeader {
    pub const SIZE: usize = 16;

    /// A header for a blob of `size` bytes. The checksum is left at zero.
    pub const fn new(size: u16) -> Self {
        Self {
            magic: CONFIG_MAGIC,
            version: CONFIG_VERSION,
            size,
            checksum: 0,
            reserved: [0; 4],
        }
    }

    /// The magic number's bytes in storage order, each shown as a character.
    ///
    /// A valid header reads `"CYOJ"`.
    pub fn magic_str(&self) -> String {
        self.magic.to_le_bytes().iter().map(|&b| char::from(b)).collect()
    }

    /// Checks the magic number.
    ///
    /// # Errors
    ///
    /// Returns [`MagicMismatch`] carrying the value that was found.
    pub const fn check_magic(&self) -> Result<(), MagicMismatch> {
        if self.magic == CONFIG_MAGIC {
            Ok(())
        } else {
            Err(MagicMismatch { found: self.magic })
        }
    }
}

impl Encode for ConfigHeader {
    fn size(&self) -> usize {
        Self::SIZE
    }

    fn encode(&self, data: &mut [u8]) {
        self.magic.encode(data);
        self.version.encode(&mut data[4..]);
        self.size.encode(&mut data[6..]);
        self.checksum.encode(&mut data[CHECKSUM_FIELD]);
        self.reserved.encode(&mut data[12..]);
    }
}

impl Decode for ConfigHeader {
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
        let data = &mut take::<Self>(data, Self::SIZE)?;

        Ok(Self {
            magic: u32::decode(data)?,
            version: u16::decode(data)?,
            size: u16::decode(data)?,
            checksum: u32::decode(data)?,
            reserved: Decode::decode(data)?,
        })
    }
}

/// The header's magic number is not [`CONFIG_MAGIC`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Invalid magic: expected 0x4A4F5943 ('JOYC'), got 0x{found:08X}")]
pub struct MagicMismatch {
    pub found: u32,
}
