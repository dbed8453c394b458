//! Whole-blob decoding and encoding.
//!
//! A stored config is laid out back to back with no padding:
//!
//! | Offset | Size        | Contents                           |
//! |--------|-------------|------------------------------------|
//! | 0      | 16          | [`ConfigHeader`]                   |
//! | 16     | 76          | [`UsbDescriptor`]                  |
//! | 92     | 4           | [`SectionCounts`]                  |
//! | 96     | 8 × 15      | [`AxisConfig`] slots               |
//! | 216    | n × 10      | [`PinMapEntry`] records            |
//! | ...    | m × 10      | [`LogicalInput`] records           |
//!
//! Decoding is lenient. Only a blob too short for its header is rejected;
//! everything past that is decoded for as long as the bytes last, and each
//! section that runs out is recorded as a [`ShortRead`].

use core::fmt::{self, Display};

use alloc::{
    string::{String, ToString},
    vec::Vec,
};
use thiserror::Error;

use crate::{
    axis::{AXIS_SLOTS, AxisConfig, AxisSlot},
    crc::config_checksum,
    decode::{Decode, DecodeError, DecodeErrorKind},
    encode::Encode,
    header::{CHECKSUM_FIELD, CONFIG_VERSION, ConfigHeader, MagicMismatch},
    logical_input::{LogicalInput, MAX_LOGICAL_INPUT_COUNT},
    pin_map::{MAX_PIN_MAP_COUNT, PinMapEntry},
    usb::UsbDescriptor,
};

pub const USB_OFFSET: usize = ConfigHeader::SIZE;
pub const COUNTS_OFFSET: usize = USB_OFFSET + UsbDescriptor::SIZE;
pub const AXES_OFFSET: usize = COUNTS_OFFSET + SectionCounts::SIZE;
/// Start of the pin map, right after the last axis slot.
pub const VARIABLE_OFFSET: usize = AXES_OFFSET + AXIS_SLOTS * AxisConfig::SIZE;

/// Smallest blob that gets past the header. Anything shorter is decoded as a
/// header alone.
pub const MIN_CONFIG_SIZE: usize = 224;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Config is {len} bytes, too short to hold a 16 byte header")]
    TooShort { len: usize },
    #[error("Could not decode config: {0}")]
    DecodeFailure(String),
    #[error(transparent)]
    Record(#[from] DecodeError),
    #[error("Too many {section} entries: {count} (firmware maximum is {max})")]
    TooManyEntries {
        section: &'static str,
        count: usize,
        max: u8,
    },
}

/// Entry counts stored at offset 92.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct SectionCounts {
    pub pin_map_count: u8,
    pub logical_input_count: u8,
    pub shift_reg_count: u8,
    pub padding: u8,
}

impl SectionCounts {
    pub const SIZE: usize = 4;

    /// Reads the counts byte by byte. Bytes past the end of `blob` read as 0.
    fn read(blob: &[u8]) -> Self {
        let byte = |i: usize| blob.get(COUNTS_OFFSET + i).copied().unwrap_or(0);

        Self {
            pin_map_count: byte(0),
            logical_input_count: byte(1),
            shift_reg_count: byte(2),
            padding: byte(3),
        }
    }
}

impl Encode for SectionCounts {
    fn size(&self) -> usize {
        Self::SIZE
    }

    fn encode(&self, data: &mut [u8]) {
        data[..Self::SIZE].copy_from_slice(&[
            self.pin_map_count,
            self.logical_input_count,
            self.shift_reg_count,
            self.padding,
        ]);
    }
}

/// The decoded header with the outcome of its magic check.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct HeaderInfo {
    pub header: ConfigHeader,
    pub magic_error: Option<MagicMismatch>,
}

impl HeaderInfo {
    pub const fn is_valid(&self) -> bool {
        self.magic_error.is_none()
    }
}

/// A part of the blob that a short read can happen in.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Section {
    /// Everything between the header and the pin map.
    FixedRegion,
    UsbDescriptor,
    Axis(u8),
    PinMap(u8),
    LogicalInput(u8),
}

impl Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FixedRegion => f.write_str("fixed region"),
            Self::UsbDescriptor => f.write_str("USB descriptor"),
            Self::Axis(i) => write!(f, "axis[{i}]"),
            Self::PinMap(i) => write!(f, "pin map[{i}]"),
            Self::LogicalInput(i) => write!(f, "logical input[{i}]"),
        }
    }
}

/// A section that ran past the end of the blob.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ShortRead {
    pub section: Section,
    pub offset: usize,
    pub needed: usize,
    pub available: usize,
}

impl Display for ShortRead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: needed {} bytes at offset {}, {} left",
            self.section, self.needed, self.offset, self.available
        )
    }
}

/// The result of [`decode_config`]. Built once and never mutated.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DecodedConfig {
    pub header: HeaderInfo,
    /// `None` when the blob stops before the descriptor.
    pub usb: Option<UsbDescriptor>,
    pub counts: SectionCounts,
    /// Every slot that was decoded, in slot order.
    pub all_axes: Vec<AxisSlot>,
    pub pin_map: Vec<PinMapEntry>,
    pub logical_inputs: Vec<LogicalInput>,
    pub short_reads: Vec<ShortRead>,
    /// Length of the input.
    pub total_size: usize,
    /// Offset the decoder stopped at.
    pub parsed_size: usize,
    /// Checksum of the input as the firmware would compute it.
    pub computed_checksum: u32,
}

impl DecodedConfig {
    /// Enabled and suspicious slots, in slot order.
    pub fn enabled_axes(&self) -> impl Iterator<Item = &AxisSlot> {
        self.all_axes.iter().filter(|slot| slot.state.is_active())
    }

    /// Size implied by the stored counts.
    pub const fn expected_size(&self) -> usize {
        VARIABLE_OFFSET
            + self.counts.pin_map_count as usize * PinMapEntry::SIZE
            + self.counts.logical_input_count as usize * LogicalInput::SIZE
    }

    /// Trailing bytes the decoder never looked at.
    pub const fn unparsed_bytes(&self) -> usize {
        self.total_size.saturating_sub(self.parsed_size)
    }

    /// Whether the header's size field agrees with the input length. The
    /// decoder does not act on this.
    pub const fn declared_size_matches(&self) -> bool {
        self.header.header.size as usize == self.total_size
    }

    pub const fn checksum_matches(&self) -> bool {
        self.header.header.checksum == self.computed_checksum
    }

    pub const fn counts_within_limits(&self) -> bool {
        self.counts.pin_map_count <= MAX_PIN_MAP_COUNT
            && self.counts.logical_input_count <= MAX_LOGICAL_INPUT_COUNT
    }

    /// Whether every section was read in full.
    pub fn is_complete(&self) -> bool {
        self.short_reads.is_empty()
    }
}

/// A read position over the blob that turns running out of bytes into a
/// [`ShortRead`] and leaves the position where it was.
struct Cursor<'a> {
    blob: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    const fn new(blob: &'a [u8], offset: usize) -> Self {
        Self { blob, offset }
    }

    fn read<T: Decode>(&mut self, section: Section) -> Result<T, ShortRead> {
        let mut rest = self.blob.get(self.offset..).unwrap_or_default();
        let before = rest.len();

        match T::decode(&mut rest) {
            Ok(value) => {
                self.offset += before - rest.len();
                Ok(value)
            }
            Err(err) => {
                let DecodeErrorKind::UnexpectedEnd { needed, available } = err.kind();
                Err(ShortRead {
                    section,
                    offset: self.offset,
                    needed,
                    available,
                })
            }
        }
    }
}

/// Decodes a raw config blob.
///
/// # Errors
///
/// Returns [`ConfigError::TooShort`] if `blob` cannot hold a header. A bad
/// magic number or a truncated body is reported on the result instead.
pub fn decode_config(blob: &[u8]) -> Result<DecodedConfig, ConfigError> {
    let header = ConfigHeader::decode(&mut &blob[..])
        .map_err(|_| ConfigError::TooShort { len: blob.len() })?;
    let header = HeaderInfo {
        header,
        magic_error: header.check_magic().err(),
    };

    let mut config = DecodedConfig {
        header,
        usb: None,
        counts: SectionCounts::default(),
        all_axes: Vec::new(),
        pin_map: Vec::new(),
        logical_inputs: Vec::new(),
        short_reads: Vec::new(),
        total_size: blob.len(),
        parsed_size: ConfigHeader::SIZE,
        computed_checksum: config_checksum(blob),
    };

    if blob.len() < MIN_CONFIG_SIZE {
        config.short_reads.push(ShortRead {
            section: Section::FixedRegion,
            offset: ConfigHeader::SIZE,
            needed: MIN_CONFIG_SIZE - ConfigHeader::SIZE,
            available: blob.len() - ConfigHeader::SIZE,
        });
        return Ok(config);
    }

    let mut cursor = Cursor::new(blob, USB_OFFSET);
    match cursor.read::<UsbDescriptor>(Section::UsbDescriptor) {
        Ok(usb) => config.usb = Some(usb),
        Err(short) => config.short_reads.push(short),
    }

    config.counts = SectionCounts::read(blob);

    let mut cursor = Cursor::new(blob, AXES_OFFSET);
    for index in 0..AXIS_SLOTS as u8 {
        match cursor.read::<[u8; AxisConfig::SIZE]>(Section::Axis(index)) {
            Ok(raw) => config.all_axes.push(AxisSlot::decode(index, raw)?),
            Err(short) => {
                config.short_reads.push(short);
                break;
            }
        }
    }

    let mut cursor = Cursor::new(blob, VARIABLE_OFFSET);
    for index in 0..config.counts.pin_map_count {
        match cursor.read::<PinMapEntry>(Section::PinMap(index)) {
            Ok(entry) => config.pin_map.push(entry),
            Err(short) => {
                config.short_reads.push(short);
                break;
            }
        }
    }

    for index in 0..config.counts.logical_input_count {
        match cursor.read::<LogicalInput>(Section::LogicalInput(index)) {
            Ok(input) => config.logical_inputs.push(input),
            Err(short) => {
                config.short_reads.push(short);
                break;
            }
        }
    }

    config.parsed_size = cursor.offset;

    Ok(config)
}

/// Decodes a config given as a hex string, two digits per byte.
///
/// # Errors
///
/// Returns [`ConfigError::DecodeFailure`] for malformed hex, otherwise the
/// same errors as [`decode_config`].
pub fn decode_hex_config(hex: &str) -> Result<DecodedConfig, ConfigError> {
    let blob = hex::decode(hex.trim()).map_err(|err| ConfigError::DecodeFailure(err.to_string()))?;
    decode_config(&blob)
}

/// A config to be written out in the firmware's layout.
///
/// Counts, the header size and the checksum are all derived when encoding.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ConfigBlob {
    pub version: u16,
    pub usb: UsbDescriptor,
    pub shift_reg_count: u8,
    pub axes: [AxisConfig; AXIS_SLOTS],
    pub pin_map: Vec<PinMapEntry>,
    pub logical_inputs: Vec<LogicalInput>,
}

impl Default for ConfigBlob {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            usb: UsbDescriptor::default(),
            shift_reg_count: 0,
            axes: [AxisConfig::default(); AXIS_SLOTS],
            pin_map: Vec::new(),
            logical_inputs: Vec::new(),
        }
    }
}

impl ConfigBlob {
    /// Encodes the blob after checking the entry counts.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TooManyEntries`] if either variable section is
    /// over its firmware maximum.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ConfigError> {
        if self.pin_map.len() > MAX_PIN_MAP_COUNT as usize {
            return Err(ConfigError::TooManyEntries {
                section: "pin map",
                count: self.pin_map.len(),
                max: MAX_PIN_MAP_COUNT,
            });
        }
        if self.logical_inputs.len() > MAX_LOGICAL_INPUT_COUNT as usize {
            return Err(ConfigError::TooManyEntries {
                section: "logical input",
                count: self.logical_inputs.len(),
                max: MAX_LOGICAL_INPUT_COUNT,
            });
        }

        Ok(self.to_vec())
    }

    fn counts(&self) -> SectionCounts {
        SectionCounts {
            pin_map_count: u8::try_from(self.pin_map.len()).unwrap_or(u8::MAX),
            logical_input_count: u8::try_from(self.logical_inputs.len()).unwrap_or(u8::MAX),
            shift_reg_count: self.shift_reg_count,
            padding: 0,
        }
    }
}

impl Encode for ConfigBlob {
    fn size(&self) -> usize {
        VARIABLE_OFFSET
            + self.pin_map.len() * PinMapEntry::SIZE
            + self.logical_inputs.len() * LogicalInput::SIZE
    }

    fn encode(&self, data: &mut [u8]) {
        let size = self.size();
        let header = ConfigHeader {
            version: self.version,
            ..ConfigHeader::new(u16::try_from(size).unwrap_or(u16::MAX))
        };

        header.encode(data);
        self.usb.encode(&mut data[USB_OFFSET..]);
        self.counts().encode(&mut data[COUNTS_OFFSET..]);

        let mut offset = AXES_OFFSET;
        for axis in &self.axes {
            axis.encode(&mut data[offset..]);
            offset += AxisConfig::SIZE;
        }
        for entry in &self.pin_map {
            entry.encode(&mut data[offset..]);
            offset += PinMapEntry::SIZE;
        }
        for input in &self.logical_inputs {
            input.encode(&mut data[offset..]);
            offset += LogicalInput::SIZE;
        }

        let checksum = config_checksum(&data[..size]);
        checksum.encode(&mut data[CHECKSUM_FIELD]);
    }
}
