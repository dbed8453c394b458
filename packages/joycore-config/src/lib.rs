//! Layout, decoder and encoder for the configuration blob stored on JoyCore
//! game controllers.
//!
//! The firmware keeps its config as a packed little-endian blob at
//! `/config.bin`. [`decode_config`] turns such a blob into a
//! [`DecodedConfig`], and [`ConfigBlob`] writes one back out in the same
//! layout.

#![no_std]

extern crate alloc;

pub mod axis;
pub mod config;
pub mod header;
pub mod logical_input;
pub mod names;
pub mod pin_map;
pub mod usb;

mod crc;
mod decode;
mod encode;
mod string;

pub use axis::{AXIS_SLOTS, AxisConfig, AxisSlot, SlotState};
pub use config::{
    ConfigBlob, ConfigError, DecodedConfig, HeaderInfo, Section, SectionCounts, ShortRead,
    decode_config, decode_hex_config,
};
pub use crc::{CONFIG_CRC32, config_checksum};
pub use decode::{Decode, DecodeError, DecodeErrorKind};
pub use encode::Encode;
pub use header::{CONFIG_MAGIC, CONFIG_VERSION, ConfigHeader, MagicMismatch};
pub use logical_input::{InputSource, LogicalInput, MAX_LOGICAL_INPUT_COUNT};
pub use pin_map::{MAX_PIN_MAP_COUNT, PinMapEntry};
pub use string::{FixedString, FixedStringSizeError};
pub use usb::{JOYCORE_USB_PID, JOYCORE_USB_VID, UsbDescriptor};
