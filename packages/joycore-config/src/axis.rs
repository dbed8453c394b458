//! Analog axis slots.

use crate::{
    decode::{Decode, DecodeError, take},
    encode::Encode,
    names::{BoardPin, FilterLevel, ResponseCurve},
};

/// Number of fixed axis slots in every config.
pub const AXIS_SLOTS: usize = 8;

/// One 15 byte axis record.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct AxisConfig {
    /// Raw enable byte. See [`SlotState`] for how it is read.
    pub enabled: u8,
    pub pin: BoardPin,
    pub min_value: u16,
    pub max_value: u16,
    pub filter_level: FilterLevel,
    /// EWMA smoothing factor in 16-bit fixed point (65536 = 1.0).
    pub ewma_alpha: u16,
    pub deadband: u16,
    pub curve: ResponseCurve,
    pub reserved: [u8; 3],
}

impl AxisConfig {
    pub const SIZE: usize = 15;

    pub const fn state(&self) -> SlotState {
        SlotState::from_enabled(self.enabled)
    }
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            enabled: 0,
            pin: BoardPin(0),
            min_value: 0,
            max_value: 1023,
            filter_level: FilterLevel::Medium,
            ewma_alpha: 6554,
            deadband: 0,
            curve: ResponseCurve::Linear,
            reserved: [0; 3],
        }
    }
}

impl Encode for AxisConfig {
    fn size(&self) -> usize {
        Self::SIZE
    }

    fn encode(&self, data: &mut [u8]) {
        data[0] = self.enabled;
        self.pin.encode(&mut data[1..]);
        self.min_value.encode(&mut data[2..]);
        self.max_value.encode(&mut data[4..]);
        self.filter_level.encode(&mut data[6..]);
        self.ewma_alpha.encode(&mut data[7..]);
        self.deadband.encode(&mut data[9..]);
        self.curve.encode(&mut data[11..]);
        self.reserved.encode(&mut data[12..]);
    }
}

impl Decode for AxisConfig {
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
        let data = &mut take::<Self>(data, Self::SIZE)?;

        Ok(Self {
            enabled: u8::decode(data)?,
            pin: BoardPin::decode(data)?,
            min_value: u16::decode(data)?,
            max_value: u16::decode(data)?,
            filter_level: FilterLevel::decode(data)?,
            ewma_alpha: u16::decode(data)?,
            deadband: u16::decode(data)?,
            curve: ResponseCurve::decode(data)?,
            reserved: Decode::decode(data)?,
        })
    }
}

/// How a slot's enable byte reads.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SlotState {
    /// `1`: the axis is in use.
    Enabled,
    /// `0`: the axis was switched off.
    Disabled,
    /// `0xFF`: erased flash that was never written. Not an error.
    Uninitialized,
    /// Any other value. Still treated as enabled, but worth a look.
    Suspicious(u8),
}

impl SlotState {
    pub const fn from_enabled(enabled: u8) -> Self {
        match enabled {
            1 => Self::Enabled,
            0 => Self::Disabled,
            0xFF => Self::Uninitialized,
            other => Self::Suspicious(other),
        }
    }

    /// Whether the slot belongs in the enabled-axes view.
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Enabled | Self::Suspicious(_))
    }

    pub const fn is_suspicious(self) -> bool {
        matches!(self, Self::Suspicious(_))
    }
}

/// A decoded axis slot, with the bytes it was decoded from.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct AxisSlot {
    pub index: u8,
    pub config: AxisConfig,
    pub state: SlotState,
    pub raw: [u8; AxisConfig::SIZE],
}

impl AxisSlot {
    /// Decodes slot `index` from exactly [`AxisConfig::SIZE`] bytes.
    pub fn decode(index: u8, raw: [u8; AxisConfig::SIZE]) -> Result<Self, DecodeError> {
        let config = AxisConfig::decode(&mut raw.as_slice())?;

        Ok(Self {
            index,
            config,
            state: config.state(),
            raw,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{AxisConfig, AxisSlot, SlotState};
    use crate::{
        encode::Encode,
        names::{BoardPin, FilterLevel, ResponseCurve},
    };

    const RAW: [u8; AxisConfig::SIZE] = [
        0x01, // enabled
        0x1B, // pin 27 (A1)
        0x10, 0x00, // min 16
        0xF0, 0x03, // max 1008
        0x03, // filter HIGH
        0x9A, 0x19, // ewma 6554
        0x05, 0x00, // deadband 5
        0x01, // curve EXPONENTIAL
        0x00, 0x00, 0x00,
    ];

    #[test]
    fn decode_slot() {
        let slot = AxisSlot::decode(2, RAW).unwrap();

        assert_eq!(slot.index, 2);
        assert_eq!(slot.state, SlotState::Enabled);
        assert_eq!(slot.config.pin, BoardPin::A1);
        assert_eq!(slot.config.min_value, 16);
        assert_eq!(slot.config.max_value, 1008);
        assert_eq!(slot.config.filter_level, FilterLevel::High);
        assert_eq!(slot.config.ewma_alpha, 6554);
        assert_eq!(slot.config.deadband, 5);
        assert_eq!(slot.config.curve, ResponseCurve::Exponential);
        assert_eq!(slot.config.to_vec(), RAW);
    }

    #[test]
    fn enable_byte_states() {
        assert_eq!(SlotState::from_enabled(0), SlotState::Disabled);
        assert_eq!(SlotState::from_enabled(0xFF), SlotState::Uninitialized);

        let suspicious = SlotState::from_enabled(5);
        assert_eq!(suspicious, SlotState::Suspicious(5));
        assert!(suspicious.is_active());
        assert!(suspicious.is_suspicious());

        assert!(!SlotState::Uninitialized.is_active());
        assert!(!SlotState::Uninitialized.is_suspicious());
        assert!(!SlotState::Disabled.is_active());
        assert!(SlotState::Enabled.is_active());
    }

    #[test]
    fn default_matches_firmware() {
        let axis = AxisConfig::default();
        assert_eq!(axis.state(), SlotState::Disabled);
        assert_eq!(axis.max_value, 1023);
        assert_eq!(axis.filter_level, FilterLevel::Medium);
    }
}
