//! USB identity stored in the config.

use crate::{
    decode::{Decode, DecodeError, take},
    encode::Encode,
    string::FixedString,
};

/// Raspberry Pi vendor ID, used by JoyCore boards.
pub const JOYCORE_USB_VID: u16 = 0x2E8A;

/// The USB PID of a JoyCore controller.
pub const JOYCORE_USB_PID: u16 = 0xA02F;

/// The 76 byte USB descriptor block at offset 16.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct UsbDescriptor {
    pub vendor_id: u16,
    pub product_id: u16,
    pub manufacturer: FixedString<32>,
    pub product: FixedString<32>,
    pub reserved: [u8; 8],
}

impl UsbDescriptor {
    pub const SIZE: usize = 76;
}

impl Default for UsbDescriptor {
    fn default() -> Self {
        Self {
            vendor_id: JOYCORE_USB_VID,
            product_id: JOYCORE_USB_PID,
            manufacturer: FixedString::default(),
            product: FixedString::default(),
            reserved: [0; 8],
        }
    }
}

impl Encode for UsbDescriptor {
    fn size(&self) -> usize {
        Self::SIZE
    }

    fn encode(&self, data: &mut [u8]) {
        self.vendor_id.encode(data);
        self.product_id.encode(&mut data[2..]);
        self.manufacturer.encode(&mut data[4..]);
        self.product.encode(&mut data[36..]);
        self.reserved.encode(&mut data[68..]);
    }
}

impl Decode for UsbDescriptor {
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
        let data = &mut take::<Self>(data, Self::SIZE)?;

        Ok(Self {
            vendor_id: u16::decode(data)?,
            product_id: u16::decode(data)?,
            manufacturer: FixedString::decode(data)?,
            product: FixedString::decode(data)?,
            reserved: Decode::decode(data)?,
        })
    }
}
