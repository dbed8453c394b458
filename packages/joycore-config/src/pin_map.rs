use crate::{
    decode::{Decode, DecodeError, take},
    encode::Encode,
    names::PinType,
    string::FixedString,
};

/// Most pin map entries the firmware will store.
pub const MAX_PIN_MAP_COUNT: u8 = 32;

/// A named physical pin and its role.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct PinMapEntry {
    /// Board label, e.g. `"GP4"` or `"A1"`.
    pub name: FixedString<8>,
    pub pin_type: PinType,
    pub reserved: u8,
}

impl PinMapEntry {
    pub const SIZE: usize = 10;
}

impl Encode for PinMapEntry {
    fn size(&self) -> usize {
        Self::SIZE
    }

    fn encode(&self, data: &mut [u8]) {
        self.name.encode(data);
        self.pin_type.encode(&mut data[8..]);
        data[9] = self.reserved;
    }
}

impl Decode for PinMapEntry {
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
        let data = &mut take::<Self>(data, Self::SIZE)?;

        Ok(Self {
            name: FixedString::decode(data)?,
            pin_type: PinType::decode(data)?,
            reserved: u8::decode(data)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::PinMapEntry;
    use crate::{decode::Decode, names::PinType};

    #[test]
    fn decode_entry() {
        let mut data = b"A1\0\0\0\0\0\0\x01\0".as_slice();
        let entry = PinMapEntry::decode(&mut data).unwrap();

        assert_eq!(entry.name.to_string_lossy(), "A1");
        assert_eq!(entry.pin_type, PinType::Button);
        assert_eq!(entry.pin_type.name(), Some("BTN"));
        assert!(data.is_empty());
    }

    #[test]
    fn unknown_type_still_decodes() {
        let entry = PinMapEntry::decode(&mut b"GP9\0\0\0\0\0\x2A\0".as_slice()).unwrap();
        assert_eq!(entry.pin_type, PinType::Unknown(42));
    }
}
