//! Logical inputs, the firmware's mapping from physical sources to joystick
//! buttons.

use crate::{
    decode::{Decode, DecodeError, take},
    encode::Encode,
    names::{ButtonBehavior, InputType, LatchMode},
};

/// Most logical inputs the firmware will store.
pub const MAX_LOGICAL_INPUT_COUNT: u8 = 64;

/// One 10 byte logical input record.
///
/// The record's type byte and its trailing 2 byte union are folded into
/// [`InputSource`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct LogicalInput {
    pub behavior: ButtonBehavior,
    pub joy_button_id: u8,
    /// Raw reverse flag; nonzero inverts the button.
    pub reverse: u8,
    pub encoder_latch_mode: LatchMode,
    pub reserved: [u8; 3],
    pub source: InputSource,
}

impl LogicalInput {
    pub const SIZE: usize = 10;

    pub const fn input_type(&self) -> InputType {
        self.source.input_type()
    }

    pub const fn is_reversed(&self) -> bool {
        self.reverse != 0
    }

    /// The latch mode, for encoder behaviors only. It is meaningless elsewhere.
    pub const fn latch_mode(&self) -> Option<LatchMode> {
        if self.behavior.is_encoder() {
            Some(self.encoder_latch_mode)
        } else {
            None
        }
    }
}

impl Encode for LogicalInput {
    fn size(&self) -> usize {
        Self::SIZE
    }

    fn encode(&self, data: &mut [u8]) {
        self.input_type().encode(data);
        self.behavior.encode(&mut data[1..]);
        data[2] = self.joy_button_id;
        data[3] = self.reverse;
        self.encoder_latch_mode.encode(&mut data[4..]);
        self.reserved.encode(&mut data[5..]);
        self.source.raw_data().encode(&mut data[8..]);
    }
}

impl Decode for LogicalInput {
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
        let data = &mut take::<Self>(data, Self::SIZE)?;

        let input_type = InputType::decode(data)?;
        let behavior = ButtonBehavior::decode(data)?;
        let joy_button_id = u8::decode(data)?;
        let reverse = u8::decode(data)?;
        let encoder_latch_mode = LatchMode::decode(data)?;
        let reserved = Decode::decode(data)?;
        let union = Decode::decode(data)?;

        Ok(Self {
            behavior,
            joy_button_id,
            reverse,
            encoder_latch_mode,
            reserved,
            source: InputSource::from_parts(input_type, union),
        })
    }
}

/// Where a logical input reads from, decoded from the record's type byte and
/// 2 byte union.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum InputSource {
    /// A directly wired pin. The union's second byte is unused.
    Pin { pin: u8 },
    /// A button matrix crossing.
    Matrix { row: u8, col: u8 },
    /// One bit of a daisy-chained shift register.
    ShiftReg { reg_index: u8, bit_index: u8 },
    /// An encoder input. The union layout has not been confirmed against the
    /// firmware, so the bytes are passed through untouched.
    Encoder { data: [u8; 2] },
    /// A type the firmware does not define, with its union bytes as stored.
    Unknown { input_type: u8, data: [u8; 2] },
}

impl InputSource {
    pub const fn from_parts(input_type: InputType, data: [u8; 2]) -> Self {
        match input_type {
            InputType::Pin => Self::Pin { pin: data[0] },
            InputType::Matrix => Self::Matrix {
                row: data[0],
                col: data[1],
            },
            InputType::ShiftReg => Self::ShiftReg {
                reg_index: data[0],
                bit_index: data[1],
            },
            InputType::Encoder => Self::Encoder { data },
            InputType::Unknown(input_type) => Self::Unknown { input_type, data },
        }
    }

    pub const fn input_type(&self) -> InputType {
        match *self {
            Self::Pin { .. } => InputType::Pin,
            Self::Matrix { .. } => InputType::Matrix,
            Self::ShiftReg { .. } => InputType::ShiftReg,
            Self::Encoder { .. } => InputType::Encoder,
            Self::Unknown { input_type, .. } => InputType::from_raw(input_type),
        }
    }

    /// The union bytes as they would be stored.
    pub const fn raw_data(&self) -> [u8; 2] {
        match *self {
            Self::Pin { pin } => [pin, 0],
            Self::Matrix { row, col } => [row, col],
            Self::ShiftReg {
                reg_index,
                bit_index,
            } => [reg_index, bit_index],
            Self::Encoder { data } | Self::Unknown { data, .. } => data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{InputSource, LogicalInput};
    use crate::{
        decode::Decode,
        encode::Encode,
        names::{ButtonBehavior, InputType, LatchMode},
    };

    #[test]
    fn matrix_union() {
        let raw = [1, 0, 4, 0, 0, 0, 0, 0, 3, 7];
        let input = LogicalInput::decode(&mut raw.as_slice()).unwrap();

        assert_eq!(input.input_type(), InputType::Matrix);
        assert_eq!(input.source, InputSource::Matrix { row: 3, col: 7 });
        assert_eq!(input.joy_button_id, 4);
        assert_eq!(input.behavior, ButtonBehavior::Normal);
        assert_eq!(input.to_vec(), raw);
    }

    #[test]
    fn pin_and_shift_register() {
        let pin = LogicalInput::decode(&mut [0, 1, 0, 1, 0, 0, 0, 0, 12, 0].as_slice()).unwrap();
        assert_eq!(pin.source, InputSource::Pin { pin: 12 });
        assert_eq!(pin.behavior, ButtonBehavior::Momentary);
        assert!(pin.is_reversed());

        let shift = LogicalInput::decode(&mut [2, 0, 9, 0, 0, 0, 0, 0, 1, 6].as_slice()).unwrap();
        assert_eq!(
            shift.source,
            InputSource::ShiftReg {
                reg_index: 1,
                bit_index: 6
            }
        );
    }

    #[test]
    fn encoder_keeps_raw_bytes() {
        let raw = [4, 2, 10, 0, 2, 0, 0, 0, 0xAB, 0xCD];
        let input = LogicalInput::decode(&mut raw.as_slice()).unwrap();

        assert_eq!(input.source, InputSource::Encoder { data: [0xAB, 0xCD] });
        assert_eq!(input.latch_mode(), Some(LatchMode::Four0));
        assert_eq!(input.to_vec(), raw);
    }

    #[test]
    fn unknown_type_keeps_raw_bytes() {
        let raw = [9, 0, 0, 0, 0, 0, 0, 0, 0x11, 0x22];
        let input = LogicalInput::decode(&mut raw.as_slice()).unwrap();

        assert_eq!(
            input.source,
            InputSource::Unknown {
                input_type: 9,
                data: [0x11, 0x22]
            }
        );
        assert_eq!(input.input_type(), InputType::Unknown(9));
        assert_eq!(input.to_vec(), raw);
    }

    #[test]
    fn latch_mode_only_for_encoders() {
        let input = LogicalInput::decode(&mut [0, 0, 0, 0, 3, 0, 0, 0, 5, 0].as_slice()).unwrap();
        assert_eq!(input.encoder_latch_mode, LatchMode::Two03);
        assert_eq!(input.latch_mode(), None);
    }
}
