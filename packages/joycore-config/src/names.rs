//! Firmware enums and their display names.
//!
//! Every enum stored as a single byte keeps values the firmware does not
//! define in an `Unknown` variant, so decoding never fails on them. The
//! `Display` impls print the firmware's own names, and `UNKNOWN(<value>)` for
//! anything else.

use core::fmt::{self, Display};

use crate::{
    decode::{Decode, DecodeError},
    encode::Encode,
};

macro_rules! firmware_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $value:literal => $label:literal,
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )+
            /// A value the firmware does not define.
            Unknown(u8),
        }

        impl $name {
            pub const fn from_raw(value: u8) -> Self {
                match value {
                    $($value => Self::$variant,)+
                    other => Self::Unknown(other),
                }
            }

            /// The stored byte.
            pub const fn raw(self) -> u8 {
                match self {
                    $(Self::$variant => $value,)+
                    Self::Unknown(value) => value,
                }
            }

            /// The firmware's name for this value, if it has one.
            pub const fn name(self) -> Option<&'static str> {
                match self {
                    $(Self::$variant => Some($label),)+
                    Self::Unknown(_) => None,
                }
            }

            pub const fn is_known(self) -> bool {
                !matches!(self, Self::Unknown(_))
            }
        }

        impl From<u8> for $name {
            fn from(value: u8) -> Self {
                Self::from_raw(value)
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value.raw()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.name() {
                    Some(name) => f.write_str(name),
                    None => write!(f, "UNKNOWN({})", self.raw()),
                }
            }
        }

        impl Encode for $name {
            fn size(&self) -> usize {
                1
            }

            fn encode(&self, data: &mut [u8]) {
                data[0] = self.raw();
            }
        }

        impl Decode for $name {
            fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
                Ok(Self::from_raw(u8::decode(data)?))
            }
        }
    };
}

firmware_enum! {
    /// Smoothing applied to an analog axis.
    #[derive(Default)]
    pub enum FilterLevel {
        Off = 0 => "OFF",
        Low = 1 => "LOW",
        #[default]
        Medium = 2 => "MEDIUM",
        High = 3 => "HIGH",
        Adaptive = 4 => "ADAPTIVE",
    }
}

firmware_enum! {
    /// Response curve applied to an analog axis.
    #[derive(Default)]
    pub enum ResponseCurve {
        #[default]
        Linear = 0 => "LINEAR",
        Exponential = 1 => "EXPONENTIAL",
        Logarithmic = 2 => "LOGARITHMIC",
        SCurve = 3 => "S_CURVE",
    }
}

firmware_enum! {
    /// What a physical pin is wired to.
    pub enum PinType {
        Unused = 0 => "PIN_UNUSED",
        Button = 1 => "BTN",
        ButtonRow = 2 => "BTN_ROW",
        ButtonColumn = 3 => "BTN_COL",
        /// Shift register parallel load.
        ShiftRegLoad = 4 => "SHIFTREG_PL",
        ShiftRegClock = 5 => "SHIFTREG_CLK",
        /// Shift register serial output.
        ShiftRegData = 6 => "SHIFTREG_QH",
    }
}

firmware_enum! {
    /// Where a logical input reads its state from.
    pub enum InputType {
        Pin = 0 => "INPUT_PIN",
        Matrix = 1 => "INPUT_MATRIX",
        ShiftReg = 2 => "INPUT_SHIFTREG",
        /// Seen in stored configs, but its union layout is unconfirmed.
        Encoder = 4 => "INPUT_ENCODER",
    }
}

firmware_enum! {
    /// How a logical input maps onto a joystick button.
    pub enum ButtonBehavior {
        Normal = 0 => "NORMAL",
        Momentary = 1 => "MOMENTARY",
        /// Encoder channel A.
        EncoderA = 2 => "ENC_A",
        /// Encoder channel B.
        EncoderB = 3 => "ENC_B",
    }
}

impl ButtonBehavior {
    /// Whether this input is one half of a rotary encoder.
    pub const fn is_encoder(self) -> bool {
        matches!(self, Self::EncoderA | Self::EncoderB)
    }
}

firmware_enum! {
    /// Encoder step latching. Zero is never written by the firmware and
    /// means the default, which behaves like [`LatchMode::Four3`].
    pub enum LatchMode {
        Default = 0 => "DEFAULT(FOUR3)",
        Four3 = 1 => "FOUR3",
        Four0 = 2 => "FOUR0",
        Two03 = 3 => "TWO03",
    }
}

/// A board pin number, shown with its Arduino analog alias when it has one.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub struct BoardPin(pub u8);

impl BoardPin {
    pub const A0: Self = Self(26);
    pub const A1: Self = Self(27);
    pub const A2: Self = Self(28);
    pub const A3: Self = Self(29);

    pub const fn analog_alias(self) -> Option<&'static str> {
        match self.0 {
            26 => Some("A0"),
            27 => Some("A1"),
            28 => Some("A2"),
            29 => Some("A3"),
            _ => None,
        }
    }
}

impl Display for BoardPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.analog_alias() {
            Some(alias) => f.write_str(alias),
            None => write!(f, "{}", self.0),
        }
    }
}

impl Encode for BoardPin {
    fn size(&self) -> usize {
        1
    }

    fn encode(&self, data: &mut [u8]) {
        data[0] = self.0;
    }
}

impl Decode for BoardPin {
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
        Ok(Self(u8::decode(data)?))
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::{BoardPin, ButtonBehavior, FilterLevel, InputType, LatchMode, PinType, ResponseCurve};

    #[test]
    fn filter_names() {
        assert_eq!(FilterLevel::from_raw(0).to_string(), "OFF");
        assert_eq!(FilterLevel::from_raw(4).to_string(), "ADAPTIVE");
        assert_eq!(FilterLevel::from_raw(9), FilterLevel::Unknown(9));
        assert_eq!(FilterLevel::from_raw(9).to_string(), "UNKNOWN(9)");
    }

    #[test]
    fn curve_names() {
        assert_eq!(ResponseCurve::from_raw(3).to_string(), "S_CURVE");
        assert_eq!(ResponseCurve::from_raw(200).to_string(), "UNKNOWN(200)");
    }

    #[test]
    fn pin_types() {
        assert_eq!(PinType::from_raw(1), PinType::Button);
        assert_eq!(PinType::Button.to_string(), "BTN");
        assert_eq!(PinType::from_raw(6).to_string(), "SHIFTREG_QH");
        assert_eq!(PinType::from_raw(7).name(), None);
    }

    #[test]
    fn input_types() {
        assert_eq!(InputType::from_raw(2).to_string(), "INPUT_SHIFTREG");
        assert_eq!(InputType::from_raw(4), InputType::Encoder);
        // 3 is a gap in the firmware enum
        assert_eq!(InputType::from_raw(3), InputType::Unknown(3));
    }

    #[test]
    fn behaviors() {
        assert!(ButtonBehavior::from_raw(2).is_encoder());
        assert!(ButtonBehavior::from_raw(3).is_encoder());
        assert!(!ButtonBehavior::Momentary.is_encoder());
        assert_eq!(ButtonBehavior::from_raw(3).to_string(), "ENC_B");
        assert!(!ButtonBehavior::from_raw(8).is_encoder());
    }

    #[test]
    fn latch_modes() {
        assert_eq!(LatchMode::from_raw(0).to_string(), "DEFAULT(FOUR3)");
        assert_eq!(LatchMode::from_raw(3).to_string(), "TWO03");
        assert_eq!(u8::from(LatchMode::Four0), 2);
    }

    #[test]
    fn raw_round_trip() {
        for value in 0..=u8::MAX {
            assert_eq!(PinType::from_raw(value).raw(), value);
        }
    }

    #[test]
    fn pin_aliases() {
        assert_eq!(BoardPin(26).to_string(), "A0");
        assert_eq!(BoardPin::A3.to_string(), "A3");
        assert_eq!(BoardPin(5).to_string(), "5");
        assert_eq!(BoardPin(30).analog_alias(), None);
    }
}
