use core::fmt::{self, Display};

use alloc::{borrow::Cow, string::String};

use crate::{
    decode::{Decode, DecodeError, take},
    encode::Encode,
};

/// A NUL-padded UTF-8 string stored in a fixed `N` byte buffer.
///
/// This is how the firmware stores names and USB strings. The raw bytes are
/// kept as-is so that padding and any invalid UTF-8 survive a decode; the
/// text view trims trailing NULs and replaces invalid sequences.
///
/// # Invariants
///
/// - A string built with [`FixedString::new`] is at most `N` bytes long and
///   is zero-padded to `N`.
#[derive(Debug, PartialEq, PartialOrd, Eq, Ord, Clone, Copy, Hash)]
pub struct FixedString<const N: usize>([u8; N]);

impl<const N: usize> FixedString<N> {
    /// Creates a new [`FixedString`] from the given string slice.
    ///
    /// # Errors
    ///
    /// Returns [`FixedStringSizeError`] if the string's UTF-8 byte length
    /// exceeds `N`.
    pub fn new(s: impl AsRef<str>) -> Result<Self, FixedStringSizeError> {
        let bytes = s.as_ref().as_bytes();

        if bytes.len() > N {
            return Err(FixedStringSizeError {
                input_size: bytes.len(),
                max_size: N,
            });
        }

        let mut buf = [0; N];
        buf[..bytes.len()].copy_from_slice(bytes);

        Ok(Self(buf))
    }

    /// Wraps a raw buffer exactly as it was stored.
    pub const fn from_bytes(bytes: [u8; N]) -> Self {
        Self(bytes)
    }

    /// The raw stored bytes, padding included.
    pub const fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    /// The text content with trailing NUL padding removed.
    ///
    /// Invalid UTF-8 is replaced with `U+FFFD` rather than rejected.
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        let len = self.0.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        String::from_utf8_lossy(&self.0[..len])
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }
}

impl<const N: usize> Default for FixedString<N> {
    fn default() -> Self {
        Self([0; N])
    }
}

impl<const N: usize> TryFrom<&str> for FixedString<N> {
    type Error = FixedStringSizeError;

    fn try_from(value: &str) -> Result<FixedString<N>, FixedStringSizeError> {
        Self::new(value)
    }
}

impl<const N: usize> Display for FixedString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_string_lossy().fmt(f)
    }
}

impl<const N: usize> Encode for FixedString<N> {
    fn size(&self) -> usize {
        N
    }

    fn encode(&self, data: &mut [u8]) {
        data[..N].copy_from_slice(&self.0);
    }
}

impl<const N: usize> Decode for FixedString<N> {
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
        let mut buf = [0; N];
        buf.copy_from_slice(take::<Self>(data, N)?);
        Ok(Self(buf))
    }
}

/// Returned when a [`FixedString`] cannot fit the specified string.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FixedStringSizeError {
    pub input_size: usize,
    pub max_size: usize,
}

impl fmt::Display for FixedStringSizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "string with size {} exceeds the maximum size of FixedString<{}>",
            self.input_size, self.max_size
        )
    }
}

impl core::error::Error for FixedStringSizeError {}

#[cfg(test)]
mod tests {
    use super::FixedString;
    use crate::decode::Decode;

    #[test]
    fn trims_padding() {
        let mut data = b"A1\0\0\0\0\0\0".as_slice();
        let name = FixedString::<8>::decode(&mut data).unwrap();

        assert_eq!(name.to_string_lossy(), "A1");
        assert_eq!(name.as_bytes(), b"A1\0\0\0\0\0\0");
        assert!(data.is_empty());
    }

    #[test]
    fn keeps_interior_nul() {
        let name = FixedString::from_bytes(*b"AB\0CD\0\0\0");
        assert_eq!(name.to_string_lossy(), "AB\0CD");
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let name = FixedString::from_bytes([b'X', 0xFF, b'Y', 0]);
        assert_eq!(name.to_string_lossy(), "X\u{FFFD}Y");
    }

    #[test]
    fn too_long() {
        let err = FixedString::<4>::new("JOYCORE").unwrap_err();
        assert_eq!(err.input_size, 7);
        assert_eq!(err.max_size, 4);
    }

    #[test]
    fn empty() {
        assert!(FixedString::<8>::default().is_empty());
        assert_eq!(FixedString::<8>::default().to_string_lossy(), "");
        assert!(!FixedString::<8>::new("BTN").unwrap().is_empty());
    }
}
