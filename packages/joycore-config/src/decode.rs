use thiserror::Error;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub struct DecodeError {
    kind: DecodeErrorKind,
    type_name: &'static str,
}

impl DecodeError {
    pub fn new<T>(kind: DecodeErrorKind) -> Self {
        Self {
            kind,
            type_name: core::any::type_name::<T>(),
        }
    }

    pub const fn kind(&self) -> DecodeErrorKind {
        self.kind
    }
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Failed to decode {}: {}", self.type_name, self.kind)
    }
}

#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeErrorKind {
    #[error("Blob ended early. Needed {needed} bytes, {available} left.")]
    UnexpectedEnd { needed: usize, available: usize },
}

/// A type that can be reconstructed (decoded) from a raw sequence of bytes.
///
/// The input slice is advanced by the number of bytes consumed. Records
/// decode all-or-nothing: if the slice is too short for the whole record,
/// nothing is consumed.
pub trait Decode {
    /// Attempts to decode `Self` from the beginning of the provided byte slice.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the input is too short to hold a complete
    /// value of this type.
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError>
    where
        Self: Sized;
}

/// Splits `len` bytes off the front of `data`, leaving `data` untouched if
/// there are not enough.
pub(crate) fn take<'a, T>(data: &mut &'a [u8], len: usize) -> Result<&'a [u8], DecodeError> {
    let Some((head, tail)) = data.split_at_checked(len) else {
        return Err(DecodeError::new::<T>(DecodeErrorKind::UnexpectedEnd {
            needed: len,
            available: data.len(),
        }));
    };
    *data = tail;
    Ok(head)
}

macro_rules! impl_decode_for_primitive {
    ($($t:ty),*) => {
        $(
            impl Decode for $t {
                fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
                    let mut bytes = [0; size_of::<Self>()];
                    bytes.copy_from_slice(take::<Self>(data, size_of::<Self>())?);
                    Ok(Self::from_le_bytes(bytes))
                }
            }
        )*
    };
}

impl_decode_for_primitive!(u8, u16, u32);

impl<const N: usize> Decode for [u8; N] {
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
        let mut bytes = [0; N];
        bytes.copy_from_slice(take::<Self>(data, N)?);
        Ok(bytes)
    }
}
