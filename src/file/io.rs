//! Bounds-checked little-endian reads over raw byte slices.
//!
//! Every multi-byte value in PE and ECMA-335 metadata structures is stored little-endian. The
//! helpers here read such values at a cursor, advancing it, and fail with
//! [`crate::Error::OutOfBounds`] instead of panicking on truncated input.
//!
//! `read_le_at_dyn` covers the metadata-table case where a column is either 2 or 4 bytes wide
//! depending on heap and table sizes.

use crate::{Error::OutOfBounds, Result};

/// Primitive values that can be decoded from a fixed-width little-endian byte array.
pub trait CilIO: Sized {
    /// The fixed-size byte representation of `Self`
    type Bytes: Sized + for<'a> TryFrom<&'a [u8]>;

    /// Decode `Self` from its little-endian representation
    fn from_le_bytes(bytes: Self::Bytes) -> Self;
}

macro_rules! impl_cil_io {
    ($($ty:ty),* $(,)?) => {
        $(
            impl CilIO for $ty {
                type Bytes = [u8; std::mem::size_of::<$ty>()];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }
            }
        )*
    };
}

impl_cil_io!(u8, i8, u16, i16, u32, i32, u64, i64);

/// Read a `T` from the start of `data`
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if `data` is shorter than `T`
pub fn read_le<T: CilIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_le_at(data, &mut offset)
}

/// Read a `T` at `offset`, and advance `offset` past it
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the read would leave `data`
pub fn read_le_at<T: CilIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len) else {
        return Err(OutOfBounds);
    };

    if end > data.len() {
        return Err(OutOfBounds);
    }

    let Ok(read) = data[*offset..end].try_into() else {
        return Err(OutOfBounds);
    };

    *offset = end;

    Ok(T::from_le_bytes(read))
}

/// Read either a `u16` or a `u32` at `offset`, widened to `u32`
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the read would leave `data`
pub fn read_le_at_dyn(data: &[u8], offset: &mut usize, is_large: bool) -> Result<u32> {
    let res = if is_large {
        read_le_at::<u32>(data, offset)?
    } else {
        u32::from(read_le_at::<u16>(data, offset)?)
    };

    Ok(res)
}
