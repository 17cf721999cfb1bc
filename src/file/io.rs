//! Low-level byte order and safe reading utilities for effect script blobs.
//!
//! Effect script data is stored strictly big-endian. This module provides the
//! [`crate::file::io::FxIO`] trait and the bounds-checked reading functions that every other
//! component builds on.
//!
//! # Key Components
//!
//! - [`crate::file::io::FxIO`] - Trait converting fixed-size byte arrays into primitive values
//! - [`crate::file::io::read_be`] - Read a value from the start of a buffer
//! - [`crate::file::io::read_be_at`] - Read a value at an offset and advance the offset
//!
//! ## Supported Types
//! - **Unsigned integers**: `u8`, `u16`, `u32`
//! - **Signed integers**: `i8`, `i16`, `i32`
//! - **Floating point**: `f32`
//!
//! # Usage Examples
//!
//! ```rust,ignore
//! use fxscope::file::io::read_be_at;
//!
//! let data = [0x00, 0x14, 0x3F, 0x80, 0x00, 0x00];
//! let mut offset = 0;
//!
//! let lifetime: u16 = read_be_at(&data, &mut offset)?; // offset: 0 -> 2
//! let gravity: f32 = read_be_at(&data, &mut offset)?;  // offset: 2 -> 6
//!
//! assert_eq!(lifetime, 20);
//! assert_eq!(gravity, 1.0);
//! # Ok::<(), fxscope::Error>(())
//! ```
//!
//! # Error Handling
//!
//! All reading functions return [`crate::Error::OutOfBounds`] if there are insufficient bytes in
//! the buffer. Higher layers decide whether that is reported as-is or as a truncated structure.
//!
//! # Thread Safety
//!
//! All functions are pure over the borrowed slice and safe to call concurrently.

use crate::Result;

/// Trait for implementing type-specific safe binary data reading operations.
///
/// Each implementation defines a `Bytes` associated type that represents the fixed-size
/// byte array required for that particular type (e.g., `[u8; 4]` for `u32`).
pub trait FxIO: Sized {
    /// Associated type representing the byte array type for this numeric type.
    type Bytes: Sized + for<'a> TryFrom<&'a [u8]>;

    /// Read T from a byte buffer in big-endian
    fn from_be_bytes(bytes: Self::Bytes) -> Self;

    /// Write T to a byte buffer in big-endian
    fn to_be_bytes(self) -> Self::Bytes;
}

macro_rules! impl_fx_io {
    ($($ty:ty => $len:expr),* $(,)?) => {
        $(
            impl FxIO for $ty {
                type Bytes = [u8; $len];

                fn from_be_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_be_bytes(bytes)
                }

                fn to_be_bytes(self) -> Self::Bytes {
                    <$ty>::to_be_bytes(self)
                }
            }
        )*
    };
}

impl_fx_io!(u8 => 1, i8 => 1, u16 => 2, i16 => 2, u32 => 4, i32 => 4, f32 => 4);

/// Safely reads a value of type `T` in big-endian byte order from the start of a buffer.
///
/// # Errors
///
/// Returns [`crate::Error::OutOfBounds`] if the buffer is shorter than `size_of::<T>()`.
pub fn read_be<T: FxIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_be_at(data, &mut offset)
}

/// Safely reads a value of type `T` in big-endian byte order at `offset`, advancing the offset
/// by the size of `T` on success.
///
/// The offset is left untouched when the read fails.
///
/// # Errors
///
/// Returns [`crate::Error::OutOfBounds`] if `offset + size_of::<T>()` exceeds the buffer length.
pub fn read_be_at<T: FxIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len) else {
        return Err(out_of_bounds_error!());
    };
    if end > data.len() {
        return Err(out_of_bounds_error!());
    }

    let Ok(read) = data[*offset..end].try_into() else {
        return Err(out_of_bounds_error!());
    };

    *offset = end;

    Ok(T::from_be_bytes(read))
}
