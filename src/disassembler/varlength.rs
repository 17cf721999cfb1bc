//! Var-length integer codec used for interpolation step counts.
//!
//! The encoding is 1 or 2 bytes wide and biased by one, so zero is not representable:
//!
//! ```text
//! 0xxxxxxx           -> value = x + 1                 (1..=128)
//! 1hhhhhhh llllllll  -> value = (h << 8 | l) + 1      (1..=32768)
//! ```
//!
//! Values up to 128 always use the short form when encoded; the decoder accepts the long form
//! for any value.

use crate::{Error, Result};

/// Smallest value the encoding can carry.
pub const VAR_LENGTH_MIN: u32 = 1;
/// Largest value the encoding can carry.
pub const VAR_LENGTH_MAX: u32 = 0x8000;

/// A decoded var-length integer together with the number of bytes it occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarLength {
    /// Decoded value, always within `1..=32768`
    pub value: u32,
    /// Encoded width in bytes, either 1 or 2
    pub size: usize,
}

impl VarLength {
    /// Decode the var-length integer starting at `offset` in `data`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if the first byte, or a required second byte, is
    /// not available.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fxscope::disassembler::VarLength;
    ///
    /// let decoded = VarLength::decode(&[0x80, 0x80], 0)?;
    /// assert_eq!(decoded.value, 129);
    /// assert_eq!(decoded.size, 2);
    /// # Ok::<(), fxscope::Error>(())
    /// ```
    pub fn decode(data: &[u8], offset: usize) -> Result<VarLength> {
        let Some(&first) = data.get(offset) else {
            return Err(out_of_bounds_error!());
        };

        if first & 0x80 == 0 {
            return Ok(VarLength {
                value: u32::from(first) + 1,
                size: 1,
            });
        }

        let Some(&second) = offset.checked_add(1).and_then(|next| data.get(next)) else {
            return Err(out_of_bounds_error!());
        };

        Ok(VarLength {
            value: ((u32::from(first & 0x7F) << 8) | u32::from(second)) + 1,
            size: 2,
        })
    }

    /// Encode `value` using the shortest form.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidVarLength`] if `value` is outside `1..=32768`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fxscope::disassembler::VarLength;
    ///
    /// assert_eq!(VarLength::encode(1)?, vec![0x00]);
    /// assert_eq!(VarLength::encode(129)?, vec![0x80, 0x80]);
    /// # Ok::<(), fxscope::Error>(())
    /// ```
    pub fn encode(value: u32) -> Result<Vec<u8>> {
        if !(VAR_LENGTH_MIN..=VAR_LENGTH_MAX).contains(&value) {
            return Err(Error::InvalidVarLength(value));
        }

        let biased = value - 1;
        if biased < 0x80 {
            #[allow(clippy::cast_possible_truncation)]
            return Ok(vec![biased as u8]);
        }

        #[allow(clippy::cast_possible_truncation)]
        Ok(vec![0x80 | (biased >> 8) as u8, (biased & 0xFF) as u8])
    }
}
