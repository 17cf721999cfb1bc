//! Cursor-based byte stream parser for effect script decoding.
//!
//! This module provides the [`crate::file::parser::Parser`] type, a cursor over a borrowed byte
//! slice with bounds-checked big-endian reads. The instruction decoder drives a `Parser`
//! sequentially through an instruction stream; all positions are absolute offsets into the
//! underlying buffer, so instruction offsets reported by the decoder can be used directly as
//! pointers into the blob.
//!
//! # Usage Examples
//!
//! ```rust
//! use fxscope::Parser;
//!
//! let data = [0x00, 0x00, 0x00, 0x02, 0x14];
//! let mut parser = Parser::new(&data);
//!
//! let count = parser.read_be::<i32>()?;
//! assert_eq!(count, 2);
//!
//! // 0x14 encodes 21 as a var-length integer
//! let steps = parser.read_var_length()?;
//! assert_eq!(steps, 21);
//! assert!(!parser.has_more_data());
//! # Ok::<(), fxscope::Error>(())
//! ```

use crate::{
    disassembler::VarLength,
    file::io::{read_be_at, FxIO},
    Result,
};

/// A cursor over a borrowed byte slice.
///
/// `Parser` keeps an absolute position within the data and provides bounds checking to
/// prevent overruns when reading malformed or truncated scripts. A failed read never moves
/// the cursor.
#[derive(Debug, Clone)]
pub struct Parser<'a> {
    /// The binary data being parsed
    data: &'a [u8],
    /// Current position within the data buffer
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new [`crate::file::parser::Parser`] positioned at the start of `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Returns the length of the underlying data buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the parser has no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if there is more data available to parse.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Move the current position to the specified index.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if position is at or beyond the data length.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fxscope::Parser;
    /// let data = [0x01, 0x02, 0x03, 0x04];
    /// let mut parser = Parser::new(&data);
    ///
    /// parser.seek(2)?;
    /// assert_eq!(parser.read_be::<u8>()?, 0x03);
    /// # Ok::<(), fxscope::Error>(())
    /// ```
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos >= self.data.len() {
            return Err(out_of_bounds_error!());
        }

        self.position = pos;
        Ok(())
    }

    /// Move the position forward by the specified number of bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if advancing by step would exceed the data length.
    pub fn advance_by(&mut self, step: usize) -> Result<()> {
        match self.position.checked_add(step) {
            Some(end) if end <= self.data.len() => {
                self.position = end;
                Ok(())
            }
            _ => Err(out_of_bounds_error!()),
        }
    }

    /// Get the current position of the parser within the data buffer.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Get access to the underlying data buffer.
    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Peek at the next byte without advancing the position.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if position is at or beyond the data length.
    pub fn peek_byte(&self) -> Result<u8> {
        match self.data.get(self.position) {
            Some(byte) => Ok(*byte),
            None => Err(out_of_bounds_error!()),
        }
    }

    /// Read a big-endian value of type `T` and advance the cursor.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if reading `T` would exceed the data length.
    pub fn read_be<T: FxIO>(&mut self) -> Result<T> {
        read_be_at::<T>(self.data, &mut self.position)
    }

    /// Read a var-length integer and advance the cursor by the 1 or 2 bytes it occupies.
    ///
    /// See [`crate::disassembler::VarLength`] for the encoding.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the encoding extends past the data length.
    pub fn read_var_length(&mut self) -> Result<u32> {
        let decoded = VarLength::decode(self.data, self.position)?;
        self.position += decoded.size;
        Ok(decoded.value)
    }
}
