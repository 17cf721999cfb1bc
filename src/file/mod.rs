//! Buffer abstraction for effect script blobs.
//!
//! This module provides the read-only view over a loaded game data blob that every decoder
//! works against. The blob is addressed by absolute byte offsets: the pointers stored in a
//! script table are offsets into the same buffer, so a single [`crate::file::Buffer`] is shared
//! by all decoded entities for the duration of a decode.
//!
//! # Key Components
//!
//! - [`crate::file::Buffer`] - Offset-addressed, bounds-checked big-endian reader
//! - [`crate::file::parser::Parser`] - Cursor used for sequential decoding
//! - [`crate::file::io`] - Low-level primitive conversions
//!
//! Loading the blob from disk is left to the caller; the buffer only borrows bytes that already
//! live in memory.
//!
//! # Examples
//!
//! ```rust
//! use fxscope::Buffer;
//!
//! let data = [0x00, 0x00, 0x00, 0x02, 0x3F, 0x80, 0x00, 0x00];
//! let buffer = Buffer::new(&data);
//!
//! assert_eq!(buffer.read_i32(0)?, 2);
//! assert_eq!(buffer.read_f32(4)?, 1.0);
//! assert!(buffer.read_u32(6).is_err());
//! # Ok::<(), fxscope::Error>(())
//! ```

pub mod io;
pub mod parser;

use crate::{
    file::{
        io::{read_be_at, FxIO},
        parser::Parser,
    },
    Result,
};

/// Immutable, offset-addressed view over an effect script blob.
///
/// All reads are big-endian and fail with [`crate::Error::OutOfBounds`] when
/// `offset + width > len`. `Buffer` is `Copy`; handing it to another decoder or thread only
/// copies the slice reference.
#[derive(Debug, Clone, Copy)]
pub struct Buffer<'a> {
    data: &'a [u8],
}

impl<'a> Buffer<'a> {
    /// Wrap a byte slice.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Buffer { data }
    }

    /// Returns the total size of the buffer in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the buffer holds no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the raw bytes backing this buffer.
    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Returns a slice of the buffer at the given offset and length.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if the requested range is out of bounds.
    pub fn data_slice(&self, offset: usize, len: usize) -> Result<&'a [u8]> {
        let Some(end) = offset.checked_add(len) else {
            return Err(out_of_bounds_error!());
        };

        self.data.get(offset..end).ok_or(out_of_bounds_error!())
    }

    /// Read a big-endian value of type `T` at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if `offset + size_of::<T>()` exceeds the length.
    pub fn read_be<T: FxIO>(&self, offset: usize) -> Result<T> {
        let mut position = offset;
        read_be_at(self.data, &mut position)
    }

    /// Read a `u8` at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if `offset` is at or beyond the end of the buffer.
    pub fn read_u8(&self, offset: usize) -> Result<u8> {
        self.read_be(offset)
    }

    /// Read a big-endian `u16` at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if fewer than 2 bytes remain at `offset`.
    pub fn read_u16(&self, offset: usize) -> Result<u16> {
        self.read_be(offset)
    }

    /// Read a big-endian `u32` at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if fewer than 4 bytes remain at `offset`.
    pub fn read_u32(&self, offset: usize) -> Result<u32> {
        self.read_be(offset)
    }

    /// Read a big-endian `i32` at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if fewer than 4 bytes remain at `offset`.
    pub fn read_i32(&self, offset: usize) -> Result<i32> {
        self.read_be(offset)
    }

    /// Read a big-endian IEEE-754 `f32` at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if fewer than 4 bytes remain at `offset`.
    pub fn read_f32(&self, offset: usize) -> Result<f32> {
        self.read_be(offset)
    }

    /// Create a [`Parser`] over the whole buffer, positioned at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if `offset` is at or beyond the end of the buffer.
    pub fn parser_at(&self, offset: usize) -> Result<Parser<'a>> {
        let mut parser = Parser::new(self.data);
        parser.seek(offset)?;
        Ok(parser)
    }
}

impl<'a> From<&'a [u8]> for Buffer<'a> {
    fn from(data: &'a [u8]) -> Self {
        Buffer::new(data)
    }
}
