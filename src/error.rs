use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! out_of_bounds_error {
    () => {
        crate::Error::OutOfBounds
    };
}

/// Identifies which part of a [`crate::config::DecodeBudget`] was exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetLimit {
    /// More instructions than `max_instructions` would have been decoded
    Instructions(usize),
    /// The instruction stream would have grown beyond `max_bytes`
    Bytes(usize),
}

impl std::fmt::Display for BudgetLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BudgetLimit::Instructions(max) => write!(f, "{max} instructions"),
            BudgetLimit::Bytes(max) => write!(f, "{max} bytes"),
        }
    }
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// # Error Categories
///
/// - [`Error::OutOfBounds`] - A primitive read would exceed the buffer
/// - [`Error::Malformed`] - Negative table count or unrecognized opcode byte
/// - [`Error::Truncated`] - The buffer ended inside a structure, or before an `End` instruction
/// - [`Error::BudgetExceeded`] - The decode budget guard tripped
/// - [`Error::InvalidVarLength`] - A value outside `1..=32768` was handed to the encoder
///
/// The type is `Clone` so that a memoized failure can be reported for every table entry that
/// aliases the failing address.
///
/// # Examples
///
/// ```rust
/// use fxscope::{decode_table, Error};
///
/// // count = -1
/// match decode_table(&[0xFF, 0xFF, 0xFF, 0xFF]) {
///     Err(Error::Malformed { message, .. }) => println!("Malformed blob: {}", message),
///     Err(e) => println!("Other error: {}", e),
///     Ok(_) => unreachable!(),
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The buffer is damaged and could not be decoded.
    ///
    /// The error includes the source location where the malformation was detected for
    /// debugging purposes.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while reading the buffer.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// The buffer ended before the structure starting at `offset` was complete.
    ///
    /// Raised when a fixed-size field, an instruction argument, or the terminating `End`
    /// instruction of an effect script lies beyond the end of the buffer.
    #[error("Structure at offset 0x{offset:X} is truncated")]
    Truncated {
        /// Start offset of the structure that could not be completed
        offset: usize,
    },

    /// The decode budget guard tripped.
    ///
    /// The format carries no explicit stream length, so every effect script is decoded under a
    /// bounded budget to guarantee termination on adversarial input.
    #[error("Effect script at offset 0x{offset:X} exceeded the decode budget of {limit}")]
    BudgetExceeded {
        /// Start offset of the effect script being decoded
        offset: usize,
        /// The limit that was hit
        limit: BudgetLimit,
    },

    /// The value can not be represented as a var-length integer.
    #[error("Value {0} is outside the var-length range 1..=32768")]
    InvalidVarLength(u32),
}
