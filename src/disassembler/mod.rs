//! Effect script instruction decoding engine.
//!
//! This module provides everything needed to turn the bytes of an effect script instruction
//! stream into typed instructions: opcode classification, the var-length integer codec used for
//! interpolation step counts, the instruction model and the instruction decoder.
//!
//! # Key Types
//! - [`Instruction`] - A decoded instruction with its offset, size and payload
//! - [`OpcodeCategory`] - The category selected by an opcode byte
//! - [`Arguments`] - The category-specific payload
//! - [`VarLength`] - The 1-2 byte biased integer encoding
//!
//! # Main Functions
//! - [`classify`] - Map an opcode byte to its category
//! - [`decode_instruction`] - Decode one instruction from a [`crate::Parser`]
//! - [`decode_one`] - Decode one instruction at an offset of a [`crate::Buffer`]
//!
//! # Example
//! ```rust
//! use fxscope::disassembler::{decode_instruction, OpcodeCategory};
//! use fxscope::Parser;
//!
//! let bytecode = &[0x05, 0xFF]; // wait 5, end
//! let mut parser = Parser::new(bytecode);
//! let wait = decode_instruction(&mut parser)?;
//! let end = decode_instruction(&mut parser)?;
//!
//! assert_eq!(wait.category, OpcodeCategory::Wait);
//! assert!(end.is_terminator());
//! # Ok::<(), fxscope::Error>(())
//! ```

mod decoder;
mod instruction;
mod opcode;
mod varlength;

pub use decoder::{decode_instruction, decode_one};
pub use instruction::{
    Arguments, Axes, Channels, ColorBlendArgs, Instruction, VectorArgs, WAIT_FRAMES_MASK,
    WAIT_HAS_DATA, WAIT_HAS_EXTRA,
};
pub use opcode::{classify, OpcodeCategory, OpcodeGroup};
pub use varlength::{VarLength, VAR_LENGTH_MAX, VAR_LENGTH_MIN};
