// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # fxscope
//!
//! A decoder for the big-endian "Effect Script" particle bytecode found in the data blobs of a
//! legacy game engine. Each script describes the behavior of a particle over time: position,
//! velocity, size, color and lifetime updates, child particle spawns and loops.
//!
//! `fxscope` turns a raw byte buffer into an immutable, typed tree:
//!
//! ```text
//! ScriptTable ── RawPointer ──> EffectScript ── header
//!                                            └─ [Instruction; n] (last one is End)
//! ```
//!
//! ## Features
//!
//! - **Bounds-checked reading** - every primitive read is checked, nothing panics on bad input
//! - **Exact opcode classification** - range, mask and table rules applied in fixed precedence
//! - **Flag driven payloads** - axis, channel and wait flags decide which fields are present
//! - **Decode budget** - every instruction stream is bounded, damaged data always terminates
//! - **Memoized resolution** - aliased pointers decode their target exactly once
//! - **Parallel decoding** - distinct targets can be decoded on the rayon pool
//!
//! ## Quick Start
//!
//! ```rust
//! use fxscope::prelude::*;
//!
//! // One entry pointing at offset 8, followed by a script that waits 5 frames and ends.
//! let mut data = vec![0, 0, 0, 1, 0, 0, 0, 8];
//! data.extend_from_slice(&[0u8; 0x30]);
//! data.extend_from_slice(&[0x05, 0xFF]);
//!
//! let table = decode_table(&data)?;
//! let script = table.script(0).unwrap();
//!
//! assert_eq!(script.instructions[0].category, OpcodeCategory::Wait);
//! assert_eq!(script.instructions[0].args, Arguments::Wait { frames: 5, data_id: None });
//! # Ok::<(), fxscope::Error>(())
//! ```
//!
//! ## Configuration
//!
//! [`DecoderConfig`] selects the decode budget, the failure policy and parallelism:
//!
//! ```rust
//! use fxscope::{decode_table_with, DecodeBudget, DecoderConfig};
//!
//! let config = DecoderConfig::lenient()
//!     .with_budget(DecodeBudget::new(1024, 0x4000))
//!     .with_parallel(true);
//!
//! let table = decode_table_with(&[0, 0, 0, 0], config)?;
//! assert!(table.is_complete());
//! # Ok::<(), fxscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`disassembler`] - opcode classification, var-length integers and instruction decoding
//! - [`script`] - effect script headers, the decode context and the script table
//! - [`prelude`] - convenient re-exports of commonly used types
//! - [`Error`] and [`Result`] - error handling
//!
//! ## Error Handling
//!
//! ```rust
//! use fxscope::{decode_table, Error};
//!
//! // count = 1, pointer far beyond the buffer
//! match decode_table(&[0, 0, 0, 1, 0, 0, 0x10, 0]) {
//!     Err(Error::OutOfBounds) => println!("Dangling pointer"),
//!     Err(Error::Truncated { offset }) => println!("Truncated at 0x{:X}", offset),
//!     Err(e) => println!("Other error: {}", e),
//!     Ok(_) => unreachable!(),
//! }
//! ```
//!
//! ## Logging
//!
//! The crate logs through the [`log`](https://docs.rs/log) facade and never installs a logger.
//! Table decodes are reported at `debug`, single instructions and cache hits at `trace`, and
//! failed targets in lenient mode at `warn`.
//!
//! ## Development and Testing
//!
//! ```bash
//! cargo test
//! cargo bench
//! cargo +nightly fuzz run script_table --release
//! ```

#[macro_use]
pub(crate) mod error;
pub(crate) mod file;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use fxscope::prelude::*;
///
/// let table = decode_table(&[0, 0, 0, 0])?;
/// assert!(table.is_empty());
/// # Ok::<(), fxscope::Error>(())
/// ```
pub mod prelude;

/// Decoder configuration: budget, table policy and parallelism
pub mod config;

/// Instruction decoding for effect script bytecode.
///
/// # Key Types
///
/// - [`disassembler::Instruction`] - A decoded instruction
/// - [`disassembler::OpcodeCategory`] - What an opcode byte does
/// - [`disassembler::Arguments`] - The category specific payload
/// - [`disassembler::VarLength`] - The biased 1-2 byte integer codec
///
/// # Main Functions
///
/// - [`disassembler::classify`] - Classify a single opcode byte
/// - [`disassembler::decode_instruction`] - Decode the instruction at a parser position
/// - [`disassembler::decode_one`] - Decode the instruction at a buffer offset
pub mod disassembler;

/// Effect scripts and the script table.
///
/// # Key Types
///
/// - [`script::ScriptTable`] - The decoded root table
/// - [`script::EffectScript`] - A header and its instruction stream
/// - [`script::DecodeContext`] - Per-table memoization of decoded addresses
pub mod script;

/// `fxscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `fxscope` Error type
///
/// # Examples
///
/// ```rust
/// use fxscope::{decode_table, Error};
///
/// assert_eq!(decode_table(&[0, 0]).unwrap_err(), Error::Truncated { offset: 0 });
/// ```
pub use error::{BudgetLimit, Error};

/// Offset addressed, bounds-checked view over the input bytes
pub use file::Buffer;

/// Cursor used for sequential reads
pub use file::parser::Parser;

/// Decoder configuration
pub use config::{DecodeBudget, DecoderConfig, TablePolicy};

/// Instruction level entry points
pub use disassembler::{decode_instruction, decode_one};

/// Script level entry points
pub use script::{decode_effect_script, decode_table, decode_table_with};
