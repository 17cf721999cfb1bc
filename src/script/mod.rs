//! Effect scripts and the script table that references them.
//!
//! # Key Types
//! - [`EffectScript`] - A decoded header plus its instruction stream
//! - [`ScriptTable`] - The decoded root table, an arena of scripts addressed by [`ScriptId`]
//! - [`DecodeContext`] - Address-keyed memoization shared by one table decode
//!
//! # Main Functions
//! - [`decode_effect_script`] - Decode one script at an absolute offset
//! - [`decode_table`] / [`decode_table_with`] - Decode the root table and every target
//!
//! # Example
//! ```rust
//! use fxscope::script::{decode_table_with, Target};
//! use fxscope::DecoderConfig;
//!
//! let mut data = vec![0, 0, 0, 2, 0, 0, 0, 0x0C, 0, 0, 0, 0x0C];
//! data.extend_from_slice(&[0u8; 0x30]);
//! data.push(0xFF);
//!
//! let table = decode_table_with(&data, DecoderConfig::lenient())?;
//! assert_eq!(table.scripts().len(), 1);
//! assert_eq!(table.target(0), table.target(1));
//! # Ok::<(), fxscope::Error>(())
//! ```

mod context;
mod effect;
mod table;

pub use context::DecodeContext;
pub use effect::{decode_effect_script, EffectHeader, EffectScript, Vec3f, EFFECT_HEADER_SIZE};
pub use table::{decode_table, decode_table_with, RawPointer, ScriptId, ScriptTable, Target};
