//! # fxscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and functions
//! of the fxscope library. Import it to get quick access to everything needed to decode and
//! inspect effect scripts.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all fxscope operations
pub use crate::{BudgetLimit, Error};

/// The result type used throughout fxscope
pub use crate::Result;

/// Decoder configuration
pub use crate::config::{DecodeBudget, DecoderConfig, TablePolicy};

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Table and script decoding
pub use crate::script::{decode_effect_script, decode_table, decode_table_with};

/// Low-level buffer access
pub use crate::{Buffer, Parser};

// ================================================================================================
// Script Model
// ================================================================================================

/// Decoded tables and scripts
pub use crate::script::{
    DecodeContext, EffectHeader, EffectScript, RawPointer, ScriptId, ScriptTable, Target, Vec3f,
};

// ================================================================================================
// Instructions
// ================================================================================================

/// Instruction decoding and model
pub use crate::disassembler::{
    classify, decode_instruction, decode_one, Arguments, Axes, Channels, ColorBlendArgs,
    Instruction, OpcodeCategory, OpcodeGroup, VarLength, VectorArgs,
};
