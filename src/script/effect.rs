//! Effect script model and decoder.
//!
//! An effect script starts with a fixed 48-byte header followed by an instruction stream that
//! runs up to and including the first `End` instruction:
//!
//! ```text
//! +0x00  u16   kind
//! +0x02  u16   texture_id
//! +0x04  u16   effect_lifetime
//! +0x06  u16   particle_lifetime
//! +0x08  u32   flags
//! +0x0C  f32   gravity
//! +0x10  f32   friction
//! +0x14  f32x3 vel
//! +0x20  f32   unk0
//! +0x24  f32   unk1
//! +0x28  f32   unk2
//! +0x2C  f32   size
//! +0x30  ...   instructions
//! ```

use crate::{
    config::DecodeBudget,
    disassembler::{decode_instruction, Instruction},
    error::BudgetLimit,
    file::{parser::Parser, Buffer},
    Error, Result,
};

/// Size of the fixed effect script header in bytes
pub const EFFECT_HEADER_SIZE: usize = 0x30;

/// A three component float vector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3f {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3f {
    /// Creates a vector from its components.
    #[must_use]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Vec3f { x, y, z }
    }

    fn read(parser: &mut Parser) -> Result<Self> {
        Ok(Vec3f {
            x: parser.read_be::<f32>()?,
            y: parser.read_be::<f32>()?,
            z: parser.read_be::<f32>()?,
        })
    }
}

/// The fixed header of an effect script.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EffectHeader {
    /// Script kind
    pub kind: u16,
    /// Texture used by the particle
    pub texture_id: u16,
    /// Lifetime of the effect in frames
    pub effect_lifetime: u16,
    /// Lifetime of each particle in frames
    pub particle_lifetime: u16,
    /// Initial particle flags
    pub flags: u32,
    /// Initial gravity
    pub gravity: f32,
    /// Initial friction
    pub friction: f32,
    /// Initial velocity
    pub vel: Vec3f,
    /// Unidentified float
    pub unk0: f32,
    /// Unidentified float
    pub unk1: f32,
    /// Unidentified float
    pub unk2: f32,
    /// Initial size
    pub size: f32,
}

impl EffectHeader {
    /// Read a header at the parser position.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if fewer than [`EFFECT_HEADER_SIZE`] bytes remain.
    pub fn read(parser: &mut Parser) -> Result<Self> {
        Ok(EffectHeader {
            kind: parser.read_be::<u16>()?,
            texture_id: parser.read_be::<u16>()?,
            effect_lifetime: parser.read_be::<u16>()?,
            particle_lifetime: parser.read_be::<u16>()?,
            flags: parser.read_be::<u32>()?,
            gravity: parser.read_be::<f32>()?,
            friction: parser.read_be::<f32>()?,
            vel: Vec3f::read(parser)?,
            unk0: parser.read_be::<f32>()?,
            unk1: parser.read_be::<f32>()?,
            unk2: parser.read_be::<f32>()?,
            size: parser.read_be::<f32>()?,
        })
    }
}

/// A decoded effect script.
///
/// The instruction list is never empty, its last element is the `End` instruction and no
/// earlier element is.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectScript {
    /// Absolute offset of the header within the buffer
    pub offset: usize,
    /// Total encoded size, header and instructions
    pub size: usize,
    /// The fixed header
    pub header: EffectHeader,
    /// The instruction stream, `End` included
    pub instructions: Vec<Instruction>,
}

impl EffectScript {
    /// The terminating `End` instruction.
    #[must_use]
    pub fn terminator(&self) -> Option<&Instruction> {
        self.instructions.last()
    }

    /// Ids of the scripts spawned by `MakeScript`, `MakeGenerator` and `MakeId`, in stream
    /// order.
    #[must_use]
    pub fn spawned_script_ids(&self) -> Vec<u16> {
        self.instructions
            .iter()
            .filter_map(Instruction::spawned_script_id)
            .collect()
    }

    /// Offset of the first byte after the `End` instruction.
    #[must_use]
    pub fn end_offset(&self) -> usize {
        self.offset + self.size
    }
}

/// Decodes the effect script whose header starts at `offset`.
///
/// Instructions are decoded until the first `End`, which is included as the final element.
/// Bytes after it are not touched.
///
/// # Errors
///
/// - [`crate::Error::OutOfBounds`] if `offset` lies at or beyond the end of the buffer
/// - [`crate::Error::Truncated`] if the header, an instruction, or the `End` instruction does
///   not fit in the buffer
/// - [`crate::Error::Malformed`] for an unrecognized opcode byte
/// - [`crate::Error::BudgetExceeded`] if the stream outgrows `budget`
///
/// # Examples
///
/// ```rust
/// use fxscope::{decode_effect_script, Buffer, DecodeBudget};
///
/// let mut data = vec![0u8; 0x30];
/// data.extend_from_slice(&[0x05, 0xFF, 0x01, 0x02]); // wait 5, end, padding
///
/// let script = decode_effect_script(Buffer::new(&data), 0, DecodeBudget::default())?;
/// assert_eq!(script.instructions.len(), 2);
/// assert_eq!(script.end_offset(), 0x32);
/// # Ok::<(), fxscope::Error>(())
/// ```
pub fn decode_effect_script(
    buffer: Buffer,
    offset: usize,
    budget: DecodeBudget,
) -> Result<EffectScript> {
    if offset >= buffer.len() {
        return Err(out_of_bounds_error!());
    }

    let truncated = |error: Error| match error {
        Error::OutOfBounds => Error::Truncated { offset },
        other => other,
    };

    let mut parser = buffer.parser_at(offset)?;
    let header = EffectHeader::read(&mut parser).map_err(truncated)?;
    let stream_start = parser.pos();

    let mut instructions = Vec::new();
    loop {
        if instructions.len() >= budget.max_instructions {
            return Err(Error::BudgetExceeded {
                offset,
                limit: BudgetLimit::Instructions(budget.max_instructions),
            });
        }

        let instruction = decode_instruction(&mut parser).map_err(truncated)?;
        if instruction.next_offset() - stream_start > budget.max_bytes {
            return Err(Error::BudgetExceeded {
                offset,
                limit: BudgetLimit::Bytes(budget.max_bytes),
            });
        }

        let terminated = instruction.is_terminator();
        instructions.push(instruction);
        if terminated {
            break;
        }
    }

    Ok(EffectScript {
        offset,
        size: parser.pos() - offset,
        header,
        instructions,
    })
}
