//! Opcode classification for effect script instructions.
//!
//! The first byte of every instruction selects its category. Some categories occupy a whole
//! range of byte values and use the low bits of the opcode as flags (which axes or color
//! channels follow, how a wait is encoded); the remaining categories are looked up in a closed
//! table. Classification applies the following rules in order, first match wins:
//!
//! | Rule | Byte range            | Category                         |
//! |------|-----------------------|----------------------------------|
//! | 1    | `0x00..=0x7F`         | `Wait`                           |
//! | 2    | `0x80..=0x87`         | `SetPos`                         |
//! | 3    | `0x88..=0x8F`         | `AddPos`                         |
//! | 4    | `0x90..=0x97`         | `SetVel`                         |
//! | 5    | `0x98..=0x9F`         | `AddVel`                         |
//! | 6    | `0xC0..=0xCF`         | `ColorBlendPrim`                 |
//! | 7    | `0xD0..=0xDF`         | `ColorBlendEnv`                  |
//! | 8    | `0xA0..=0xBF`, `0xFA..=0xFF` | table lookup              |
//!
//! Bytes `0xE0..=0xF9` match no rule and are rejected as malformed.

use strum::{Display, EnumCount, EnumIter, IntoStaticStr};

use crate::Result;

/// The category of an effect script instruction, selected by its opcode byte.
///
/// `Display` renders the conventional mnemonic, e.g. `SET_POS` or `END`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, EnumIter, EnumCount,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OpcodeCategory {
    /// Suspend the particle for a number of frames (`0x00..=0x7F`)
    Wait,
    /// Set position, per-axis flags in the low 3 bits (`0x80..=0x87`)
    SetPos,
    /// Add to position (`0x88..=0x8F`)
    AddPos,
    /// Set velocity (`0x90..=0x97`)
    SetVel,
    /// Add to velocity (`0x98..=0x9F`)
    AddVel,
    /// Interpolate towards a target size
    SetSizeLerp,
    /// Set particle flags
    SetFlags,
    /// Set gravity
    SetGravity,
    /// Set friction
    SetFriction,
    /// Spawn a particle from a script
    MakeScript,
    /// Spawn a generator
    MakeGenerator,
    /// Randomize the particle lifetime
    SetLifeRand,
    /// Destroy the particle with a given probability
    TryDeadRand,
    /// Add a random velocity
    AddVelRand,
    /// Set the velocity angle
    SetVelAngle,
    /// Spawn a random particle
    MakeRand,
    /// Multiply velocity uniformly
    MulVel,
    /// Randomize the size
    SetSizeRand,
    /// Set flag bit `0x80`
    SetFlag80,
    /// Clear both texture mask flags
    NoMaskSt,
    /// Set the S texture mask flag
    MaskS,
    /// Set the T texture mask flag
    MaskT,
    /// Set both texture mask flags
    MaskSt,
    /// Enable alpha blending
    AlphaBlend,
    /// Disable dithering
    NoDither,
    /// Enable dithering
    Dither,
    /// Disable noise
    NoNoise,
    /// Enable noise
    Noise,
    /// Derive velocity from distance
    SetDistVel,
    /// Add distance magnitude to velocity
    AddDistVelMag,
    /// Spawn a particle by id
    MakeId,
    /// Randomize the primitive blend color
    PrimBlendRand,
    /// Randomize the environment blend color
    EnvBlendRand,
    /// Set an unidentified byte value with a random range
    SetUnk0b,
    /// Set velocity magnitude
    SetVelMag,
    /// Multiply velocity per axis
    MulVelAxis,
    /// Attach to an object id
    SetAttachId,
    /// Blend the primitive color, per-channel flags in the low 4 bits (`0xC0..=0xCF`)
    ColorBlendPrim,
    /// Blend the environment color (`0xD0..=0xDF`)
    ColorBlendEnv,
    /// Begin a loop with a repeat count
    SetLoop,
    /// Jump back to the loop start
    Loop,
    /// Record a return point
    SetReturn,
    /// Jump to the recorded return point
    Return,
    /// Destroy the particle
    Dead,
    /// Terminate the script
    End,
}

/// Coarse grouping of opcode categories by what they affect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum OpcodeGroup {
    /// Frame timing
    Timing,
    /// Position, velocity, gravity and friction
    Motion,
    /// Size, color and flags that change how the particle looks
    Appearance,
    /// Creation of further particles or generators
    Spawn,
    /// Texture mask, blending, dithering and noise switches
    RenderFlags,
    /// Loops, returns and termination
    Flow,
}

/// Opcodes `0xA0..=0xBF`, indexed by `opcode - 0xA0`
const EXTENDED_OPCODES: [OpcodeCategory; 32] = [
    OpcodeCategory::SetSizeLerp,
    OpcodeCategory::SetFlags,
    OpcodeCategory::SetGravity,
    OpcodeCategory::SetFriction,
    OpcodeCategory::MakeScript,
    OpcodeCategory::MakeGenerator,
    OpcodeCategory::SetLifeRand,
    OpcodeCategory::TryDeadRand,
    OpcodeCategory::AddVelRand,
    OpcodeCategory::SetVelAngle,
    OpcodeCategory::MakeRand,
    OpcodeCategory::MulVel,
    OpcodeCategory::SetSizeRand,
    OpcodeCategory::SetFlag80,
    OpcodeCategory::NoMaskSt,
    OpcodeCategory::MaskS,
    OpcodeCategory::MaskT,
    OpcodeCategory::MaskSt,
    OpcodeCategory::AlphaBlend,
    OpcodeCategory::NoDither,
    OpcodeCategory::Dither,
    OpcodeCategory::NoNoise,
    OpcodeCategory::Noise,
    OpcodeCategory::SetDistVel,
    OpcodeCategory::AddDistVelMag,
    OpcodeCategory::MakeId,
    OpcodeCategory::PrimBlendRand,
    OpcodeCategory::EnvBlendRand,
    OpcodeCategory::SetUnk0b,
    OpcodeCategory::SetVelMag,
    OpcodeCategory::MulVelAxis,
    OpcodeCategory::SetAttachId,
];

/// Opcodes `0xFA..=0xFF`, indexed by `opcode - 0xFA`
const FLOW_OPCODES: [OpcodeCategory; 6] = [
    OpcodeCategory::SetLoop,
    OpcodeCategory::Loop,
    OpcodeCategory::SetReturn,
    OpcodeCategory::Return,
    OpcodeCategory::Dead,
    OpcodeCategory::End,
];

/// Map a raw opcode byte to its category.
///
/// # Errors
///
/// Returns [`crate::Error::Malformed`] for bytes no rule covers (`0xE0..=0xF9`). Such bytes are
/// never guessed at, since a wrong payload width would shift every following instruction.
///
/// # Examples
///
/// ```rust
/// use fxscope::disassembler::{classify, OpcodeCategory};
///
/// assert_eq!(classify(0x83)?, OpcodeCategory::SetPos);
/// assert_eq!(classify(0xC5)?, OpcodeCategory::ColorBlendPrim);
/// assert_eq!(classify(0xBF)?, OpcodeCategory::SetAttachId);
/// assert!(classify(0xE0).is_err());
/// # Ok::<(), fxscope::Error>(())
/// ```
pub fn classify(opcode: u8) -> Result<OpcodeCategory> {
    match opcode {
        0x00..=0x7F => Ok(OpcodeCategory::Wait),
        0x80..=0x87 => Ok(OpcodeCategory::SetPos),
        0x88..=0x8F => Ok(OpcodeCategory::AddPos),
        0x90..=0x97 => Ok(OpcodeCategory::SetVel),
        0x98..=0x9F => Ok(OpcodeCategory::AddVel),
        _ if opcode & 0xF0 == 0xC0 => Ok(OpcodeCategory::ColorBlendPrim),
        _ if opcode & 0xF0 == 0xD0 => Ok(OpcodeCategory::ColorBlendEnv),
        0xA0..=0xBF => Ok(EXTENDED_OPCODES[usize::from(opcode - 0xA0)]),
        0xFA..=0xFF => Ok(FLOW_OPCODES[usize::from(opcode - 0xFA)]),
        _ => Err(malformed_error!("Unrecognized opcode: {:02X}", opcode)),
    }
}

impl OpcodeCategory {
    /// The canonical opcode byte of this category, with all flag bits cleared.
    ///
    /// For flag-carrying categories this is the first byte of their range (`0x80` for
    /// `SetPos`, `0xC0` for `ColorBlendPrim`, `0x00` for `Wait`).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn base_opcode(self) -> u8 {
        match self {
            OpcodeCategory::Wait => 0x00,
            OpcodeCategory::SetPos => 0x80,
            OpcodeCategory::AddPos => 0x88,
            OpcodeCategory::SetVel => 0x90,
            OpcodeCategory::AddVel => 0x98,
            OpcodeCategory::ColorBlendPrim => 0xC0,
            OpcodeCategory::ColorBlendEnv => 0xD0,
            other => {
                if let Some(index) = EXTENDED_OPCODES.iter().position(|c| *c == other) {
                    0xA0 + index as u8
                } else {
                    // Every remaining category lives in the flow table
                    let index = FLOW_OPCODES.iter().position(|c| *c == other).unwrap_or(0);
                    0xFA + index as u8
                }
            }
        }
    }

    /// Returns the group this category belongs to.
    #[must_use]
    pub fn group(self) -> OpcodeGroup {
        match self {
            OpcodeCategory::Wait => OpcodeGroup::Timing,
            OpcodeCategory::SetPos
            | OpcodeCategory::AddPos
            | OpcodeCategory::SetVel
            | OpcodeCategory::AddVel
            | OpcodeCategory::SetGravity
            | OpcodeCategory::SetFriction
            | OpcodeCategory::AddVelRand
            | OpcodeCategory::SetVelAngle
            | OpcodeCategory::MulVel
            | OpcodeCategory::SetDistVel
            | OpcodeCategory::AddDistVelMag
            | OpcodeCategory::SetVelMag
            | OpcodeCategory::MulVelAxis
            | OpcodeCategory::SetAttachId => OpcodeGroup::Motion,
            OpcodeCategory::SetSizeLerp
            | OpcodeCategory::SetSizeRand
            | OpcodeCategory::SetFlags
            | OpcodeCategory::SetFlag80
            | OpcodeCategory::SetLifeRand
            | OpcodeCategory::SetUnk0b
            | OpcodeCategory::ColorBlendPrim
            | OpcodeCategory::ColorBlendEnv
            | OpcodeCategory::PrimBlendRand
            | OpcodeCategory::EnvBlendRand => OpcodeGroup::Appearance,
            OpcodeCategory::MakeScript
            | OpcodeCategory::MakeGenerator
            | OpcodeCategory::MakeRand
            | OpcodeCategory::MakeId => OpcodeGroup::Spawn,
            OpcodeCategory::NoMaskSt
            | OpcodeCategory::MaskS
            | OpcodeCategory::MaskT
            | OpcodeCategory::MaskSt
            | OpcodeCategory::AlphaBlend
            | OpcodeCategory::NoDither
            | OpcodeCategory::Dither
            | OpcodeCategory::NoNoise
            | OpcodeCategory::Noise => OpcodeGroup::RenderFlags,
            OpcodeCategory::TryDeadRand
            | OpcodeCategory::SetLoop
            | OpcodeCategory::Loop
            | OpcodeCategory::SetReturn
            | OpcodeCategory::Return
            | OpcodeCategory::Dead
            | OpcodeCategory::End => OpcodeGroup::Flow,
        }
    }

    /// Returns `true` if instructions of this category carry argument bytes after the opcode.
    ///
    /// A `Wait` without flag bits set carries none; this reports the category-level answer,
    /// so `Wait` counts as payload-carrying.
    #[must_use]
    pub fn has_payload(self) -> bool {
        !matches!(
            self,
            OpcodeCategory::MakeRand
                | OpcodeCategory::SetFlag80
                | OpcodeCategory::NoMaskSt
                | OpcodeCategory::MaskS
                | OpcodeCategory::MaskT
                | OpcodeCategory::MaskSt
                | OpcodeCategory::AlphaBlend
                | OpcodeCategory::NoDither
                | OpcodeCategory::Dither
                | OpcodeCategory::NoNoise
                | OpcodeCategory::Noise
                | OpcodeCategory::SetDistVel
                | OpcodeCategory::AddDistVelMag
                | OpcodeCategory::PrimBlendRand
                | OpcodeCategory::EnvBlendRand
                | OpcodeCategory::Loop
                | OpcodeCategory::SetReturn
                | OpcodeCategory::Return
                | OpcodeCategory::Dead
                | OpcodeCategory::End
        )
    }

    /// Returns `true` for the category that ends an effect script.
    #[must_use]
    pub fn is_terminator(self) -> bool {
        self == OpcodeCategory::End
    }
}
