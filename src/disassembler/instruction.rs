//! Decoded instruction model.
//!
//! An [`Instruction`] keeps the raw opcode byte, its classified [`OpcodeCategory`] and an
//! [`Arguments`] payload. Payload shapes are shared between categories with identical layouts
//! (every single-float setter decodes to [`Arguments::Float`], every spawn to
//! [`Arguments::ScriptId`]), so consumers match on the category for meaning and on the
//! arguments for values.

use bitflags::bitflags;

use crate::disassembler::OpcodeCategory;

bitflags! {
    /// Axes present in a position/velocity instruction, taken from the low 3 opcode bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Axes: u8 {
        /// An `x` component follows
        const X = 0x01;
        /// A `y` component follows
        const Y = 0x02;
        /// A `z` component follows
        const Z = 0x04;
    }
}

bitflags! {
    /// Channels present in a color blend instruction, taken from the low 4 opcode bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Channels: u8 {
        /// A red byte follows
        const RED = 0x01;
        /// A green byte follows
        const GREEN = 0x02;
        /// A blue byte follows
        const BLUE = 0x04;
        /// An alpha byte follows
        const ALPHA = 0x08;
    }
}

/// Wait flag: an extra frame byte follows the opcode
pub const WAIT_HAS_EXTRA: u8 = 0x40;
/// Wait flag: a data id byte follows the opcode (after the extra frame byte)
pub const WAIT_HAS_DATA: u8 = 0x20;
/// Wait mask for the base frame count
pub const WAIT_FRAMES_MASK: u8 = 0x1F;

/// Components of a position or velocity instruction. Absent axes are left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VectorArgs {
    /// New or added `x`
    pub x: Option<f32>,
    /// New or added `y`
    pub y: Option<f32>,
    /// New or added `z`
    pub z: Option<f32>,
}

impl VectorArgs {
    /// The set of axes carried by this instruction.
    #[must_use]
    pub fn axes(&self) -> Axes {
        let mut axes = Axes::empty();
        axes.set(Axes::X, self.x.is_some());
        axes.set(Axes::Y, self.y.is_some());
        axes.set(Axes::Z, self.z.is_some());
        axes
    }
}

/// Target color of a blend, reached over `steps` frames. Absent channels are left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorBlendArgs {
    /// Interpolation length in frames
    pub steps: u32,
    /// Target red
    pub red: Option<u8>,
    /// Target green
    pub green: Option<u8>,
    /// Target blue
    pub blue: Option<u8>,
    /// Target alpha
    pub alpha: Option<u8>,
}

impl ColorBlendArgs {
    /// The set of channels carried by this instruction.
    #[must_use]
    pub fn channels(&self) -> Channels {
        let mut channels = Channels::empty();
        channels.set(Channels::RED, self.red.is_some());
        channels.set(Channels::GREEN, self.green.is_some());
        channels.set(Channels::BLUE, self.blue.is_some());
        channels.set(Channels::ALPHA, self.alpha.is_some());
        channels
    }
}

/// The decoded argument payload of an instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arguments {
    /// `Wait`
    Wait {
        /// Total frames, `base + (extra << 5)` when an extra byte is present
        frames: u16,
        /// Optional data id byte
        data_id: Option<u8>,
    },
    /// `SetPos`, `AddPos`, `SetVel`, `AddVel`
    Vector(VectorArgs),
    /// `ColorBlendPrim`, `ColorBlendEnv`
    ColorBlend(ColorBlendArgs),
    /// `SetSizeLerp`
    SizeLerp {
        /// Interpolation length in frames
        steps: u32,
        /// Size reached at the end of the interpolation
        target_size: f32,
    },
    /// `SetSizeRand`
    SizeRand {
        /// Interpolation length in frames
        steps: u32,
        /// Base size
        base_size: f32,
        /// Random scale applied on top of the base
        scale: f32,
    },
    /// `SetFlags`
    Flags {
        /// New flag byte
        flags: u8,
    },
    /// `SetGravity`, `SetFriction`, `SetVelAngle`, `MulVel`, `SetVelMag`
    Float {
        /// The single operand
        value: f32,
    },
    /// `MakeScript`, `MakeGenerator`, `MakeId`
    ScriptId {
        /// Id of the script to spawn
        script_id: u16,
    },
    /// `SetLifeRand`
    LifeRand {
        /// Base lifetime in frames
        base_life: u16,
        /// Random range added to the base
        random_range: u16,
    },
    /// `TryDeadRand`
    Probability {
        /// Chance to destroy the particle
        probability: u8,
    },
    /// `AddVelRand`
    VelRand {
        /// Range on `x`
        x_range: f32,
        /// Range on `y`
        y_range: f32,
        /// Range on `z`
        z_range: f32,
    },
    /// `SetUnk0b`
    ByteRand {
        /// Base value
        base_value: u8,
        /// Random range added to the base
        random_range: u8,
    },
    /// `MulVelAxis`
    VelAxisMul {
        /// Factor on `x`
        x_factor: f32,
        /// Factor on `y`
        y_factor: f32,
        /// Factor on `z`
        z_factor: f32,
    },
    /// `SetAttachId`
    AttachId {
        /// Object to attach to
        attach_id: u16,
    },
    /// `SetLoop`
    LoopCount {
        /// Number of repetitions
        count: u8,
    },
    /// Categories without argument bytes
    None,
}

/// A decoded effect script instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instruction {
    /// Absolute offset of the opcode byte within the buffer
    pub offset: usize,
    /// Encoded size in bytes, opcode included
    pub size: usize,
    /// The raw opcode byte, flag bits included
    pub opcode: u8,
    /// The classified category
    pub category: OpcodeCategory,
    /// The decoded payload
    pub args: Arguments,
}

impl Instruction {
    /// Offset of the byte following this instruction.
    #[must_use]
    pub fn next_offset(&self) -> usize {
        self.offset + self.size
    }

    /// Returns `true` if this instruction ends its script.
    #[must_use]
    pub fn is_terminator(&self) -> bool {
        self.category.is_terminator()
    }

    /// The script id this instruction spawns, if it is a `MakeScript`, `MakeGenerator` or
    /// `MakeId`.
    #[must_use]
    pub fn spawned_script_id(&self) -> Option<u16> {
        match self.args {
            Arguments::ScriptId { script_id } => Some(script_id),
            _ => None,
        }
    }
}
