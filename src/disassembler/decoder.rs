//! Effect script instruction decoding.
//!
//! This module turns raw bytes into [`Instruction`]s. Decoding is all-or-nothing: the payload
//! width of every instruction depends on its opcode byte (range, table entry and embedded flag
//! bits), and a wrongly sized payload would shift every following instruction. Unknown opcodes
//! are therefore rejected instead of skipped.
//!
//! # Example: Decoding a Single Instruction
//!
//! ```rust
//! use fxscope::{disassembler::{decode_instruction, Arguments, OpcodeCategory}, Parser};
//!
//! // SET_SIZE_LERP over 21 frames to 250.0
//! let code = [0xA0, 0x14, 0x43, 0x7A, 0x00, 0x00];
//! let mut parser = Parser::new(&code);
//! let instr = decode_instruction(&mut parser)?;
//!
//! assert_eq!(instr.category, OpcodeCategory::SetSizeLerp);
//! assert_eq!(instr.size, 6);
//! assert!(matches!(instr.args, Arguments::SizeLerp { steps: 21, target_size } if target_size == 250.0));
//! # Ok::<(), fxscope::Error>(())
//! ```

use crate::{
    disassembler::{
        classify, Arguments, Axes, Channels, ColorBlendArgs, Instruction, OpcodeCategory,
        VectorArgs, WAIT_FRAMES_MASK, WAIT_HAS_DATA, WAIT_HAS_EXTRA,
    },
    file::{parser::Parser, Buffer},
    Result,
};

/// Decodes a single instruction at the current parser position and advances past it.
///
/// # Errors
///
/// Returns [`crate::Error::Malformed`] for an unrecognized opcode byte and
/// [`crate::Error::OutOfBounds`] if the opcode or any argument lies beyond the data. The parser
/// position is unspecified after an error.
pub fn decode_instruction(parser: &mut Parser) -> Result<Instruction> {
    let offset = parser.pos();
    let opcode = parser.read_be::<u8>()?;
    let category = classify(opcode)?;

    let args = match category {
        OpcodeCategory::Wait => {
            let base = u16::from(opcode & WAIT_FRAMES_MASK);
            let frames = if opcode & WAIT_HAS_EXTRA != 0 {
                let extra = u16::from(parser.read_be::<u8>()?);
                base + (extra << 5)
            } else {
                base
            };
            let data_id = if opcode & WAIT_HAS_DATA != 0 {
                Some(parser.read_be::<u8>()?)
            } else {
                None
            };

            Arguments::Wait { frames, data_id }
        }
        OpcodeCategory::SetPos
        | OpcodeCategory::AddPos
        | OpcodeCategory::SetVel
        | OpcodeCategory::AddVel => {
            let axes = Axes::from_bits_truncate(opcode);
            let mut args = VectorArgs::default();
            if axes.contains(Axes::X) {
                args.x = Some(parser.read_be::<f32>()?);
            }
            if axes.contains(Axes::Y) {
                args.y = Some(parser.read_be::<f32>()?);
            }
            if axes.contains(Axes::Z) {
                args.z = Some(parser.read_be::<f32>()?);
            }

            Arguments::Vector(args)
        }
        OpcodeCategory::ColorBlendPrim | OpcodeCategory::ColorBlendEnv => {
            let channels = Channels::from_bits_truncate(opcode);
            let mut args = ColorBlendArgs {
                steps: parser.read_var_length()?,
                red: None,
                green: None,
                blue: None,
                alpha: None,
            };
            if channels.contains(Channels::RED) {
                args.red = Some(parser.read_be::<u8>()?);
            }
            if channels.contains(Channels::GREEN) {
                args.green = Some(parser.read_be::<u8>()?);
            }
            if channels.contains(Channels::BLUE) {
                args.blue = Some(parser.read_be::<u8>()?);
            }
            if channels.contains(Channels::ALPHA) {
                args.alpha = Some(parser.read_be::<u8>()?);
            }

            Arguments::ColorBlend(args)
        }
        OpcodeCategory::SetSizeLerp => Arguments::SizeLerp {
            steps: parser.read_var_length()?,
            target_size: parser.read_be::<f32>()?,
        },
        OpcodeCategory::SetSizeRand => Arguments::SizeRand {
            steps: parser.read_var_length()?,
            base_size: parser.read_be::<f32>()?,
            scale: parser.read_be::<f32>()?,
        },
        OpcodeCategory::SetFlags => Arguments::Flags {
            flags: parser.read_be::<u8>()?,
        },
        OpcodeCategory::SetGravity
        | OpcodeCategory::SetFriction
        | OpcodeCategory::SetVelAngle
        | OpcodeCategory::MulVel
        | OpcodeCategory::SetVelMag => Arguments::Float {
            value: parser.read_be::<f32>()?,
        },
        OpcodeCategory::MakeScript | OpcodeCategory::MakeGenerator | OpcodeCategory::MakeId => {
            Arguments::ScriptId {
                script_id: parser.read_be::<u16>()?,
            }
        }
        OpcodeCategory::SetLifeRand => Arguments::LifeRand {
            base_life: parser.read_be::<u16>()?,
            random_range: parser.read_be::<u16>()?,
        },
        OpcodeCategory::TryDeadRand => Arguments::Probability {
            probability: parser.read_be::<u8>()?,
        },
        OpcodeCategory::AddVelRand => Arguments::VelRand {
            x_range: parser.read_be::<f32>()?,
            y_range: parser.read_be::<f32>()?,
            z_range: parser.read_be::<f32>()?,
        },
        OpcodeCategory::SetUnk0b => Arguments::ByteRand {
            base_value: parser.read_be::<u8>()?,
            random_range: parser.read_be::<u8>()?,
        },
        OpcodeCategory::MulVelAxis => Arguments::VelAxisMul {
            x_factor: parser.read_be::<f32>()?,
            y_factor: parser.read_be::<f32>()?,
            z_factor: parser.read_be::<f32>()?,
        },
        OpcodeCategory::SetAttachId => Arguments::AttachId {
            attach_id: parser.read_be::<u16>()?,
        },
        OpcodeCategory::SetLoop => Arguments::LoopCount {
            count: parser.read_be::<u8>()?,
        },
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
        | OpcodeCategory::End => Arguments::None,
    };

    let instruction = Instruction {
        offset,
        size: parser.pos() - offset,
        opcode,
        category,
        args,
    };
    log::trace!(
        "0x{:06X}: {} ({} bytes)",
        instruction.offset,
        instruction.category,
        instruction.size
    );

    Ok(instruction)
}

/// Decodes the instruction at `offset` in `buffer`, returning it together with the number of
/// bytes it consumed.
///
/// # Errors
///
/// Returns [`crate::Error::OutOfBounds`] if `offset` or any argument lies beyond the buffer and
/// [`crate::Error::Malformed`] for an unrecognized opcode byte.
///
/// # Examples
///
/// ```rust
/// use fxscope::{disassembler::{decode_one, Axes, Arguments}, Buffer};
///
/// let data = [0x83, 0x42, 0x4C, 0x00, 0x00, 0x44, 0xC2, 0x00, 0x00];
/// let (instr, consumed) = decode_one(Buffer::new(&data), 0)?;
///
/// assert_eq!(consumed, 9);
/// if let Arguments::Vector(args) = instr.args {
///     assert_eq!(args.axes(), Axes::X | Axes::Y);
/// }
/// # Ok::<(), fxscope::Error>(())
/// ```
pub fn decode_one(buffer: Buffer, offset: usize) -> Result<(Instruction, usize)> {
    let mut parser = buffer.parser_at(offset)?;
    let instruction = decode_instruction(&mut parser)?;
    let consumed = instruction.size;

    Ok((instruction, consumed))
}

#[cfg(test)]
mod tests {
    use crate::{
        disassembler::{
            decode_instruction, decode_one, Arguments, Axes, Channels, ColorBlendArgs,
            OpcodeCategory, VectorArgs,
        },
        file::{parser::Parser, Buffer},
        Error,
    };

    fn decode(code: &[u8]) -> crate::disassembler::Instruction {
        let mut parser = Parser::new(code);
        let instr = decode_instruction(&mut parser).unwrap();
        assert_eq!(parser.pos(), code.len(), "instruction did not consume all bytes");
        instr
    }

    #[test]
    fn wait_plain() {
        let instr = decode(&[0x05]);
        assert_eq!(instr.category, OpcodeCategory::Wait);
        assert_eq!(instr.size, 1);
        assert_eq!(
            instr.args,
            Arguments::Wait {
                frames: 5,
                data_id: None
            }
        );
    }

    #[test]
    fn wait_extra_frames() {
        // bit6 set, base 0, extra 2 -> 0 + (2 << 5)
        let instr = decode(&[0x40, 0x02]);
        assert_eq!(
            instr.args,
            Arguments::Wait {
                frames: 64,
                data_id: None
            }
        );
        assert_eq!(instr.size, 2);

        let instr = decode(&[0x4C, 0x01]);
        assert_eq!(
            instr.args,
            Arguments::Wait {
                frames: 12 + 32,
                data_id: None
            }
        );
    }

    #[test]
    fn wait_data_id() {
        let instr = decode(&[0x25, 0x7B]);
        assert_eq!(
            instr.args,
            Arguments::Wait {
                frames: 5,
                data_id: Some(123)
            }
        );
    }

    #[test]
    fn wait_both_flags() {
        // 0x60: extra byte first, then data id
        let instr = decode(&[0x60, 0x02, 0x09]);
        assert_eq!(
            instr.args,
            Arguments::Wait {
                frames: 64,
                data_id: Some(9)
            }
        );
        assert_eq!(instr.size, 3);

        let instr = decode(&[0x7F, 0xFF, 0x00]);
        assert_eq!(
            instr.args,
            Arguments::Wait {
                frames: 31 + (255 << 5),
                data_id: Some(0)
            }
        );
    }

    #[test]
    fn set_pos_two_axes() {
        let instr = decode(&[0x83, 0x42, 0x4C, 0x00, 0x00, 0x44, 0xC2, 0x00, 0x00]);
        assert_eq!(instr.category, OpcodeCategory::SetPos);
        assert_eq!(instr.size, 9);
        match instr.args {
            Arguments::Vector(args) => {
                assert_eq!(args.axes(), Axes::X | Axes::Y);
                assert_eq!(args.x, Some(51.0));
                assert_eq!(args.y, Some(1552.0));
                assert_eq!(args.z, None);
            }
            _ => panic!("Expected Arguments::Vector"),
        }
    }

    #[test]
    fn set_pos_all_axes() {
        let instr = decode(&[
            0x87, 0x42, 0x4C, 0x00, 0x00, 0x44, 0xC2, 0x00, 0x00, 0xC2, 0x80, 0x00, 0x00,
        ]);
        assert_eq!(
            instr.args,
            Arguments::Vector(VectorArgs {
                x: Some(51.0),
                y: Some(1552.0),
                z: Some(-64.0)
            })
        );
    }

    #[test]
    fn vector_categories() {
        assert_eq!(decode(&[0x88]).category, OpcodeCategory::AddPos);
        assert_eq!(
            decode(&[0x94, 0x3F, 0x80, 0x00, 0x00]).category,
            OpcodeCategory::SetVel
        );
        let instr = decode(&[0x9A, 0x40, 0x00, 0x00, 0x00]);
        assert_eq!(instr.category, OpcodeCategory::AddVel);
        assert_eq!(
            instr.args,
            Arguments::Vector(VectorArgs {
                x: None,
                y: Some(2.0),
                z: None
            })
        );
    }

    #[test]
    fn color_blend_prim_red_blue() {
        let instr = decode(&[0xC5, 0x00, 0x11, 0x22]);
        assert_eq!(instr.category, OpcodeCategory::ColorBlendPrim);
        match instr.args {
            Arguments::ColorBlend(args) => {
                assert_eq!(args.channels(), Channels::RED | Channels::BLUE);
                assert_eq!(args.steps, 1);
                assert_eq!(args.red, Some(0x11));
                assert_eq!(args.blue, Some(0x22));
            }
            _ => panic!("Expected Arguments::ColorBlend"),
        }
    }

    #[test]
    fn color_blend_all_channels() {
        let instr = decode(&[0xCF, 0x3C, 0xFF, 0xFF, 0xFF, 0x00]);
        assert_eq!(
            instr.args,
            Arguments::ColorBlend(ColorBlendArgs {
                steps: 61,
                red: Some(255),
                green: Some(255),
                blue: Some(255),
                alpha: Some(0)
            })
        );

        let instr = decode(&[0xDF, 0x01, 0x80, 0xFF, 0xFF, 0xFF]);
        assert_eq!(instr.category, OpcodeCategory::ColorBlendEnv);
        assert_eq!(
            instr.args,
            Arguments::ColorBlend(ColorBlendArgs {
                steps: 2,
                red: Some(128),
                green: Some(255),
                blue: Some(255),
                alpha: Some(255)
            })
        );
    }

    #[test]
    fn color_blend_long_steps() {
        let instr = decode(&[0xC8, 0x80, 0x80, 0x40]);
        assert_eq!(
            instr.args,
            Arguments::ColorBlend(ColorBlendArgs {
                steps: 129,
                red: None,
                green: None,
                blue: None,
                alpha: Some(0x40)
            })
        );
        assert_eq!(instr.size, 4);
    }

    #[test]
    fn size_instructions() {
        let instr = decode(&[0xA0, 0x14, 0x43, 0x7A, 0x00, 0x00]);
        assert_eq!(
            instr.args,
            Arguments::SizeLerp {
                steps: 21,
                target_size: 250.0
            }
        );

        let instr = decode(&[0xAC, 0x00, 0x40, 0xA0, 0x00, 0x00, 0x41, 0xF0, 0x00, 0x00]);
        assert_eq!(
            instr.args,
            Arguments::SizeRand {
                steps: 1,
                base_size: 5.0,
                scale: 30.0
            }
        );
    }

    #[test]
    fn scalar_instructions() {
        assert_eq!(decode(&[0xA1, 0x80]).args, Arguments::Flags { flags: 0x80 });
        assert_eq!(
            decode(&[0xAB, 0x40, 0x00, 0x00, 0x00]).args,
            Arguments::Float { value: 2.0 }
        );
        assert_eq!(
            decode(&[0xA2, 0x3F, 0x80, 0x00, 0x00]).category,
            OpcodeCategory::SetGravity
        );
        assert_eq!(
            decode(&[0xBD, 0x3F, 0x00, 0x00, 0x00]).args,
            Arguments::Float { value: 0.5 }
        );
        match decode(&[0xA9, 0x3E, 0xB2, 0xB8, 0xC2]).args {
            Arguments::Float { value } => assert!((value - 0.349_065_84).abs() < 1e-6),
            _ => panic!("Expected Arguments::Float"),
        }
    }

    #[test]
    fn spawn_instructions() {
        let instr = decode(&[0xA4, 0x00, 0x48]);
        assert_eq!(instr.category, OpcodeCategory::MakeScript);
        assert_eq!(instr.spawned_script_id(), Some(72));

        let instr = decode(&[0xA5, 0x00, 0x17]);
        assert_eq!(instr.category, OpcodeCategory::MakeGenerator);
        assert_eq!(instr.args, Arguments::ScriptId { script_id: 23 });

        let instr = decode(&[0xB9, 0x01, 0x00]);
        assert_eq!(instr.category, OpcodeCategory::MakeId);
        assert_eq!(instr.spawned_script_id(), Some(256));
    }

    #[test]
    fn random_instructions() {
        assert_eq!(
            decode(&[0xA6, 0x00, 0x32, 0x00, 0x32]).args,
            Arguments::LifeRand {
                base_life: 50,
                random_range: 50
            }
        );
        assert_eq!(
            decode(&[0xA7, 0x0A]).args,
            Arguments::Probability { probability: 10 }
        );
        assert_eq!(
            decode(&[0xBC, 0x00, 0x03]).args,
            Arguments::ByteRand {
                base_value: 0,
                random_range: 3
            }
        );
        assert_eq!(
            decode(&[0xA8, 0x3F, 0x80, 0x00, 0x00, 0x40, 0x00, 0x00, 0x00, 0x40, 0x40, 0x00, 0x00])
                .args,
            Arguments::VelRand {
                x_range: 1.0,
                y_range: 2.0,
                z_range: 3.0
            }
        );
    }

    #[test]
    fn misc_payloads() {
        assert_eq!(
            decode(&[0xBE, 0x3F, 0x00, 0x00, 0x00, 0x3F, 0x80, 0x00, 0x00, 0x40, 0x00, 0x00, 0x00])
                .args,
            Arguments::VelAxisMul {
                x_factor: 0.5,
                y_factor: 1.0,
                z_factor: 2.0
            }
        );
        assert_eq!(
            decode(&[0xBF, 0x00, 0x07]).args,
            Arguments::AttachId { attach_id: 7 }
        );
        assert_eq!(decode(&[0xFA, 0x03]).args, Arguments::LoopCount { count: 3 });
    }

    #[test]
    fn no_payload_instructions() {
        for opcode in [
            0xAA_u8, 0xAD, 0xAE, 0xAF, 0xB0, 0xB1, 0xB2, 0xB3, 0xB4, 0xB5, 0xB6, 0xB7, 0xB8, 0xBA,
            0xBB, 0xFB, 0xFC, 0xFD, 0xFE, 0xFF,
        ] {
            let instr = decode(&[opcode]);
            assert_eq!(instr.size, 1, "opcode {:02X}", opcode);
            assert_eq!(instr.args, Arguments::None);
            assert!(!instr.category.has_payload());
        }
    }

    #[test]
    fn end_does_not_consume_following_bytes() {
        let code = [0xFF, 0x01, 0x02, 0x03];
        let mut parser = Parser::new(&code);
        let instr = decode_instruction(&mut parser).unwrap();

        assert!(instr.is_terminator());
        assert_eq!(parser.pos(), 1);
    }

    #[test]
    fn unrecognized_opcode() {
        let mut parser = Parser::new(&[0xF0, 0x00]);
        assert!(matches!(
            decode_instruction(&mut parser),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn truncated_argument() {
        let mut parser = Parser::new(&[0x87, 0x42, 0x4C, 0x00, 0x00, 0x44]);
        assert_eq!(decode_instruction(&mut parser), Err(Error::OutOfBounds));

        let mut parser = Parser::new(&[0xC1, 0x80]);
        assert_eq!(decode_instruction(&mut parser), Err(Error::OutOfBounds));
    }

    #[test]
    fn decode_one_reports_consumed() {
        let data = [0x00, 0x00, 0xC5, 0x00, 0x11, 0x22, 0xFF];
        let buffer = Buffer::new(&data);

        let (instr, consumed) = decode_one(buffer, 2).unwrap();
        assert_eq!(instr.offset, 2);
        assert_eq!(consumed, 4);
        assert_eq!(instr.next_offset(), 6);

        let (end, consumed) = decode_one(buffer, 6).unwrap();
        assert!(end.is_terminator());
        assert_eq!(consumed, 1);

        assert_eq!(decode_one(buffer, 7), Err(Error::OutOfBounds));
    }
}
