//! Sequence command definitions and decoding

use crate::error::{Error, Result};
use crate::rseq::SeqReader;
use serde::Serialize;

/// Sequence command opcodes. Bytes below 0x80 are implicit note-ons.
pub mod opcode {
    pub const WAIT: u8 = 0x80;
    pub const PROGRAM: u8 = 0x81;
    pub const OPEN_TRACK: u8 = 0x88;
    pub const JUMP: u8 = 0x89;
    pub const CALL: u8 = 0x8A;
    pub const PAN: u8 = 0xC0;
    pub const VOLUME: u8 = 0xC1;
    pub const MAIN_VOLUME: u8 = 0xC2;
    pub const TRANSPOSE: u8 = 0xC3;
    pub const PITCH_BEND: u8 = 0xC4;
    pub const BEND_RANGE: u8 = 0xC5;
    pub const PRIORITY: u8 = 0xC6;
    pub const POLYPHONY: u8 = 0xC7;
    pub const TIE: u8 = 0xC8;
    pub const PORTAMENTO_CONTROL: u8 = 0xC9;
    pub const MOD_DEPTH: u8 = 0xCA;
    pub const MOD_SPEED: u8 = 0xCB;
    pub const MOD_TYPE: u8 = 0xCC;
    pub const MOD_RANGE: u8 = 0xCD;
    pub const PORTAMENTO: u8 = 0xCE;
    pub const PORTAMENTO_TIME: u8 = 0xCF;
    pub const ATTACK: u8 = 0xD0;
    pub const DECAY: u8 = 0xD1;
    pub const SUSTAIN: u8 = 0xD2;
    pub const RELEASE: u8 = 0xD3;
    pub const LOOP_START: u8 = 0xD4;
    pub const EXPRESSION: u8 = 0xD5;
    pub const PRINT_VAR: u8 = 0xD6;
    pub const MOD_DELAY: u8 = 0xE0;
    pub const TEMPO: u8 = 0xE1;
    pub const SWEEP_PITCH: u8 = 0xE3;
    pub const LOOP_END: u8 = 0xFC;
    pub const RETURN: u8 = 0xFD;
    pub const TRACK_USAGE: u8 = 0xFE;
    pub const END: u8 = 0xFF;
}

/// A decoded sequence command
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum SeqCommand {
    /// Implicit note-on: key byte below 0x80, velocity, varint duration
    Note { key: u8, velocity: u8, length: u32 },
    /// Advance track time
    Wait { ticks: u32 },
    /// Program change (chained bank-select bytes consumed and discarded)
    Program { number: u8 },
    /// Activate another track's cursor at a sequence-relative offset
    OpenTrack { track: u8, offset: u32 },
    Jump { offset: u32 },
    Call { offset: u32 },
    Return,
    Pan { value: u8 },
    Volume { value: u8 },
    MainVolume { value: u8 },
    Transpose { value: u8 },
    PitchBend { value: u8 },
    BendRange { value: u8 },
    Priority { value: u8 },
    Polyphony { value: u8 },
    Tie { value: u8 },
    PortamentoControl { value: u8 },
    ModDepth { value: u8 },
    ModSpeed { value: u8 },
    ModType { value: u8 },
    ModRange { value: u8 },
    Portamento { value: u8 },
    PortamentoTime { value: u8 },
    Attack { value: u8 },
    Decay { value: u8 },
    Sustain { value: u8 },
    Release { value: u8 },
    LoopStart,
    Expression { value: u8 },
    PrintVar { value: u8 },
    ModDelay { value: u16 },
    Tempo { value: u16 },
    SweepPitch { value: u16 },
    LoopEnd,
    TrackUsage { mask: u16 },
    End,
    /// Recognized-but-unassigned opcode with a single argument byte
    Unknown { opcode: u8, value: u8 },
}

/// Decode one command at the reader's current position. An unrecognized
/// opcode is returned as an error without consuming argument bytes, since
/// its width cannot be guessed.
pub fn read_command(reader: &mut SeqReader) -> Result<SeqCommand> {
    let at = reader.position() as u32;
    let op = reader.read_u8()?;

    if op < 0x80 {
        let velocity = reader.read_u8()?;
        let length = reader.read_varint()?;
        return Ok(SeqCommand::Note {
            key: op,
            velocity,
            length,
        });
    }

    let cmd = match op {
        opcode::WAIT => SeqCommand::Wait {
            ticks: reader.read_varint()?,
        },
        opcode::PROGRAM => {
            let mut b = reader.read_u8()?;
            let number = b & 0x7F;
            // top bit chains up to two bank-select bytes
            if b & 0x80 != 0 {
                b = reader.read_u8()?;
            }
            if b & 0x80 != 0 {
                reader.read_u8()?;
            }
            SeqCommand::Program { number }
        }
        opcode::OPEN_TRACK => {
            let track = reader.read_u8()?;
            let offset = reader.read_u24_be()?;
            SeqCommand::OpenTrack { track, offset }
        }
        opcode::JUMP => SeqCommand::Jump {
            offset: reader.read_u24_be()?,
        },
        opcode::CALL => SeqCommand::Call {
            offset: reader.read_u24_be()?,
        },
        opcode::RETURN => SeqCommand::Return,
        opcode::PAN => SeqCommand::Pan {
            value: reader.read_u8()?,
        },
        opcode::VOLUME => SeqCommand::Volume {
            value: reader.read_u8()?,
        },
        opcode::MAIN_VOLUME => SeqCommand::MainVolume {
            value: reader.read_u8()?,
        },
        opcode::TRANSPOSE => SeqCommand::Transpose {
            value: reader.read_u8()?,
        },
        opcode::PITCH_BEND => SeqCommand::PitchBend {
            value: reader.read_u8()?,
        },
        opcode::BEND_RANGE => SeqCommand::BendRange {
            value: reader.read_u8()?,
        },
        opcode::PRIORITY => SeqCommand::Priority {
            value: reader.read_u8()?,
        },
        opcode::POLYPHONY => SeqCommand::Polyphony {
            value: reader.read_u8()?,
        },
        opcode::TIE => SeqCommand::Tie {
            value: reader.read_u8()?,
        },
        opcode::PORTAMENTO_CONTROL => SeqCommand::PortamentoControl {
            value: reader.read_u8()?,
        },
        opcode::MOD_DEPTH => SeqCommand::ModDepth {
            value: reader.read_u8()?,
        },
        opcode::MOD_SPEED => SeqCommand::ModSpeed {
            value: reader.read_u8()?,
        },
        opcode::MOD_TYPE => SeqCommand::ModType {
            value: reader.read_u8()?,
        },
        opcode::MOD_RANGE => SeqCommand::ModRange {
            value: reader.read_u8()?,
        },
        opcode::PORTAMENTO => SeqCommand::Portamento {
            value: reader.read_u8()?,
        },
        opcode::PORTAMENTO_TIME => SeqCommand::PortamentoTime {
            value: reader.read_u8()?,
        },
        opcode::ATTACK => SeqCommand::Attack {
            value: reader.read_u8()?,
        },
        opcode::DECAY => SeqCommand::Decay {
            value: reader.read_u8()?,
        },
        opcode::SUSTAIN => SeqCommand::Sustain {
            value: reader.read_u8()?,
        },
        opcode::RELEASE => SeqCommand::Release {
            value: reader.read_u8()?,
        },
        opcode::LOOP_START => SeqCommand::LoopStart,
        opcode::EXPRESSION => SeqCommand::Expression {
            value: reader.read_u8()?,
        },
        opcode::PRINT_VAR => SeqCommand::PrintVar {
            value: reader.read_u8()?,
        },
        opcode::MOD_DELAY => SeqCommand::ModDelay {
            value: reader.read_u16_be()?,
        },
        opcode::TEMPO => SeqCommand::Tempo {
            value: reader.read_u16_be()?,
        },
        opcode::SWEEP_PITCH => SeqCommand::SweepPitch {
            value: reader.read_u16_be()?,
        },
        opcode::LOOP_END => SeqCommand::LoopEnd,
        opcode::END => SeqCommand::End,
        opcode::TRACK_USAGE => SeqCommand::TrackUsage {
            mask: reader.read_u16_be()?,
        },
        // single-argument opcodes with no assigned meaning
        0xB0 | 0xD8..=0xDB => SeqCommand::Unknown {
            opcode: op,
            value: reader.read_u8()?,
        },
        _ => {
            return Err(Error::UnknownOpcode {
                opcode: op,
                offset: at,
            })
        }
    };
    Ok(cmd)
}

/// Linearly decode commands from `start` up to (not including) `end`.
/// All tracks' streams are interleaved in this range, so the listing runs
/// straight through end-of-track markers; it stops early at an unrecognized
/// opcode or a truncated argument.
pub fn disassemble(reader: &mut SeqReader, start: u32, end: u32) -> Vec<(u32, SeqCommand)> {
    let base = start;
    reader.seek(start as usize);
    let mut listing = Vec::new();
    while (reader.position() as u32) < end {
        let offset = reader.position() as u32 - base;
        match read_command(reader) {
            Ok(cmd) => listing.push((offset, cmd)),
            Err(_) => break,
        }
    }
    listing
}
