//! Interpretation session: drives all sixteen track cursors to completion

use super::opcodes::{read_command, SeqCommand};
use super::track::{SeqTrack, TrackState};
use super::TRACK_COUNT;
use crate::error::Result;
use crate::midi::{ctrl, meta};
use crate::rseq::{Container, LabelTable, SeqReader};

/// Session configuration, passed in explicitly rather than held as
/// process-global state.
#[derive(Debug, Clone, Copy, Default)]
pub struct Config {
    /// Skip all jump commands, continuing past them
    pub ignore_jumps: bool,
    /// Emit generic controller pairs for otherwise-silent commands
    pub debug_controllers: bool,
}

/// What to do with a decoded jump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JumpDecision {
    Take,
    Ignore,
    EndTrack,
}

/// Direction-based jump policy: forward jumps are structural and safe to
/// follow; a backward jump is read as "loop to start" and ends the track
/// since iteration counts are not tracked. Kept separate from the dispatch
/// loop so an alternate strategy can replace it wholesale.
fn decide_jump(forward: bool, ignore_jumps: bool) -> JumpDecision {
    if ignore_jumps {
        JumpDecision::Ignore
    } else if forward {
        JumpDecision::Take
    } else {
        JumpDecision::EndTrack
    }
}

impl JumpDecision {
    fn label(self) -> &'static str {
        match self {
            JumpDecision::Take => "taken",
            JumpDecision::Ignore => "ignored",
            JumpDecision::EndTrack => "Track End",
        }
    }
}

/// Per-file interpretation state: the sixteen track slots over one shared
/// bytecode region, plus the label table consulted at each decode position.
pub struct Session<'a> {
    config: Config,
    labels: &'a LabelTable,
    /// Absolute base of the bytecode region; sequence offsets are relative
    /// to this
    base: u32,
    tracks: Vec<SeqTrack>,
}

impl<'a> Session<'a> {
    pub fn new(container: &'a Container, config: Config) -> Self {
        Self {
            config,
            labels: &container.labels,
            base: container.data.seq_base,
            tracks: (0..TRACK_COUNT as u8).map(SeqTrack::new).collect(),
        }
    }

    /// Interpret the whole sequence: the entry track starts at the region
    /// base, and repeated passes run every active track to completion until
    /// no track is left running. Tracks activated near the end of a pass
    /// run in full during the next one.
    pub fn run(&mut self, reader: &mut SeqReader) {
        self.tracks[0].start(self.base);

        loop {
            let mut any = false;
            for index in 0..TRACK_COUNT {
                if !self.tracks[index].is_running() {
                    continue;
                }
                any = true;
                self.run_track(index, reader);
                println!("  track {:02} ok", index);
            }
            if !any {
                break;
            }
        }
    }

    /// Collect finished non-empty buffers in ascending track order
    pub fn track_data(&self) -> Vec<&[u8]> {
        self.tracks
            .iter()
            .filter(|t| !t.midi.is_empty())
            .map(|t| t.midi.data())
            .collect()
    }

    /// Run one track from its stored cursor until it leaves Running.
    /// Decode faults and unknown opcodes are fatal to this track only.
    fn run_track(&mut self, index: usize, reader: &mut SeqReader) {
        let track = &self.tracks[index];
        eprintln!("  track {:02} started at {:#x}", index, track.pos);
        reader.seek(track.pos as usize);

        while self.tracks[index].is_running() {
            if let Err(err) = self.step(index, reader) {
                eprintln!("Warning: track {:02}: {}", index, err);
                self.tracks[index].end();
            }
        }
    }

    /// Decode and execute a single command for a track
    fn step(&mut self, index: usize, reader: &mut SeqReader) -> Result<()> {
        let rel = (reader.position() as u32).wrapping_sub(self.base);
        if let Some(text) = self.labels.get(rel) {
            let text = text.to_owned();
            self.tracks[index].midi.meta(meta::MARKER, text.as_bytes());
        }

        let cmd = read_command(reader)?;
        let debug = self.config.debug_controllers;
        let track = &mut self.tracks[index];
        match cmd {
            SeqCommand::Note {
                key,
                velocity,
                length,
            } => track.midi.note_on(key, velocity, length),
            SeqCommand::Wait { ticks } => track.midi.advance(ticks),
            SeqCommand::Program { number } => track.midi.program(number),

            SeqCommand::OpenTrack { track: target, offset } => {
                let addr = self.base + offset;
                eprintln!("  track {:02}: open track {} at {:#x}", index, target, addr);
                self.open_track(index, target, addr);
            }
            SeqCommand::Jump { offset } => {
                let target = self.base + offset;
                let forward = target as usize > reader.position();
                let decision = decide_jump(forward, self.config.ignore_jumps);
                let direction = if forward { "forwards" } else { "backwards" };
                eprintln!(
                    "  track {:02}: jump ({}, {}) to {:#x}",
                    index,
                    direction,
                    decision.label(),
                    target
                );

                let text = format!("Jump ({}, {})", direction, decision.label());
                track.midi.meta(meta::MARKER, text.as_bytes());
                match decision {
                    JumpDecision::Take => reader.seek(target as usize),
                    JumpDecision::Ignore => {}
                    JumpDecision::EndTrack => track.end(),
                }
            }
            SeqCommand::Call { offset } => {
                let target = self.base + offset;
                eprintln!("  track {:02}: call {:#x}", index, target);
                track.return_pos = reader.position() as u32;
                reader.seek(target as usize);
            }
            SeqCommand::Return => {
                if track.return_pos != 0 {
                    reader.seek(track.return_pos as usize);
                    track.return_pos = 0;
                }
            }

            SeqCommand::Pan { value } => track.midi.controller(ctrl::PAN, value),
            SeqCommand::Volume { value } => track.midi.controller(ctrl::VOLUME, value),
            SeqCommand::Expression { value } => track.midi.controller(ctrl::EXPRESSION, value),
            SeqCommand::Transpose { value } => {
                track.transpose = value as i8;
                track.midi.nrpn(0x02, 0x00, value);
            }
            SeqCommand::PitchBend { value } => track.midi.pitch_bend(value),
            SeqCommand::BendRange { value } => track.midi.bend_range(value),
            SeqCommand::PortamentoControl { value } => {
                track.midi.controller(ctrl::PORTAMENTO_CONTROL, value)
            }
            SeqCommand::ModDepth { value } => track.midi.controller(ctrl::MODULATION, value),
            SeqCommand::Portamento { value } => track.midi.controller(ctrl::PORTAMENTO, value),
            SeqCommand::PortamentoTime { value } => {
                track.midi.controller(ctrl::PORTAMENTO_TIME, value)
            }
            SeqCommand::Tempo { value } => track.midi.tempo(value),
            SeqCommand::LoopStart => track.midi.controller(ctrl::LOOP_MARKER, 0),
            SeqCommand::LoopEnd => track.midi.controller(ctrl::LOOP_MARKER, 1),

            // diagnostics-gated specific mappings
            SeqCommand::ModSpeed { value } => {
                if debug {
                    track.midi.controller(ctrl::MOD_SPEED, value);
                }
            }
            SeqCommand::ModType { value } => {
                if debug {
                    track.midi.controller(ctrl::MOD_TYPE, value);
                }
            }
            SeqCommand::ModRange { value } => {
                if debug {
                    track.midi.controller(ctrl::MOD_RANGE, value);
                }
            }
            SeqCommand::Decay { value } => {
                if debug {
                    track.midi.nrpn(0x64, 0x01, value);
                }
            }
            SeqCommand::ModDelay { value } => {
                if debug {
                    track.midi.controller(ctrl::MOD_DELAY, (value & 0x7F) as u8);
                }
            }

            // diagnostics-gated generic opcode/value pairs
            SeqCommand::MainVolume { value }
            | SeqCommand::Priority { value }
            | SeqCommand::Polyphony { value }
            | SeqCommand::Tie { value }
            | SeqCommand::Attack { value }
            | SeqCommand::Sustain { value }
            | SeqCommand::Release { value }
            | SeqCommand::PrintVar { value }
            | SeqCommand::Unknown { value, .. } => {
                if debug {
                    let opcode = cmd_opcode(&cmd);
                    track.midi.controller(ctrl::RAW_OPCODE, opcode & 0x7F);
                    track.midi.controller(ctrl::RAW_VALUE, value);
                }
            }
            SeqCommand::SweepPitch { value } | SeqCommand::TrackUsage { mask: value } => {
                if debug {
                    let opcode = cmd_opcode(&cmd);
                    track.midi.controller(ctrl::RAW_OPCODE, opcode & 0x7F);
                    track.midi.controller(ctrl::RAW_VALUE, (value & 0x7F) as u8);
                }
            }

            SeqCommand::End => {
                eprintln!(
                    "  track {:02} end at {:#x} (transpose {})",
                    index,
                    reader.position(),
                    track.transpose
                );
                track.end();
            }
        }
        Ok(())
    }

    /// Split activation: an Inert target starts, a Running target restarts,
    /// an Ended target stays ended.
    fn open_track(&mut self, index: usize, target: u8, addr: u32) {
        let Some(track) = self.tracks.get_mut(target as usize) else {
            eprintln!(
                "Warning: track {:02}: open of invalid track {}",
                index, target
            );
            return;
        };
        if track.state == TrackState::Ended {
            eprintln!(
                "Warning: track {:02}: open of finished track {}",
                index, target
            );
            return;
        }
        track.start(addr);
    }
}

/// Raw opcode byte for a decoded command, used by the diagnostic pair
fn cmd_opcode(cmd: &SeqCommand) -> u8 {
    use super::opcodes::opcode;
    match cmd {
        SeqCommand::MainVolume { .. } => opcode::MAIN_VOLUME,
        SeqCommand::Priority { .. } => opcode::PRIORITY,
        SeqCommand::Polyphony { .. } => opcode::POLYPHONY,
        SeqCommand::Tie { .. } => opcode::TIE,
        SeqCommand::Attack { .. } => opcode::ATTACK,
        SeqCommand::Sustain { .. } => opcode::SUSTAIN,
        SeqCommand::Release { .. } => opcode::RELEASE,
        SeqCommand::PrintVar { .. } => opcode::PRINT_VAR,
        SeqCommand::SweepPitch { .. } => opcode::SWEEP_PITCH,
        SeqCommand::TrackUsage { .. } => opcode::TRACK_USAGE,
        SeqCommand::Unknown { opcode, .. } => *opcode,
        _ => 0,
    }
}
