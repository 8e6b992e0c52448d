//! Sequence bytecode interpretation
//!
//! This module follows the command semantics of the RSEQ track bytecode:
//! implicit note-ons, waits with deferred note-offs, and single-level
//! control flow (jump/call/return plus cross-track activation).

pub mod opcodes;
pub mod session;
pub mod track;

pub use opcodes::{disassemble, read_command, SeqCommand};
pub use session::{Config, Session};
pub use track::{SeqTrack, TrackState};

use crate::error::Result;
use crate::midi::MidiWriter;
use crate::rseq::{self, Container, SeqReader};
use std::path::Path;

/// Number of addressable track slots
pub const TRACK_COUNT: usize = 16;

/// Convert one container file into a MIDI file: load (gunzipping if
/// needed), parse the chunk table, interpret every track, and assemble the
/// output. Per-track decode failures are contained by the session; errors
/// returned here abort this file only.
pub fn convert_file(input: &Path, output: &Path, config: Config) -> Result<()> {
    let data = rseq::read_seq_file(input)?;
    let mut reader = SeqReader::new(&data);
    let container = Container::parse(&mut reader)?;

    let mut session = Session::new(&container, config);
    session.run(&mut reader);

    let mut writer = MidiWriter::new(output)?;
    writer.write(&session.track_data())?;
    Ok(())
}
