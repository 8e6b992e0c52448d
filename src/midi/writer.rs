//! Standard MIDI file writer

use super::DIVISION;
use crate::error::Result;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Assembles finished track buffers into a format 1 MIDI file
pub struct MidiWriter {
    file: File,
}

impl MidiWriter {
    /// Create the output file
    pub fn new(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self { file })
    }

    /// Write the header and one track chunk per buffer. Buffers must
    /// already be filtered to non-empty tracks, in ascending track order.
    pub fn write(&mut self, tracks: &[&[u8]]) -> Result<()> {
        self.file.write_all(b"MThd")?;
        self.file.write_all(&6u32.to_be_bytes())?;
        self.file.write_all(&1u16.to_be_bytes())?;
        self.file.write_all(&(tracks.len() as u16).to_be_bytes())?;
        self.file.write_all(&DIVISION.to_be_bytes())?;

        for track in tracks {
            self.file.write_all(b"MTrk")?;
            self.file.write_all(&(track.len() as u32).to_be_bytes())?;
            self.file.write_all(track)?;
        }
        self.file.flush()?;
        Ok(())
    }
}
