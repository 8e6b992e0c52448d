//! LABL sub-chunk: offset-to-annotation mapping

use super::reader::SeqReader;
use crate::error::Result;
use std::collections::BTreeMap;

/// Immutable mapping from sequence-relative offset to annotation text.
/// Consulted by the interpreter before each command decode; never mutated
/// after parsing.
#[derive(Debug, Default)]
pub struct LabelTable {
    entries: BTreeMap<u32, String>,
}

impl LabelTable {
    /// Parse a LABL sub-chunk. The reader must be positioned just past the
    /// size field; record offsets are relative to the chunk start + 8.
    pub fn parse(reader: &mut SeqReader, chunk_start: usize) -> Result<LabelTable> {
        let count = reader.read_u32_be()?;
        let base = chunk_start + 8;

        let mut records = Vec::with_capacity(count as usize);
        for _ in 0..count {
            records.push(reader.read_u32_be()? as usize + base);
        }

        let mut entries = BTreeMap::new();
        for record in records {
            reader.seek(record);
            let seq_offset = reader.read_u32_be()?;
            let len = reader.read_u32_be()?;
            let bytes = reader.read_bytes(len as usize)?;
            // last record wins on duplicate offsets
            entries.insert(seq_offset, String::from_utf8_lossy(&bytes).into_owned());
        }
        Ok(LabelTable { entries })
    }

    /// Look up the annotation at a sequence-relative offset
    pub fn get(&self, offset: u32) -> Option<&str> {
        self.entries.get(&offset).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in ascending offset order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }
}
