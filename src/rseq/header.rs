//! RSEQ container chunk parsing

use super::labels::LabelTable;
use super::reader::SeqReader;
use crate::error::{Error, Result};

/// Magic value following the RSEQ tag (byte-order mark + version)
pub const SEQ_MAGIC: u32 = 0xFEFF_0100;

/// Parsed RSEQ chunk header
#[derive(Debug, Clone, Default)]
pub struct RseqHeader {
    /// Total container size in bytes
    pub size: u32,
    /// Size of the RSEQ chunk header itself
    pub header_size: u16,
    /// Number of sub-chunks that follow
    pub block_count: u16,
}

/// Parsed DATA sub-chunk information
#[derive(Debug, Clone, Default)]
pub struct DataInfo {
    /// Declared sub-chunk size (tag and size fields included)
    pub size: u32,
    /// Sequence data offset relative to the sub-chunk start
    pub offset: u32,
    /// Absolute offset of the bytecode region base; the entry track
    /// starts here (relative offset 0)
    pub seq_base: u32,
}

impl DataInfo {
    /// Absolute offset one past the last byte of the sub-chunk
    pub fn end(&self) -> u32 {
        self.seq_base - self.offset + self.size
    }
}

/// Fully parsed container: chunk headers plus the label table
#[derive(Debug, Default)]
pub struct Container {
    pub header: RseqHeader,
    pub data: DataInfo,
    pub labels: LabelTable,
}

impl Container {
    /// Validate the RSEQ chunk and scan the sub-chunk table. The reader is
    /// left positioned past the last declared sub-chunk.
    pub fn parse(reader: &mut SeqReader) -> Result<Container> {
        let start = reader.position();

        let tag = reader.read_tag()?;
        let magic = reader.read_u32_be()?;
        if &tag != b"RSEQ" || magic != SEQ_MAGIC {
            return Err(Error::Structural("bad RSEQ chunk".into()));
        }

        let header = RseqHeader {
            size: reader.read_u32_be()?,
            header_size: reader.read_u16_be()?,
            block_count: reader.read_u16_be()?,
        };
        reader.seek(start + header.header_size as usize);

        let mut data = None;
        let mut labels = LabelTable::default();
        for _ in 0..header.block_count {
            let chunk_start = reader.position();
            let tag = reader.read_tag()?;
            let size = reader.read_u32_be()?;
            match &tag {
                b"DATA" => {
                    let offset = reader.read_u32_be()?;
                    data = Some(DataInfo {
                        size,
                        offset,
                        seq_base: chunk_start as u32 + offset,
                    });
                }
                b"LABL" => {
                    labels = LabelTable::parse(reader, chunk_start)?;
                }
                _ => {}
            }
            reader.seek(chunk_start + size as usize);
        }

        let data = data.ok_or_else(|| Error::Structural("missing DATA chunk".into()))?;
        Ok(Container {
            header,
            data,
            labels,
        })
    }
}
