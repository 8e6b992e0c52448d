//! JSON serialization types for container inspection

use super::header::Container;
use super::reader::SeqReader;
use crate::sequence::{disassemble, SeqCommand};
use serde::Serialize;

/// Top-level JSON structure for a container file
#[derive(Debug, Serialize)]
pub struct RseqJson {
    pub header: HeaderJson,
    pub data: DataJson,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<LabelJson>,
    /// Linear command listing over the whole bytecode region
    pub commands: Vec<CommandJson>,
}

/// JSON representation of the RSEQ chunk header
#[derive(Debug, Serialize)]
pub struct HeaderJson {
    pub size: u32,
    pub header_size: u16,
    pub block_count: u16,
}

/// JSON representation of the DATA sub-chunk
#[derive(Debug, Serialize)]
pub struct DataJson {
    pub size: u32,
    pub offset: u32,
    pub seq_base: u32,
}

/// A label annotation at a sequence-relative offset
#[derive(Debug, Serialize)]
pub struct LabelJson {
    pub offset: u32,
    pub text: String,
}

/// A decoded command at a sequence-relative offset
#[derive(Debug, Serialize)]
pub struct CommandJson {
    pub offset: u32,
    #[serde(flatten)]
    pub command: SeqCommand,
}

impl RseqJson {
    /// Build the inspection model from a parsed container, disassembling
    /// the DATA sub-chunk linearly
    pub fn new(container: &Container, reader: &mut SeqReader) -> Self {
        let commands = disassemble(reader, container.data.seq_base, container.data.end())
            .into_iter()
            .map(|(offset, command)| CommandJson { offset, command })
            .collect();

        Self {
            header: HeaderJson {
                size: container.header.size,
                header_size: container.header.header_size,
                block_count: container.header.block_count,
            },
            data: DataJson {
                size: container.data.size,
                offset: container.data.offset,
                seq_base: container.data.seq_base,
            },
            labels: container
                .labels
                .iter()
                .map(|(offset, text)| LabelJson {
                    offset,
                    text: text.to_owned(),
                })
                .collect(),
            commands,
        }
    }
}
