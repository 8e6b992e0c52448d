use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid RSEQ file: {0}")]
    Structural(String),

    #[error("Unknown sequence command {opcode:#04x} at offset {offset:#x}")]
    UnknownOpcode { opcode: u8, offset: u32 },

    #[error("Unexpected end of data at offset {0:#x}")]
    ReadFault(usize),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
