//! RSEQ container parsing

pub mod header;
pub mod json;
pub mod labels;
pub mod reader;

pub use header::{Container, DataInfo, RseqHeader};
pub use json::RseqJson;
pub use labels::LabelTable;
pub use reader::SeqReader;

use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Read a container file, decompressing gzip transparently (by extension
/// or by magic)
pub fn read_seq_file(path: &Path) -> io::Result<Vec<u8>> {
    let mut file = File::open(path)?;

    let is_gzip = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false);

    if is_gzip {
        let mut data = Vec::new();
        GzDecoder::new(file).read_to_end(&mut data)?;
        return Ok(data);
    }

    let mut data = Vec::new();
    file.read_to_end(&mut data)?;

    if data.len() >= 2 && data[0] == 0x1f && data[1] == 0x8b {
        let mut decompressed = Vec::new();
        GzDecoder::new(io::Cursor::new(data)).read_to_end(&mut decompressed)?;
        return Ok(decompressed);
    }
    Ok(data)
}
