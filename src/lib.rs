pub mod error;
pub mod midi;
pub mod rseq;
pub mod sequence;

pub use error::Error;
pub use sequence::{convert_file, Config, Session};
