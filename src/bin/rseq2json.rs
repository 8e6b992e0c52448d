//! RSEQ container to JSON inspector

use clap::Parser;
use rseq2midi::rseq::{self, Container, RseqJson, SeqReader};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rseq2json")]
#[command(version = "0.1.0")]
#[command(about = "Dump RSEQ container contents as JSON", long_about = None)]
struct Args {
    /// Input RSEQ file (gzip accepted)
    input: PathBuf,

    /// Output JSON file (writes to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output compact JSON (default is pretty-printed)
    #[arg(short, long)]
    compact: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let data = rseq::read_seq_file(&args.input)?;
    let mut reader = SeqReader::new(&data);
    let container = Container::parse(&mut reader)?;
    let model = RseqJson::new(&container, &mut reader);

    let json_string = if args.compact {
        serde_json::to_string(&model)?
    } else {
        serde_json::to_string_pretty(&model)?
    };

    match args.output {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(json_string.as_bytes())?;
            file.write_all(b"\n")?;
        }
        None => {
            println!("{}", json_string);
        }
    }

    Ok(())
}
