use clap::Parser;
use rseq2midi::sequence::{self, Config};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rseq2midi")]
#[command(version = "0.1.0")]
#[command(about = "RSEQ sequence container to MIDI converter", long_about = None)]
struct Args {
    /// Input RSEQ files (each converts to a sibling .mid file)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Ignore jump commands, continuing past them
    #[arg(short = 'i', long)]
    ignore_jumps: bool,

    /// Emit debug controllers for otherwise-silent commands
    #[arg(short = 'd', long)]
    debug_controllers: bool,
}

fn main() {
    let args = Args::parse();
    let config = Config {
        ignore_jumps: args.ignore_jumps,
        debug_controllers: args.debug_controllers,
    };

    // failures are per-file; the batch always finishes
    for input in &args.inputs {
        println!("{}:", input.display());
        let output = input.with_extension("mid");
        if let Err(err) = sequence::convert_file(input, &output, config) {
            eprintln!("  {}", err);
        }
    }
}
