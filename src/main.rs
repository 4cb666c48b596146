//! Extracts the embedded PNG/JPEG images from every ICNS file in a directory.
//!
//! ```shell
//! icns-extract <path/to/icons> <path/to/output>
//! # images are saved as <output>/<name>_<ostype>_<width>x<height>.<ext>
//! ```
//!
//! Set `RUST_LOG` (e.g. `RUST_LOG=trace`) for more detail than `--verbose`.

use clap::{ArgAction, Parser};
use env_logger::Env;
use icns_extract::{ExtractOptions, Extractor};
use log::error;
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(name = "icns-extract",
          version,
          about = "Extracts embedded PNG/JPEG images from .icns files")]
struct Cli {
    /// Directory to search (recursively) for .icns files
    #[arg(value_name = "SOURCE")]
    source: PathBuf,
    /// Directory to write images to; must not exist yet
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,
    /// Never convert image-less files with sips (macOS only)
    #[arg(long = "no-fallback", action = ArgAction::SetTrue)]
    no_fallback: bool,
    /// Log every record, not just per-file progress
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    verbose: bool,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            process::exit(if err.use_stderr() { 1 } else { 0 });
        }
    };
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .init();

    let extractor = Extractor::new(ExtractOptions {
        source: cli.source,
        output: cli.output,
        fallback: !cli.no_fallback,
    });
    match extractor.run() {
        Ok(summary) => {
            println!("Extracted {} images from {} ICNS files.",
                     summary.images,
                     summary.files);
            if summary.overwritten > 0 {
                println!("Overwrote {} images with the same output name.",
                         summary.overwritten);
            }
            if summary.converted > 0 {
                println!("Converted {} ICNS files with the fallback.",
                         summary.converted);
            }
            println!("Encountered {} errors.", summary.errors);
            process::exit(summary.exit_code());
        }
        Err(err) => {
            error!("{}", err);
            process::exit(err.exit_code());
        }
    }
}
