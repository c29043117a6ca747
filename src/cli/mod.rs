//! CLI argument parsing for lockranger.
//!
//! Uses clap derive macros for declarative argument definitions.

use clap::Parser;
use std::path::PathBuf;

const COMMAND_HELP: &str = "\
Commands come in the form:
    OPN OFF LEN
where OPN (operation) is one of:
    X : exclusive lock of region, waiting for availability
    S : shared lock of region, waiting for availability
    T : test whether region is locked (not available on Windows)
    U : unlock region
    Q : quit
OFF and LEN are the offset and length in bytes.
If <COMMANDFILE> is not given, stdin is read.";

/// Lockranger: apply advisory byte-range locks to a file, one command per line.
#[derive(Parser, Debug)]
#[command(name = "lockranger")]
#[command(author, version, about, long_about = None)]
#[command(after_help = COMMAND_HELP)]
pub struct Cli {
    /// Existing file to lock regions of (opened read/write).
    pub datafile: PathBuf,

    /// File to read commands from instead of stdin.
    pub commandfile: Option<PathBuf>,

    /// YAML session configuration.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Append an NDJSON record for every requesting/received message.
    #[arg(long, value_name = "PATH")]
    pub event_log: Option<PathBuf>,

    /// Do not print the data file name and command overview at startup.
    #[arg(long)]
    pub no_banner: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
