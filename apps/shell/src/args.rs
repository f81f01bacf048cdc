//! # CLI Argument Definitions
//!
//! The command-line interface of the `verity` binary, built with `clap`.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use verity::timezone::SuggestionArgs;

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "verity")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Link ownership and time-zone suggestion tooling")]
pub(crate) struct Cli {
    /// Configuration file (TOML, JSON, YAML); `VERITY__*` variables override it
    #[arg(long, global = true, value_name = "FILE")]
    pub(crate) config: Option<PathBuf>,

    /// Log at debug level regardless of the configured level
    #[arg(short, long, global = true)]
    pub(crate) verbose: bool,

    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Build a geolocation time-zone suggestion and print it
    #[command(after_help = "Zone ids: UNCERTAIN (no opinion), EMPTY (no zone), or a \
                            comma-separated list of Olson ids, preferred first")]
    Geolocation {
        #[command(flatten)]
        suggestion: SuggestionArgs,

        /// Print the suggestion as JSON
        #[arg(long)]
        json: bool,

        /// Also write the encoded record to this file
        #[arg(long, short, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Encode a verification request for the given packages
    Request {
        /// Package names to verify
        #[arg(required = true, value_name = "PACKAGE")]
        packages: Vec<String>,

        /// Output file for the encoded record
        #[arg(long, short, value_name = "FILE")]
        out: PathBuf,
    },
    /// Register a package with the ownership registry, apply host decisions and encode the
    /// resulting state
    Package {
        /// Package name
        name: String,

        /// Owning user id
        #[arg(long, default_value_t = 0)]
        user: i32,

        /// Declared host (repeatable)
        #[arg(long = "host", value_name = "HOST", required = true)]
        hosts: Vec<String>,

        /// Host the verification agent verified (repeatable)
        #[arg(long = "verify", value_name = "HOST")]
        verified: Vec<String>,

        /// Host the user selected (repeatable)
        #[arg(long = "select", value_name = "HOST")]
        selected: Vec<String>,

        /// Disable link handling for the package
        #[arg(long)]
        no_link_handling: bool,

        /// Output file for the encoded record
        #[arg(long, short, value_name = "FILE")]
        out: PathBuf,
    },
    /// Decode a wire record and print it as JSON
    Inspect {
        /// Encoded record
        file: PathBuf,

        /// Record type stored in the file
        #[arg(long, value_enum)]
        kind: RecordKind,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum RecordKind {
    Package,
    Request,
    Geolocation,
}
