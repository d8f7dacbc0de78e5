// CLI argument parsing and definitions

use annot_config::cli::AnnotationArgs;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "annot")]
#[command(about = "Select, configure and validate variant annotations")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Resolve the annotations a run would enable
    ///
    /// Plugin-specific arguments such as `--founderID s1` may appear anywhere
    /// on the command line.
    Resolve {
        /// Tool profile supplying the default annotations
        #[arg(short, long, default_value = "default")]
        profile: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Apply the resolved annotations to a variant record (JSON)
        #[arg(long, value_name = "FILE")]
        record: Option<PathBuf>,

        #[command(flatten)]
        annotations: AnnotationArgs,
    },

    /// List available annotations, their arguments and groups
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// List embedded tool profiles
    Profiles,
}
