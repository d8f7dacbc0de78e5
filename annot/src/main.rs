// External crates
use anyhow::Result;
use clap::Parser;
use tracing::debug;

// Internal imports
use annot_config::cli::{normalize_argv, split_plugin_arguments};
use annot_logging::{init_subscriber, LogSettings};
use annot_messages::{msg, MESSAGES};

// Local modules
mod cli;
mod commands;

use cli::Args;
use commands::execute_command;

fn run() -> Result<()> {
    let catalog = annot_builtins::standard_catalog()?;

    // Plugin flags are declared by the catalog, not by clap, so they are
    // taken out before clap sees argv.
    let argv = normalize_argv(std::env::args());
    let split = split_plugin_arguments(argv, catalog)?;
    let args = Args::parse_from(split.remaining);

    let _log_guard = init_subscriber(&LogSettings::from_env().with_debug(args.debug));
    debug!(
        command = ?args.command,
        plugin_arguments = split.plugin_arguments.len(),
        "Starting annot command"
    );

    execute_command(args, catalog, split.plugin_arguments)
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{}", msg!(MESSAGES.common.error_generic, error = e.to_string()));
        std::process::exit(1);
    }
}
