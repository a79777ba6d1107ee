//! PresetUI CLI: configure and launch scripts from YAML launcher files.
//!
//! Opens either the full-screen UI or the line-oriented console, collects
//! checkbox and parameter values (optionally from a preset), and runs the
//! resulting command.

mod commands;
mod console;

use clap::Parser;
use color_eyre::eyre::Result;
use presetui_shared::{load_config, log_file_path};

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let config = commands::effective_config(&cli, load_config())?;

    let log_file = if commands::uses_tui(&cli, &config) {
        Some(log_file_path()?)
    } else {
        None
    };
    commands::init_tracing(&cli, log_file.as_deref())?;

    match commands::run(cli, &config) {
        Ok(()) => Ok(()),
        Err(report) => match presetui_tui::child_exit_code(&report) {
            Some(code) => std::process::exit(code),
            None => Err(report),
        },
    }
}
