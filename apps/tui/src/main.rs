//! Standalone full-screen launcher: `presetui-tui <launcher.yaml>`.

use std::path::PathBuf;

use color_eyre::eyre::{Result, bail};
use presetui_core::form::FormState;
use presetui_core::launcher::{self, LaunchMode, LaunchOutcome};
use presetui_core::presets::PresetStore;
use presetui_shared::{load_config, log_file_path};
use presetui_tui::{Outcome, TuiOptions};

fn main() -> Result<()> {
    color_eyre::install()?;
    match run() {
        Ok(()) => Ok(()),
        Err(report) => match presetui_tui::child_exit_code(&report) {
            Some(code) => std::process::exit(code),
            None => Err(report),
        },
    }
}

fn run() -> Result<()> {
    let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        bail!("usage: presetui-tui <launcher.yaml>");
    };

    let config = load_config()?;
    presetui_tui::init_file_logging(&log_file_path()?, "info")?;

    let loaded = launcher::load_launcher(&path)?;
    let interpreter = launcher::resolve_interpreter(
        &loaded.spec,
        &config,
        |k| std::env::var(k).ok(),
        &launcher::default_search_paths(),
    );
    let store = PresetStore::load(&loaded.presets_path)?;
    let form = FormState::new(loaded.spec, interpreter);

    match presetui_tui::run(form, store, TuiOptions::from_config(&config, None))? {
        Outcome::Quit => Ok(()),
        Outcome::Run { argv, .. } => {
            let mode = if config.launch.dry_run {
                LaunchMode::DryRun
            } else {
                LaunchMode::Inline
            };
            if let LaunchOutcome::Printed(cmd) = launcher::execute(&argv, mode)? {
                println!("{cmd}");
            }
            Ok(())
        }
    }
}
