//! CLI command definitions, routing, and tracing setup.

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Result, eyre};
use crossterm::{execute, terminal::SetTitle};
use presetui_core::clipboard::SystemClipboard;
use presetui_core::form::FormState;
use presetui_core::launcher::{self, LaunchMode, LaunchOutcome, LoadedLauncher};
use presetui_core::presets::{self, PresetOrigin, PresetStore};
use presetui_shared::{AppConfig, Interface, RunParams, ThemeMode, init_config};
use presetui_tui::{Outcome, TuiOptions};
use tracing::info;
use unicode_width::UnicodeWidthStr;

use crate::console::Console;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// PresetUI: pick presets and options, then launch a script.
#[derive(Parser)]
#[command(
    name = "presetui",
    version,
    about = "Configure and launch scripts from YAML launcher files with presets.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Machine-readable output of `run`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum Emit {
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Open a launcher, collect options, and run the command.
    Run {
        /// Launcher file (YAML).
        launcher: PathBuf,

        /// Use the line-oriented console instead of the full-screen UI.
        #[arg(long, conflicts_with = "tui")]
        console: bool,

        /// Use the full-screen UI even if the config prefers the console.
        #[arg(long)]
        tui: bool,

        /// Print the command instead of running it.
        #[arg(long)]
        dry_run: bool,

        /// Print the collected parameters instead of running.
        #[arg(long, value_enum)]
        emit: Option<Emit>,

        /// Start the full-screen UI in this theme.
        #[arg(long, value_enum)]
        theme: Option<ThemeArg>,
    },

    /// Print the command a launcher would run.
    Preview {
        /// Launcher file (YAML).
        launcher: PathBuf,

        /// Apply this preset first.
        #[arg(short, long)]
        preset: Option<String>,
    },

    /// Inspect and manage presets.
    Presets {
        #[command(subcommand)]
        action: PresetsAction,
    },

    /// Check a launcher file and report problems.
    Validate {
        /// Launcher file (YAML).
        launcher: PathBuf,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for ThemeMode {
    fn from(t: ThemeArg) -> Self {
        match t {
            ThemeArg::Light => ThemeMode::Light,
            ThemeArg::Dark => ThemeMode::Dark,
        }
    }
}

/// Preset subcommands.
#[derive(Subcommand)]
pub(crate) enum PresetsAction {
    /// List built-in and saved presets.
    List { launcher: PathBuf },
    /// Show one preset and the command it produces.
    Show { launcher: PathBuf, name: String },
    /// Delete a saved preset.
    Delete { launcher: PathBuf, name: String },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

/// Settle the config for this invocation. A broken config file fails every
/// command except `config`, which falls back to defaults so `config init`
/// can repair it.
pub(crate) fn effective_config(
    cli: &Cli,
    loaded: presetui_shared::Result<AppConfig>,
) -> Result<AppConfig> {
    match loaded {
        Ok(config) => Ok(config),
        Err(e) if matches!(cli.command, Command::Config { .. }) => {
            eprintln!("warning: {e}; using default settings");
            Ok(AppConfig::default())
        }
        Err(e) => Err(e.into()),
    }
}

/// Whether this invocation will hand the terminal to the full-screen UI.
pub(crate) fn uses_tui(cli: &Cli, config: &AppConfig) -> bool {
    match &cli.command {
        Command::Run { console, tui, .. } => {
            *tui || (!*console && config.defaults.interface == Interface::Tui)
        }
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. With `log_file`, output goes there
/// instead of stderr.
pub(crate) fn init_tracing(cli: &Cli, log_file: Option<&Path>) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt};

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = ["presetui_cli", "presetui_core", "presetui_shared", "presetui_tui"]
        .map(|target| format!("{target}={level}"))
        .join(",");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if let Some(path) = log_file {
        return presetui_tui::init_file_logging(path, &env_filter.to_string());
    }

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(io::stderr)
                .init();
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli, config: &AppConfig) -> Result<()> {
    match cli.command {
        Command::Run {
            launcher,
            console,
            tui,
            dry_run,
            emit,
            theme,
        } => {
            let interface = if console {
                Interface::Console
            } else if tui {
                Interface::Tui
            } else {
                config.defaults.interface
            };
            cmd_run(
                config,
                &launcher,
                interface,
                dry_run,
                emit,
                theme.map(ThemeMode::from),
            )
        }
        Command::Preview { launcher, preset } => cmd_preview(config, &launcher, preset.as_deref()),
        Command::Presets { action } => match action {
            PresetsAction::List { launcher } => cmd_presets_list(&launcher),
            PresetsAction::Show { launcher, name } => cmd_presets_show(config, &launcher, &name),
            PresetsAction::Delete { launcher, name } => cmd_presets_delete(&launcher, &name),
        },
        Command::Validate { launcher } => cmd_validate(&launcher),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config),
        },
    }
}

/// A launcher opened for interaction: form with merged presets plus the
/// saved-preset store.
struct Session {
    title: String,
    form: FormState,
    store: PresetStore,
}

impl Session {
    fn open(path: &Path, config: &AppConfig) -> Result<Self> {
        let LoadedLauncher {
            spec,
            presets_path,
            ..
        } = launcher::load_launcher(path)?;
        let interpreter = launcher::resolve_interpreter(
            &spec,
            config,
            |k| std::env::var(k).ok(),
            &launcher::default_search_paths(),
        );
        let store = PresetStore::load(presets_path)?;
        let title = spec.title.clone();
        let mut form = FormState::new(spec, interpreter);
        let merged = presets::merged(&form.spec().presets, &store);
        form.set_presets(merged.into_iter().map(|e| e.preset).collect());
        Ok(Self { title, form, store })
    }
}

fn cmd_run(
    config: &AppConfig,
    path: &Path,
    interface: Interface,
    dry_run: bool,
    emit: Option<Emit>,
    theme: Option<ThemeMode>,
) -> Result<()> {
    let Session {
        title,
        mut form,
        store,
    } = Session::open(path, config)?;

    let (params, argv): (RunParams, Vec<String>) = match interface {
        Interface::Tui => {
            match presetui_tui::run(form, store, TuiOptions::from_config(config, theme))? {
                Outcome::Run { params, argv } => (params, argv),
                Outcome::Quit => {
                    info!("quit without running");
                    return Ok(());
                }
            }
        }
        Interface::Console => {
            let stdout = io::stdout();
            let color = stdout.is_terminal();
            let params = Console::new(io::stdin().lock(), stdout.lock(), Box::new(SystemClipboard))
                .with_color(color)
                .run(&mut form)?;
            (params, form.argv())
        }
    };

    if emit == Some(Emit::Json) {
        println!("{}", serde_json::to_string_pretty(&params)?);
        return Ok(());
    }

    let mode = if dry_run || config.launch.dry_run {
        LaunchMode::DryRun
    } else {
        LaunchMode::Inline
    };

    let session = launcher::session_title(&title, Local::now());
    info!(session = %session, preset = ?params.preset, "launching session");
    if mode == LaunchMode::Inline && io::stdout().is_terminal() {
        let _ = execute!(io::stdout(), SetTitle(&session));
    }

    match launcher::execute(&argv, mode)? {
        LaunchOutcome::Printed(cmd) => println!("{cmd}"),
        LaunchOutcome::Completed => info!("command finished"),
    }
    Ok(())
}

fn cmd_preview(config: &AppConfig, path: &Path, preset: Option<&str>) -> Result<()> {
    let Session { mut form, .. } = Session::open(path, config)?;
    if let Some(name) = preset {
        for warning in form.apply_preset(name)? {
            eprintln!("warning: {warning}");
        }
    }
    println!("{}", form.command_preview());
    Ok(())
}

fn cmd_presets_list(path: &Path) -> Result<()> {
    let loaded = launcher::load_launcher(path)?;
    let store = PresetStore::load(&loaded.presets_path)?;
    let entries = presets::merged(&loaded.spec.presets, &store);

    if entries.is_empty() {
        println!("No presets defined in {}", path.display());
        return Ok(());
    }

    let width = entries
        .iter()
        .map(|e| e.preset.name.width())
        .max()
        .unwrap_or(0);
    println!();
    for (i, entry) in entries.iter().enumerate() {
        let origin = match entry.origin {
            PresetOrigin::Builtin => "built-in",
            PresetOrigin::Saved => "saved",
        };
        println!(
            "  {:>2}. {}  [{origin:<8}]  {}",
            i + 1,
            crate::console::pad(&entry.preset.name, width),
            entry.preset.description
        );
    }
    println!();
    println!("  Saved presets file: {}", loaded.presets_path.display());
    Ok(())
}

fn cmd_presets_show(config: &AppConfig, path: &Path, name: &str) -> Result<()> {
    let Session { mut form, store, .. } = Session::open(path, config)?;
    let origin = if store.get(name).is_some() {
        "saved"
    } else {
        "built-in"
    };
    let preset = form
        .presets()
        .iter()
        .find(|p| p.name == name)
        .cloned()
        .ok_or_else(|| eyre!("no preset named '{name}' in {}", path.display()))?;

    let warnings = form.apply_preset(name)?;

    println!();
    println!("  Name:        {}", preset.name);
    println!("  Origin:      {origin}");
    println!("  Description: {}", preset.description);
    println!("  Options:     {}", preset.checkbox_options.join(", "));
    for (id, value) in &preset.input_values {
        println!("  {id:<12} {value}");
    }
    println!("  Command:     {}", form.command_preview());
    for w in warnings {
        println!("  warning: {w}");
    }
    println!();
    Ok(())
}

fn cmd_presets_delete(path: &Path, name: &str) -> Result<()> {
    let loaded = launcher::load_launcher(path)?;
    let mut store = PresetStore::load(&loaded.presets_path)?;
    presets::delete(&loaded.spec.presets, &mut store, name)?;
    println!("Deleted preset '{name}' from {}", store.path().display());
    Ok(())
}

fn cmd_validate(path: &Path) -> Result<()> {
    let loaded = launcher::load_launcher(path)?;
    for w in &loaded.warnings {
        println!("  warning: {w}");
    }
    println!(
        "{} is valid: {} options, {} parameters, {} presets",
        path.display(),
        loaded.spec.checkboxes.len(),
        loaded.spec.parameters.len(),
        loaded.spec.presets.len()
    );
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}
