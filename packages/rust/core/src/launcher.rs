//! Launcher loading, interpreter resolution, and command execution.

use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, Local};
use presetui_shared::{AppConfig, LauncherSpec, PresetUiError, Result};
use tracing::{debug, info, instrument, warn};

/// A launcher file loaded from disk with its resolved preset file location.
#[derive(Debug, Clone)]
pub struct LoadedLauncher {
    pub spec: LauncherSpec,
    /// The launcher file itself.
    pub path: PathBuf,
    /// Where user-saved presets are read from and written to.
    pub presets_path: PathBuf,
    /// Non-fatal validation findings.
    pub warnings: Vec<String>,
}

/// Parse, normalise, and validate a launcher file.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_launcher(path: &Path) -> Result<LoadedLauncher> {
    let content = std::fs::read_to_string(path).map_err(|e| PresetUiError::io(path, e))?;
    let mut spec: LauncherSpec = serde_yaml::from_str(&content)
        .map_err(|e| PresetUiError::parse(format!("failed to parse {}: {e}", path.display())))?;
    spec.normalize();

    let warnings = spec.validate()?;
    for w in &warnings {
        warn!("{w}");
    }

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let presets_path = match &spec.presets_file {
        Some(p) if p.is_absolute() => p.clone(),
        Some(p) => base.join(p),
        None => {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "launcher".into());
            base.join(format!("{stem}.presets.yaml"))
        }
    };

    debug!(
        checkboxes = spec.checkboxes.len(),
        parameters = spec.parameters.len(),
        presets = spec.presets.len(),
        presets_path = %presets_path.display(),
        "loaded launcher"
    );

    Ok(LoadedLauncher {
        spec,
        path: path.to_path_buf(),
        presets_path,
        warnings,
    })
}

// ---------------------------------------------------------------------------
// Interpreter resolution
// ---------------------------------------------------------------------------

/// Pick the interpreter for a launcher.
///
/// Order: the env var named by `launch.interpreter_env`, the launcher's own
/// `interpreter`, a virtual-env interpreter near the working directory (when
/// `launch.use_venv`), then `defaults.interpreter`.
pub fn resolve_interpreter(
    spec: &LauncherSpec,
    config: &AppConfig,
    env: impl Fn(&str) -> Option<String>,
    search_paths: &[PathBuf],
) -> String {
    if let Some(from_env) = env(&config.launch.interpreter_env).filter(|v| !v.trim().is_empty()) {
        debug!(var = %config.launch.interpreter_env, interpreter = %from_env, "interpreter from env");
        return from_env;
    }
    if let Some(own) = &spec.interpreter {
        return own.clone();
    }
    if config.launch.use_venv {
        if let Some(venv) = find_venv_interpreter(search_paths, &config.launch.venv_names) {
            debug!(interpreter = %venv.display(), "found virtual-env interpreter");
            return venv.to_string_lossy().into_owned();
        }
    }
    config.defaults.interpreter.clone()
}

/// Default venv search roots: the working directory and its parent.
pub fn default_search_paths() -> Vec<PathBuf> {
    let Ok(cwd) = std::env::current_dir() else {
        return Vec::new();
    };
    let mut paths = vec![cwd.clone()];
    if let Some(parent) = cwd.parent() {
        paths.push(parent.to_path_buf());
    }
    paths
}

/// First `<path>/<venv>/bin/python` (or `Scripts\python.exe` on Windows)
/// that exists, probing paths in order and venv names in order.
pub fn find_venv_interpreter(search_paths: &[PathBuf], venv_names: &[String]) -> Option<PathBuf> {
    let (bin_dir, exe) = if cfg!(windows) {
        ("Scripts", "python.exe")
    } else {
        ("bin", "python")
    };

    search_paths
        .iter()
        .flat_map(|root| venv_names.iter().map(move |name| root.join(name)))
        .filter(|venv| venv.is_dir())
        .map(|venv| venv.join(bin_dir).join(exe))
        .find(|candidate| candidate.is_file())
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

/// How a collected command is carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    /// Run in the current terminal, inheriting stdio.
    Inline,
    /// Do not run; hand back the display form.
    DryRun,
}

/// What [`execute`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The child ran and exited successfully.
    Completed,
    /// Dry run: the command that would have run.
    Printed(String),
}

/// `"<title> MM-DD HH:MM"`, labelling a launched session.
pub fn session_title(title: &str, now: DateTime<Local>) -> String {
    format!("{title} {}", now.format("%m-%d %H:%M"))
}

/// Build a process command from an argv (`argv[0]` is the executable).
pub fn build_command(argv: &[String]) -> Result<Command> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| PresetUiError::launch("empty command line", None))?;
    let mut cmd = Command::new(program);
    cmd.args(args);
    Ok(cmd)
}

/// Run (or print) the command.
#[instrument(skip(argv), fields(program = argv.first().map(String::as_str).unwrap_or("")))]
pub fn execute(argv: &[String], mode: LaunchMode) -> Result<LaunchOutcome> {
    let shown = crate::form::display_command(argv);
    match mode {
        LaunchMode::DryRun => Ok(LaunchOutcome::Printed(shown)),
        LaunchMode::Inline => {
            let mut cmd = build_command(argv)?;
            info!(command = %shown, "launching");
            let status = cmd
                .status()
                .map_err(|e| PresetUiError::launch(format!("failed to start '{}': {e}", argv[0]), None))?;
            if status.success() {
                Ok(LaunchOutcome::Completed)
            } else {
                Err(PresetUiError::launch(
                    format!("command exited with {status}"),
                    status.code(),
                ))
            }
        }
    }
}
