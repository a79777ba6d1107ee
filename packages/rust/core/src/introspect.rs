//! Derive launcher options from a `clap::Command`.
//!
//! Flags become checkboxes, arguments with possible values become selects,
//! and every other value-taking argument becomes a free-text input.

use clap::{Arg, ArgAction, Command};
use presetui_shared::{CheckboxOption, InputOption, LauncherSpec, ParameterOption, SelectOption};

/// Split a command's named arguments into checkboxes and parameters.
pub fn options_from_command(cmd: &Command) -> (Vec<CheckboxOption>, Vec<ParameterOption>) {
    let mut checkboxes = Vec::new();
    let mut parameters = Vec::new();

    for arg in cmd.get_arguments() {
        if arg.is_positional() || arg.is_hide_set() {
            continue;
        }
        if matches!(
            arg.get_action(),
            ArgAction::Help | ArgAction::HelpShort | ArgAction::HelpLong | ArgAction::Version
        ) {
            continue;
        }
        let Some(flag) = flag_of(arg) else {
            continue;
        };

        let id = arg.get_id().as_str().to_string();
        let label = arg
            .get_help()
            .map(|h| h.to_string())
            .unwrap_or_else(|| id.clone());

        match arg.get_action() {
            ArgAction::SetTrue => checkboxes.push(CheckboxOption {
                label,
                id,
                arg: flag,
                default: false,
            }),
            ArgAction::SetFalse | ArgAction::Count => {}
            _ => {
                let choices: Vec<String> = arg
                    .get_possible_values()
                    .iter()
                    .filter(|v| !v.is_hide_set())
                    .map(|v| v.get_name().to_string())
                    .collect();
                let default = arg
                    .get_default_values()
                    .first()
                    .map(|v| v.to_string_lossy().into_owned());

                if choices.is_empty() {
                    let default = default.unwrap_or_default();
                    let placeholder = if default.is_empty() {
                        String::new()
                    } else {
                        format!("default: {default}")
                    };
                    parameters.push(ParameterOption::Input(InputOption {
                        label,
                        id,
                        arg: flag,
                        default,
                        placeholder,
                    }));
                } else {
                    parameters.push(ParameterOption::Select(SelectOption::new(
                        label, id, flag, choices, default,
                    )));
                }
            }
        }
    }

    (checkboxes, parameters)
}

/// Build a launcher for `program` from a clap command definition.
pub fn launcher_from_command(program: impl Into<String>, cmd: &Command) -> LauncherSpec {
    let (checkboxes, parameters) = options_from_command(cmd);
    let title = cmd
        .get_about()
        .map(|a| a.to_string())
        .unwrap_or_else(|| cmd.get_name().to_string());
    LauncherSpec {
        program: program.into(),
        title,
        checkboxes,
        parameters,
        ..Default::default()
    }
}

/// `--long` when available, else `-s`.
fn flag_of(arg: &Arg) -> Option<String> {
    arg.get_long()
        .map(|l| format!("--{l}"))
        .or_else(|| arg.get_short().map(|s| format!("-{s}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::builder::PossibleValuesParser;

    fn demo_command() -> Command {
        Command::new("demo")
            .about("Demo program")
            .arg(Arg::new("input").required(false))
            .arg(
                Arg::new("verbose")
                    .long("verbose")
                    .short('v')
                    .action(ArgAction::SetTrue)
                    .help("Show detailed output"),
            )
            .arg(Arg::new("quiet").short('q').action(ArgAction::SetTrue))
            .arg(
                Arg::new("count")
                    .long("count")
                    .default_value("10")
                    .help("Repeat count"),
            )
            .arg(Arg::new("output").long("output").help("Output path"))
            .arg(
                Arg::new("mode")
                    .long("mode")
                    .value_parser(PossibleValuesParser::new(["fast", "normal", "safe"]))
                    .default_value("normal")
                    .help("Run mode"),
            )
    }

    #[test]
    fn flags_become_checkboxes() {
        let (checkboxes, _) = options_from_command(&demo_command());
        let args: Vec<_> = checkboxes.iter().map(|c| c.arg.as_str()).collect();
        assert_eq!(args, vec!["--verbose", "-q"]);
        assert_eq!(checkboxes[0].label, "Show detailed output");
        assert_eq!(checkboxes[1].label, "quiet");
    }

    #[test]
    fn value_args_become_inputs_and_selects() {
        let (_, params) = options_from_command(&demo_command());
        assert_eq!(params.len(), 3);

        match &params[0] {
            ParameterOption::Input(i) => {
                assert_eq!(i.arg, "--count");
                assert_eq!(i.default, "10");
                assert_eq!(i.placeholder, "default: 10");
            }
            other => panic!("expected input, got {other:?}"),
        }
        match &params[1] {
            ParameterOption::Input(i) => {
                assert_eq!(i.default, "");
                assert!(i.placeholder.is_empty());
            }
            other => panic!("expected input, got {other:?}"),
        }
        match &params[2] {
            ParameterOption::Select(s) => {
                assert_eq!(s.choices, vec!["fast", "normal", "safe"]);
                assert_eq!(s.default.as_deref(), Some("normal"));
            }
            other => panic!("expected select, got {other:?}"),
        }
    }

    #[test]
    fn help_and_positionals_skipped() {
        let mut cmd = demo_command();
        cmd.build();
        let (checkboxes, params) = options_from_command(&cmd);
        assert!(checkboxes.iter().all(|c| c.id != "help"));
        assert!(params.iter().all(|p| p.id() != "input"));
    }

    #[test]
    fn launcher_from_command_validates() {
        let spec = launcher_from_command("demo.py", &demo_command());
        assert_eq!(spec.title, "Demo program");
        assert!(spec.validate().is_ok());
    }
}
