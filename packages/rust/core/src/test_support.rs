//! Fixtures shared by unit tests across modules.

use presetui_shared::{
    CheckboxOption, InputOption, LauncherSpec, ParameterOption, PresetConfig, SelectOption,
};

/// A launcher with two flags, two inputs, one select, and two presets
/// (one of them referencing stale ids).
pub(crate) fn demo_spec() -> LauncherSpec {
    let mut spec = LauncherSpec {
        program: "\"demo.py\"".into(),
        title: "Demo".into(),
        extra_args: vec!["--tail".into()],
        checkboxes: vec![
            CheckboxOption {
                label: "Verbose".into(),
                id: "verbose".into(),
                arg: "--verbose".into(),
                default: true,
            },
            CheckboxOption {
                label: "Force".into(),
                id: "force".into(),
                arg: "--force".into(),
                default: false,
            },
        ],
        parameters: vec![
            ParameterOption::Input(InputOption {
                label: "Count".into(),
                id: "count".into(),
                arg: "--count".into(),
                default: "10".into(),
                placeholder: String::new(),
            }),
            ParameterOption::Input(InputOption {
                label: "Output".into(),
                id: "output".into(),
                arg: "--output".into(),
                default: String::new(),
                placeholder: "path".into(),
            }),
            ParameterOption::Select(SelectOption::new(
                "Mode",
                "mode",
                "--mode",
                vec!["fast".into(), "normal".into(), "safe".into()],
                Some("normal".into()),
            )),
        ],
        ..Default::default()
    };
    spec.presets = vec![
        PresetConfig {
            name: "quick".into(),
            description: "fast run".into(),
            checkbox_options: vec!["force".into()],
            input_values: [("count".into(), "50".into()), ("mode".into(), "fast".into())]
                .into_iter()
                .collect(),
        },
        PresetConfig {
            name: "broken".into(),
            description: "stale values".into(),
            checkbox_options: vec!["ghost".into()],
            input_values: [("mode".into(), "warp".into()), ("nope".into(), "1".into())]
                .into_iter()
                .collect(),
        },
    ];
    spec
}
