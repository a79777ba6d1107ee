//! Input grammar of the line-oriented console presenter.

/// Outcome of the preset prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetChoice {
    /// Blank line: take the prompt default (the first preset).
    Default,
    /// `0`: skip presets and configure by hand.
    Skip,
    /// `n`: apply preset `n - 1` and continue editing.
    Select(usize),
    /// `dd` (the same digit twice): apply preset `d - 1` and run immediately.
    SelectAndRun(usize),
    /// Out of range or not a number.
    Invalid,
}

/// Parse the answer to the preset prompt.
///
/// The repeated-digit shortcut wins over a plain two-digit index, so `11`
/// runs preset 1 even when eleven presets exist.
pub fn parse_preset_choice(input: &str, preset_count: usize) -> PresetChoice {
    let choice = input.trim();
    if choice.is_empty() {
        return PresetChoice::Default;
    }
    if !choice.chars().all(|c| c.is_ascii_digit()) {
        return PresetChoice::Invalid;
    }

    let bytes = choice.as_bytes();
    if bytes.len() == 2 && bytes[0] == bytes[1] {
        let idx = usize::from(bytes[0] - b'0');
        return if (1..=preset_count).contains(&idx) {
            PresetChoice::SelectAndRun(idx - 1)
        } else {
            PresetChoice::Invalid
        };
    }

    match choice.parse::<usize>() {
        Ok(0) => PresetChoice::Skip,
        Ok(n) if n <= preset_count => PresetChoice::Select(n - 1),
        _ => PresetChoice::Invalid,
    }
}

/// Parse whitespace-separated 1-based indices. Any non-integer token
/// invalidates the whole line.
pub fn parse_toggle_indices(input: &str) -> Option<Vec<usize>> {
    input
        .split_whitespace()
        .map(|t| t.parse::<usize>().ok())
        .collect()
}

/// A parsed `index [value]` line from the parameter editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterEdit {
    /// 1-based index as typed.
    pub index: usize,
    /// Everything after the index, with surrounding whitespace removed.
    pub value: Option<String>,
}

/// Parse `idx` or `idx value…`. Returns `None` when the index is not an
/// integer or the line is blank.
pub fn parse_parameter_edit(line: &str) -> Option<ParameterEdit> {
    let line = line.trim();
    let (idx, rest) = match line.split_once(char::is_whitespace) {
        Some((idx, rest)) => (idx, Some(rest.trim())),
        None => (line, None),
    };
    let index = idx.parse::<usize>().ok()?;
    Some(ParameterEdit {
        index,
        value: rest.filter(|r| !r.is_empty()).map(String::from),
    })
}
