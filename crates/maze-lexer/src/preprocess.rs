//! Source normalisation.
//!
//! Programs usually arrive from a text widget or a file written on any
//! platform. Before tokenizing, line endings are unified and tabs are
//! expanded, and the author receives advisory [`SourceNote`]s about what
//! was changed. Notes never make a program invalid.

use std::fmt;

/// Preferred indentation width. Tabs expand to the next multiple of it.
pub const INDENT_SPACES: usize = 4;

/// An advisory remark about the program's whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceNote {
    /// Leading whitespace on these lines contained tabs.
    TabsConverted { lines: Vec<u32> },
    /// Indentation on these lines is not a multiple of [`INDENT_SPACES`].
    IrregularIndent { lines: Vec<u32> },
}

impl SourceNote {
    /// The affected 1-based line numbers, ascending.
    pub fn lines(&self) -> &[u32] {
        match self {
            SourceNote::TabsConverted { lines } | SourceNote::IrregularIndent { lines } => lines,
        }
    }
}

impl fmt::Display for SourceNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceNote::TabsConverted { lines } => write!(
                f,
                "Converted tabs to {INDENT_SPACES} spaces on lines {}.",
                format_line_list(lines)
            ),
            SourceNote::IrregularIndent { lines } => write!(
                f,
                "Indentation on lines {} is not a multiple of {INDENT_SPACES} spaces; \
                 multiples of {INDENT_SPACES} are easier to read.",
                format_line_list(lines)
            ),
        }
    }
}

/// Normalise program text: `\r\n` and `\r` become `\n`, a leading BOM is
/// dropped and tabs are expanded to [`INDENT_SPACES`] columns.
///
/// Returns the normalised text and the notes collected on the way.
pub fn normalize_source(text: &str) -> (String, Vec<SourceNote>) {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut tab_lines = Vec::new();
    let mut odd_lines = Vec::new();
    let mut out = String::with_capacity(unified.len());

    for (idx, line) in unified.split('\n').enumerate() {
        let line_no = idx as u32 + 1;
        if idx > 0 {
            out.push('\n');
        }

        let leading = &line[..line.len() - line.trim_start_matches([' ', '\t']).len()];
        if leading.contains('\t') {
            tab_lines.push(line_no);
        }

        let expanded = expand_tabs(line);
        let body = expanded.trim_start_matches(' ');
        let indent = expanded.len() - body.len();
        if !body.trim().is_empty() && indent % INDENT_SPACES != 0 {
            odd_lines.push(line_no);
        }
        out.push_str(&expanded);
    }

    let mut notes = Vec::new();
    if !tab_lines.is_empty() {
        notes.push(SourceNote::TabsConverted { lines: tab_lines });
    }
    if !odd_lines.is_empty() {
        notes.push(SourceNote::IrregularIndent { lines: odd_lines });
    }
    (out, notes)
}

/// Replace each tab with spaces up to the next multiple of [`INDENT_SPACES`].
fn expand_tabs(line: &str) -> String {
    if !line.contains('\t') {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len() + INDENT_SPACES);
    let mut column = 0;
    for ch in line.chars() {
        if ch == '\t' {
            let pad = INDENT_SPACES - column % INDENT_SPACES;
            out.extend(std::iter::repeat(' ').take(pad));
            column += pad;
        } else {
            out.push(ch);
            column += 1;
        }
    }
    out
}

/// Compact a list of line numbers into ranges: `[1, 2, 3, 5, 6]` becomes
/// `"1–3, 5–6"`. Input order and duplicates do not matter.
pub fn format_line_list(lines: &[u32]) -> String {
    let mut sorted = lines.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut ranges: Vec<(u32, u32)> = Vec::new();
    for n in sorted {
        match ranges.last_mut() {
            Some((_, end)) if *end + 1 == n => *end = n,
            _ => ranges.push((n, n)),
        }
    }

    ranges
        .iter()
        .map(|&(start, end)| {
            if start == end {
                start.to_string()
            } else {
                format!("{start}–{end}")
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
