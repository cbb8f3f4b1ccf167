//! Formatter options

use serde::{Deserialize, Serialize};

/// Options read by the writer and the format layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Columns added per indentation level.
    pub shift_width: usize,
    pub tab_size: usize,
    /// Indent with spaces only.
    pub expand_tabs: bool,
    /// `foo (x)` instead of `foo(x)`.
    pub add_space_before_parenthesis: bool,
    /// Moves `{` to a line of its own.
    pub add_newline_before_compound_bracket: bool,
    /// Starts block comment continuation lines with `* `.
    pub add_star_in_block_comments: bool,
    /// Aligns continuation lines one column in, under the `*` of `/*`.
    pub add_space_in_block_comments: bool,
    pub trim_trailing_whitespace: bool,
    /// Drops the original leading whitespace of every line.
    pub ignore_initial_whitespace: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            shift_width: 4,
            tab_size: 8,
            expand_tabs: true,
            add_space_before_parenthesis: false,
            add_newline_before_compound_bracket: false,
            add_star_in_block_comments: true,
            add_space_in_block_comments: true,
            trim_trailing_whitespace: true,
            ignore_initial_whitespace: true,
        }
    }
}

impl FormatOptions {
    /// Whitespace reaching `columns`, with tabs where allowed.
    pub fn indent_string(&self, columns: usize) -> String {
        if self.expand_tabs || self.tab_size == 0 {
            return " ".repeat(columns);
        }
        let mut out = "\t".repeat(columns / self.tab_size);
        out.push_str(&" ".repeat(columns % self.tab_size));
        out
    }

    /// Column reached by `text`, expanding tabs.
    pub fn columns_of(&self, text: &str) -> usize {
        text.chars().fold(0, |col, ch| match ch {
            '\t' if self.tab_size > 0 => (col / self.tab_size + 1) * self.tab_size,
            _ => col + 1,
        })
    }
}

/// Where the writer's output begins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterOptions {
    /// Indentation of the first line, and the base of every later one.
    pub start_indent: usize,
    /// Whether the first line starts at a line start, i.e. needs indentation at all.
    pub start_at_line_begin: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            start_indent: 0,
            start_at_line_begin: true,
        }
    }
}
