//! The format writer and its line buffer

use super::options::{FormatOptions, WriterOptions};
use super::sink::TextSink;
use crate::scanfmt::lexing::{ScanError, Scanner, Syntax};
use crate::scanfmt::token::Token;
use std::{fmt, io};
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("failed to write formatted text: {0}")]
    Io(#[from] io::Error),
    #[error("the writer is closed")]
    Closed,
    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// Per-language formatting rules.
///
/// The writer owns line assembly and indentation output. A layer decides which tokens
/// count as leading whitespace and may rewrite any other token, move the indentation of
/// the current or the next line, or break the line.
pub trait FormatLayer {
    type Syntax: Syntax;

    fn create_syntax(&self) -> Self::Syntax;

    /// Whether `token` is whitespace that may be dropped at the start of a line.
    fn is_initial_whitespace(&self, token: &Token) -> bool;

    fn format_token(&mut self, line: &mut LineCtx<'_>, _token: &Token, text: &str) {
        line.push_str(text);
    }

    /// Characters removed by trailing whitespace trimming.
    fn is_line_whitespace(ch: char) -> bool {
        matches!(ch, ' ' | '\t')
    }
}

/// The line being assembled.
#[derive(Debug, Clone)]
pub(crate) struct LineBuffer {
    text: String,
    indent: usize,
    next_indent: usize,
    first_line: bool,
    first_token: bool,
    at_line_begin: bool,
    flushed_early: bool,
    /// Text of the current line already written by an early flush.
    flushed_text: bool,
}

impl LineBuffer {
    fn new(options: &WriterOptions) -> Self {
        Self {
            text: String::new(),
            indent: options.start_indent,
            next_indent: options.start_indent,
            first_line: true,
            first_token: true,
            at_line_begin: options.start_at_line_begin,
            flushed_early: false,
            flushed_text: false,
        }
    }

    /// Moves the line into `output`. An early write leaves the line open.
    fn write_out(&mut self, output: &mut String, options: &FormatOptions, early: bool) {
        let empty = self.text.is_empty() || self.text == "\n";
        // An empty first line flushed early still gets its indentation.
        let indent_only = early && empty && !self.flushed_early && self.first_line;
        let indented = (!empty || indent_only) && !self.flushed_early && self.at_line_begin;
        if indented {
            output.push_str(&options.indent_string(self.indent));
        }
        output.push_str(&self.text);
        debug!(
            indent = self.indent,
            indented,
            early,
            len = self.text.len(),
            "line written"
        );
        self.text.clear();

        if early {
            if !empty || indent_only {
                self.flushed_early = true;
            }
            self.flushed_text |= !empty;
            return;
        }
        self.indent = self.next_indent;
        self.first_line = false;
        self.first_token = true;
        self.at_line_begin = true;
        self.flushed_early = false;
        self.flushed_text = false;
    }

    /// Completes the line with `eol` and writes it out.
    fn finish(
        &mut self,
        output: &mut String,
        options: &FormatOptions,
        is_ws: fn(char) -> bool,
        eol: &str,
    ) {
        let body_len = self.text.len();
        self.text.push_str(eol);
        if options.trim_trailing_whitespace {
            let kept = self.text[..body_len].trim_end_matches(is_ws).len();
            self.text.replace_range(kept..body_len, "");
        }
        self.write_out(output, options, false);
    }
}

/// What a [`FormatLayer`] sees of the line being assembled.
pub struct LineCtx<'a> {
    line: &'a mut LineBuffer,
    output: &'a mut String,
    options: &'a FormatOptions,
    is_ws: fn(char) -> bool,
}

impl<'a> LineCtx<'a> {
    pub fn options(&self) -> &'a FormatOptions {
        self.options
    }

    pub fn push_str(&mut self, text: &str) {
        self.line.text.push_str(text);
    }

    pub fn push(&mut self, ch: char) {
        self.line.text.push(ch);
    }

    /// Line text collected so far, without indentation.
    pub fn text(&self) -> &str {
        &self.line.text
    }

    pub fn indent(&self) -> usize {
        self.line.indent
    }

    pub fn set_indent(&mut self, indent: usize) {
        self.line.indent = indent;
    }

    pub fn next_indent(&self) -> usize {
        self.line.next_indent
    }

    pub fn set_next_indent(&mut self, indent: usize) {
        self.line.next_indent = indent;
    }

    /// Whether nothing but dropped whitespace came before the current token.
    pub fn is_first_token(&self) -> bool {
        self.line.first_token
    }

    pub fn has_content(&self) -> bool {
        let is_ws = self.is_ws;
        self.line.text.chars().any(|ch| !is_ws(ch) && ch != '\n')
    }

    /// Ends the current line here. The next line starts at the next-line indent.
    pub fn break_line(&mut self) {
        self.line.finish(self.output, self.options, self.is_ws, "\n");
    }
}

/// Reformats text streamed through it and writes the result to a [`TextSink`].
///
/// Complete lines are collected in an output buffer that reaches the sink on `flush()` and
/// `close()`.
pub struct FormatWriter<L: FormatLayer, W: TextSink> {
    layer: L,
    scanner: Scanner<L::Syntax>,
    options: FormatOptions,
    line: LineBuffer,
    output: String,
    sink: W,
    loaded: bool,
    closed: bool,
    /// Pending scanner characters already copied into the line by an early flush.
    pending_emitted: usize,
}

impl<L: FormatLayer, W: TextSink> FormatWriter<L, W> {
    pub fn new(layer: L, options: FormatOptions, writer_options: WriterOptions, sink: W) -> Self {
        let scanner = Scanner::new(layer.create_syntax());
        Self {
            layer,
            scanner,
            options,
            line: LineBuffer::new(&writer_options),
            output: String::new(),
            sink,
            loaded: false,
            closed: false,
            pending_emitted: 0,
        }
    }

    pub fn write(&mut self, text: &str) -> Result<(), FormatError> {
        if self.closed {
            return Err(FormatError::Closed);
        }
        self.feed(text, false)
    }

    /// Writes out everything received so far, including the unfinished line.
    pub fn flush(&mut self) -> Result<(), FormatError> {
        if self.closed {
            return Err(FormatError::Closed);
        }
        self.copy_pending();
        self.line.write_out(&mut self.output, &self.options, true);
        self.deliver()
    }

    /// Scans the remaining text, ends a non-empty last line and closes the sink.
    ///
    /// Closing twice is a no-op.
    pub fn close(&mut self) -> Result<(), FormatError> {
        if self.closed {
            return Ok(());
        }
        self.feed("", true)?;
        if !self.line.text.is_empty() || self.line.flushed_text {
            self.line
                .finish(&mut self.output, &self.options, L::is_line_whitespace, "\n");
        }
        self.deliver()?;
        self.sink.close()?;
        self.closed = true;
        Ok(())
    }

    /// Whether the current line was partly written by an early flush.
    pub fn flushed_early(&self) -> bool {
        self.line.flushed_early
    }

    pub fn indent(&self) -> usize {
        self.line.indent
    }

    pub fn next_indent(&self) -> usize {
        self.line.next_indent
    }

    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    pub fn layer(&self) -> &L {
        &self.layer
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    pub fn into_sink(self) -> W {
        self.sink
    }

    fn feed(&mut self, text: &str, last: bool) -> Result<(), FormatError> {
        if self.loaded {
            self.scanner.relocate(text, last);
        } else {
            self.scanner.load(None, text, 0, last)?;
            self.loaded = true;
        }
        while let Some(token) = self.scanner.next_token() {
            let text = self.scanner.token_text(&token);
            let skip = self.pending_emitted.min(token.len);
            self.pending_emitted -= skip;
            let rest = match text.char_indices().nth(skip) {
                Some((at, _)) => &text[at..],
                None => "",
            };
            if rest.is_empty() {
                continue;
            }
            if token.is_eol() {
                self.line
                    .finish(&mut self.output, &self.options, L::is_line_whitespace, rest);
            } else {
                self.format_token(&token, rest);
            }
        }
        Ok(())
    }

    fn format_token(&mut self, token: &Token, text: &str) {
        if self.options.ignore_initial_whitespace
            && self.line.first_token
            && self.layer.is_initial_whitespace(token)
        {
            trace!(offset = token.offset, "leading whitespace dropped");
            return;
        }
        let mut ctx = LineCtx {
            line: &mut self.line,
            output: &mut self.output,
            options: &self.options,
            is_ws: L::is_line_whitespace,
        };
        self.layer.format_token(&mut ctx, token, text);
        self.line.first_token = false;
    }

    /// Copies the unfinished token into the line so a flush can show it.
    fn copy_pending(&mut self) {
        let pending = self.scanner.pending_text();
        let total = pending.chars().count();
        let fresh: String = pending.chars().skip(self.pending_emitted).collect();
        self.pending_emitted = total;
        if fresh.is_empty() {
            return;
        }
        if self.options.ignore_initial_whitespace
            && self.line.first_token
            && fresh.chars().all(L::is_line_whitespace)
        {
            return;
        }
        self.line.text.push_str(&fresh);
        self.line.first_token = false;
    }

    fn deliver(&mut self) -> Result<(), FormatError> {
        if !self.output.is_empty() {
            self.sink.write_str(&self.output)?;
            self.output.clear();
        }
        self.sink.flush()?;
        Ok(())
    }
}

impl<L: FormatLayer, W: TextSink> fmt::Write for FormatWriter<L, W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write(s).map_err(|_| fmt::Error)
    }
}

/// Formats a whole text in one go.
pub fn format_text<L: FormatLayer>(
    layer: L,
    options: &FormatOptions,
    text: &str,
) -> Result<String, FormatError> {
    let mut writer = FormatWriter::new(layer, options.clone(), WriterOptions::default(), String::new());
    writer.write(text)?;
    writer.close()?;
    Ok(writer.into_sink())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanfmt::formatting::JavaFormatLayer;

    fn writer(start_indent: usize, start_at_line_begin: bool) -> FormatWriter<JavaFormatLayer, String> {
        FormatWriter::new(
            JavaFormatLayer,
            FormatOptions::default(),
            WriterOptions {
                start_indent,
                start_at_line_begin,
            },
            String::new(),
        )
    }

    #[test]
    fn test_reindents_block() {
        let out = format_text(JavaFormatLayer, &FormatOptions::default(), "if(x){\n  y=1;\n}");
        assert_eq!(out.expect("string sink"), "if(x){\n    y=1;\n}\n");
    }

    #[test]
    fn test_early_flush_on_empty_first_line_writes_indentation() {
        let mut w = writer(8, true);
        w.flush().expect("string sink");
        assert_eq!(w.sink(), "        ");
        assert!(w.flushed_early());
    }

    #[test]
    fn test_indent_only_flush_then_typing_is_not_indented_twice() {
        let mut w = writer(8, true);
        w.flush().expect("string sink");
        w.write("x;\n").expect("open");
        w.close().expect("string sink");
        assert_eq!(w.into_sink(), "        x;\n");
    }

    #[test]
    fn test_empty_later_line_stays_empty_on_early_flush() {
        let mut w = writer(0, true);
        w.write("a;\n").expect("open");
        w.flush().expect("string sink");
        assert_eq!(w.sink(), "a;\n");
        assert!(!w.flushed_early());
    }

    #[test]
    fn test_mid_token_flush_then_continue() {
        let mut w = writer(0, true);
        w.write("if(x){\n  fo").expect("open");
        w.flush().expect("string sink");
        assert_eq!(w.sink(), "if(x){\n    fo");
        w.write("o();\n}").expect("open");
        w.close().expect("string sink");
        assert_eq!(w.into_sink(), "if(x){\n    foo();\n}\n");
    }

    #[test]
    fn test_flush_before_close_keeps_final_newline() {
        let mut w = writer(0, true);
        w.write("a;").expect("open");
        w.flush().expect("string sink");
        assert_eq!(w.sink(), "a;");
        w.close().expect("string sink");
        let expected = format_text(JavaFormatLayer, &FormatOptions::default(), "a;");
        assert_eq!(w.into_sink(), expected.expect("string sink"));
    }

    #[test]
    fn test_close_after_indentation_only_flush_adds_no_line() {
        let mut w = writer(4, true);
        w.flush().expect("string sink");
        w.close().expect("string sink");
        assert_eq!(w.into_sink(), "    ");
    }

    /// Leaves every token as written.
    struct Verbatim;

    impl FormatLayer for Verbatim {
        type Syntax = crate::scanfmt::lexing::JavaSyntax;

        fn create_syntax(&self) -> Self::Syntax {
            crate::scanfmt::lexing::JavaSyntax::new()
        }

        fn is_initial_whitespace(&self, _token: &Token) -> bool {
            false
        }
    }

    #[test]
    fn test_default_layer_copies_tokens() {
        let out = format_text(Verbatim, &FormatOptions::default(), "  a  {\nb;  \n}");
        assert_eq!(out.expect("string sink"), "  a  {\nb;\n}\n");
    }

    #[test]
    fn test_no_indentation_when_not_at_line_begin() {
        let mut w = writer(4, false);
        w.write("a;\nb;\n").expect("open");
        w.close().expect("string sink");
        assert_eq!(w.into_sink(), "a;\n    b;\n");
    }

    #[test]
    fn test_trailing_whitespace_is_trimmed() {
        let out = format_text(JavaFormatLayer, &FormatOptions::default(), "a;   \n\nb;\t\n");
        assert_eq!(out.expect("string sink"), "a;\n\nb;\n");
    }

    #[test]
    fn test_write_after_close_fails() {
        let mut w = writer(0, true);
        w.close().expect("string sink");
        assert!(matches!(w.write("x"), Err(FormatError::Closed)));
        assert!(matches!(w.flush(), Err(FormatError::Closed)));
        assert!(w.close().is_ok());
    }

    #[test]
    fn test_fmt_write() {
        use std::fmt::Write as _;
        let mut w = writer(0, true);
        write!(w, "{{\n{};\n}}", "x").expect("open");
        w.close().expect("string sink");
        assert_eq!(w.into_sink(), "{\n    x;\n}\n");
    }
}
