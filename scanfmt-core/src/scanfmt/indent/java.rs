//! Java indentation resolvers
//!
//! Brace matching runs the Java scanner over the document up to the hot character, so
//! braces inside strings, character literals and comments never count. A hot character
//! that is itself inside one of those gets no answer.

use super::document::{BadLocation, Document};
use super::engine::IndentEngine;
use crate::scanfmt::formatting::FormatOptions;
use crate::scanfmt::lexing::{JavaSyntax, JavaTokenId, Operator, Scanner};

struct BraceScan {
    /// Offsets of the braces still open before the hot character, innermost last.
    open: Vec<usize>,
    /// The operator token at the hot offset, if there is one.
    hot: Option<Operator>,
}

fn scan_to(doc: &dyn Document, offset: usize) -> Result<BraceScan, BadLocation> {
    let text = doc.text(0, offset + 1)?;
    let mut scanner = Scanner::new(JavaSyntax::new());
    let mut scan = BraceScan {
        open: Vec::new(),
        hot: None,
    };
    if scanner.load(None, &text, 0, true).is_err() {
        return Ok(scan);
    }
    while let Some(token) = scanner.next_token() {
        if token.id != JavaTokenId::Operator.id() {
            continue;
        }
        let op = token.helper.and_then(Operator::from_code);
        if token.offset == offset {
            scan.hot = op;
            break;
        }
        match op {
            Some(Operator::LBrace) => scan.open.push(token.offset),
            Some(Operator::RBrace) => {
                scan.open.pop();
            }
            _ => {}
        }
    }
    Ok(scan)
}

/// Indentation of a statement inside the innermost open block.
fn block_indent(
    doc: &dyn Document,
    open: &[usize],
    options: &FormatOptions,
) -> Result<usize, BadLocation> {
    match open.last() {
        Some(&brace) => Ok(doc.row_indent(brace, options.tab_size)? + options.shift_width),
        None => Ok(0),
    }
}

/// `}` lines up with the row of its `{`.
pub fn close_brace(
    doc: &dyn Document,
    offset: usize,
    options: &FormatOptions,
) -> Result<Option<usize>, BadLocation> {
    let scan = scan_to(doc, offset)?;
    if scan.hot != Some(Operator::RBrace) {
        return Ok(None);
    }
    match scan.open.last() {
        Some(&brace) => Ok(Some(doc.row_indent(brace, options.tab_size)?)),
        None => Ok(None),
    }
}

/// A `{` starting its row is indented like a statement of the enclosing block.
pub fn open_brace(
    doc: &dyn Document,
    offset: usize,
    options: &FormatOptions,
) -> Result<Option<usize>, BadLocation> {
    let scan = scan_to(doc, offset)?;
    if scan.hot != Some(Operator::LBrace) || doc.row_first_non_blank(offset)? != Some(offset) {
        return Ok(None);
    }
    block_indent(doc, &scan.open, options).map(Some)
}

pub fn semicolon(
    doc: &dyn Document,
    offset: usize,
    options: &FormatOptions,
) -> Result<Option<usize>, BadLocation> {
    let scan = scan_to(doc, offset)?;
    if scan.hot != Some(Operator::Semicolon) {
        return Ok(None);
    }
    block_indent(doc, &scan.open, options).map(Some)
}

/// `case` and `default` labels sit one level inside the `switch` block.
pub fn label_colon(
    doc: &dyn Document,
    offset: usize,
    options: &FormatOptions,
) -> Result<Option<usize>, BadLocation> {
    let scan = scan_to(doc, offset)?;
    if scan.hot != Some(Operator::Colon) {
        return Ok(None);
    }
    let Some(first) = doc.row_first_non_blank(offset)? else {
        return Ok(None);
    };
    let row = doc.text(first, doc.row_end(offset)?)?;
    let is_label = ["case", "default"].iter().any(|kw| {
        row.strip_prefix(kw)
            .is_some_and(|rest| !rest.starts_with(|ch: char| ch.is_alphanumeric() || ch == '_'))
    });
    if !is_label {
        return Ok(None);
    }
    block_indent(doc, &scan.open, options).map(Some)
}

impl IndentEngine {
    /// Engine with the Java resolvers for `}`, `{`, `;` and `:`.
    pub fn java(options: FormatOptions) -> Self {
        let mut engine = IndentEngine::new(options);
        engine.register('}', close_brace);
        engine.register('{', open_brace);
        engine.register(';', semicolon);
        engine.register(':', label_colon);
        engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanfmt::indent::TextDocument;

    fn offset_of(doc: &str, needle: &str) -> usize {
        let byte = doc.rfind(needle).expect("needle in document");
        doc[..byte].chars().count()
    }

    #[test]
    fn test_close_brace_matches_open_row() {
        let text = "class A {\n    void f() {\n        int x;\n        }\n}";
        let doc = TextDocument::new(text);
        let engine = IndentEngine::java(FormatOptions::default());
        assert_eq!(engine.find_indent(&doc, offset_of(text, "        }") + 8), Some(4));
        assert_eq!(engine.find_indent(&doc, offset_of(text, "}")), Some(0));
    }

    #[test]
    fn test_braces_in_strings_and_comments_are_ignored() {
        let text = "class A {\n    String s = \"{\"; // {\n        }";
        let doc = TextDocument::new(text);
        let engine = IndentEngine::java(FormatOptions::default());
        assert_eq!(engine.find_indent(&doc, offset_of(text, "}")), Some(0));
    }

    #[test]
    fn test_hot_char_inside_string_is_unresolved() {
        let text = "x = \"}\"";
        let doc = TextDocument::new(text);
        let engine = IndentEngine::java(FormatOptions::default());
        assert_eq!(engine.find_indent(&doc, 5), None);
    }

    #[test]
    fn test_semicolon_indents_statement() {
        let text = "void f() {\nint x;";
        let doc = TextDocument::new(text);
        let engine = IndentEngine::java(FormatOptions::default());
        assert_eq!(engine.find_indent(&doc, offset_of(text, ";")), Some(4));
    }

    #[test]
    fn test_open_brace_on_own_line() {
        let text = "void f() {\n    if (a)\n{";
        let doc = TextDocument::new(text);
        let engine = IndentEngine::java(FormatOptions::default());
        assert_eq!(engine.find_indent(&doc, offset_of(text, "{")), Some(4));
        assert_eq!(engine.find_indent(&doc, offset_of(text, "() {") + 3), None);
    }

    #[test]
    fn test_case_label() {
        let text = "switch (x) {\n  case 1:\n  other:";
        let doc = TextDocument::new(text);
        let engine = IndentEngine::java(FormatOptions::default());
        assert_eq!(engine.find_indent(&doc, offset_of(text, "1:") + 1), Some(4));
        assert_eq!(engine.find_indent(&doc, offset_of(text, ":")), None);
    }

    #[test]
    fn test_reindent_rewrites_row() {
        let text = "if (a) {\n    x();\n    }";
        let mut doc = TextDocument::new(text);
        let engine = IndentEngine::java(FormatOptions::default());
        let caret = engine.reindent(&mut doc, offset_of(text, "}"));
        assert_eq!(doc.as_string(), "if (a) {\n    x();\n}");
        assert_eq!(caret, offset_of("if (a) {\n    x();\n}", "}"));
    }
}
