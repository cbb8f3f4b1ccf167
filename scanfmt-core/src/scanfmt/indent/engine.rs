//! Hot character resolver chain

use super::document::{BadLocation, Document, DocumentMut};
use crate::scanfmt::formatting::FormatOptions;
use std::fmt;
use tracing::{debug, warn};

/// Computes the indentation column for the row of a hot character at an offset, or `None`
/// to let the next resolver try.
pub type Resolver =
    Box<dyn Fn(&dyn Document, usize, &FormatOptions) -> Result<Option<usize>, BadLocation>>;

pub struct IndentEngine {
    options: FormatOptions,
    resolvers: Vec<(char, Resolver)>,
}

impl fmt::Debug for IndentEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndentEngine")
            .field("options", &self.options)
            .field(
                "hot",
                &self.resolvers.iter().map(|(ch, _)| *ch).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl IndentEngine {
    pub fn new(options: FormatOptions) -> Self {
        Self {
            options,
            resolvers: Vec::new(),
        }
    }

    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    /// Appends a resolver for `hot`. Earlier registrations are asked first.
    pub fn register<F>(&mut self, hot: char, resolver: F)
    where
        F: Fn(&dyn Document, usize, &FormatOptions) -> Result<Option<usize>, BadLocation> + 'static,
    {
        self.resolvers.push((hot, Box::new(resolver)));
    }

    pub fn is_hot_char(&self, ch: char) -> bool {
        self.resolvers.iter().any(|(hot, _)| *hot == ch)
    }

    /// Indentation for the row of the hot character at `offset`.
    pub fn find_indent(&self, doc: &dyn Document, offset: usize) -> Option<usize> {
        let ch = match doc.char_at(offset) {
            Ok(ch) => ch,
            Err(err) => {
                warn!(%err, "indent query at a bad location");
                return None;
            }
        };
        self.resolve(doc, offset, |hot| hot == ch)
    }

    /// Like [`find_indent`](Self::find_indent) but asks every resolver, whatever the
    /// character at `offset`.
    pub fn find_any_indent(&self, doc: &dyn Document, offset: usize) -> Option<usize> {
        self.resolve(doc, offset, |_| true)
    }

    fn resolve(
        &self,
        doc: &dyn Document,
        offset: usize,
        wanted: impl Fn(char) -> bool,
    ) -> Option<usize> {
        for (hot, resolver) in self.resolvers.iter().filter(|(hot, _)| wanted(*hot)) {
            match resolver(doc, offset, &self.options) {
                Ok(Some(indent)) => {
                    debug!(hot = %hot, offset, indent, "indent resolved");
                    return Some(indent);
                }
                Ok(None) => {}
                Err(err) => warn!(%err, hot = %hot, "resolver hit a bad location"),
            }
        }
        None
    }

    /// Rewrites the leading whitespace of the row containing `offset` to `indent` columns
    /// and returns where a caret at `offset` ends up.
    ///
    /// A caret inside the old leading whitespace moves to the end of the new one.
    pub fn indent_line(&self, doc: &mut dyn DocumentMut, offset: usize, indent: usize) -> usize {
        match self.try_indent_line(doc, offset, indent) {
            Ok(moved) => moved,
            Err(err) => {
                warn!(%err, "cannot indent line");
                offset
            }
        }
    }

    fn try_indent_line(
        &self,
        doc: &mut dyn DocumentMut,
        offset: usize,
        indent: usize,
    ) -> Result<usize, BadLocation> {
        let start = doc.row_start(offset)?;
        let old_len = doc.row_leading_whitespace(offset)?.chars().count();
        let new = self.options.indent_string(indent);
        let new_len = new.chars().count();
        doc.replace(start, start + old_len, &new)?;
        if offset >= start + old_len {
            Ok(offset - old_len + new_len)
        } else {
            Ok(start + new_len)
        }
    }

    /// Reindents the row of the hot character at `offset`, if a resolver has an answer.
    pub fn reindent<D: DocumentMut>(&self, doc: &mut D, offset: usize) -> usize {
        match self.find_indent(&*doc, offset) {
            Some(indent) => self.indent_line(doc, offset, indent),
            None => offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanfmt::indent::TextDocument;

    fn engine() -> IndentEngine {
        let mut engine = IndentEngine::new(FormatOptions::default());
        engine.register(';', |_, _, _| Ok(None));
        engine.register(';', |_, _, _| Ok(Some(4)));
        engine.register(';', |_, _, _| Ok(Some(8)));
        engine.register('x', |doc, _, _| Err(BadLocation { offset: 99, len: doc.len() }));
        engine
    }

    #[test]
    fn test_first_answer_wins() {
        let doc = TextDocument::new("a;");
        assert_eq!(engine().find_indent(&doc, 1), Some(4));
    }

    #[test]
    fn test_no_resolver_for_char() {
        let doc = TextDocument::new("a;");
        assert_eq!(engine().find_indent(&doc, 0), None);
        assert!(engine().is_hot_char(';'));
        assert!(!engine().is_hot_char('a'));
    }

    #[test]
    fn test_bad_location_is_unresolved() {
        let doc = TextDocument::new("x");
        assert_eq!(engine().find_indent(&doc, 0), None);
        assert_eq!(engine().find_indent(&doc, 5), None);
    }

    #[test]
    fn test_find_any_indent_asks_everyone() {
        let doc = TextDocument::new("a");
        assert_eq!(engine().find_any_indent(&doc, 0), Some(4));
    }

    #[test]
    fn test_indent_line_moves_caret() {
        let engine = IndentEngine::new(FormatOptions::default());
        let mut doc = TextDocument::new("{\n  x;\n");
        assert_eq!(engine.indent_line(&mut doc, 5, 4), 7);
        assert_eq!(doc.as_string(), "{\n    x;\n");

        let mut doc = TextDocument::new("{\n        x;\n");
        assert_eq!(engine.indent_line(&mut doc, 3, 4), 6);
        assert_eq!(doc.as_string(), "{\n    x;\n");
    }

    #[test]
    fn test_indent_line_bad_location_keeps_offset() {
        let engine = IndentEngine::new(FormatOptions::default());
        let mut doc = TextDocument::new("x");
        assert_eq!(engine.indent_line(&mut doc, 9, 4), 9);
        assert_eq!(doc.as_string(), "x");
    }
}
