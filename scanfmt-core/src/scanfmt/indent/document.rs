//! Document abstraction used by indentation resolvers
//!
//! Offsets count characters. A row is a line without its terminator; `row_end` points at
//! the `\n` or at the end of the document.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("offset {offset} is outside the document (length {len})")]
pub struct BadLocation {
    pub offset: usize,
    pub len: usize,
}

/// Read access to the text being edited.
pub trait Document {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn text(&self, start: usize, end: usize) -> Result<String, BadLocation>;

    /// Start of the row containing `offset`.
    fn row_start(&self, offset: usize) -> Result<usize, BadLocation>;

    /// End of the row containing `offset`, before its line terminator.
    fn row_end(&self, offset: usize) -> Result<usize, BadLocation>;

    fn char_at(&self, offset: usize) -> Result<char, BadLocation> {
        self.text(offset, offset + 1)?
            .chars()
            .next()
            .ok_or(BadLocation {
                offset,
                len: self.len(),
            })
    }

    /// Leading whitespace of the row containing `offset`, as it appears in the text.
    fn row_leading_whitespace(&self, offset: usize) -> Result<String, BadLocation> {
        let start = self.row_start(offset)?;
        let end = self.row_end(offset)?;
        Ok(self
            .text(start, end)?
            .chars()
            .take_while(|ch| matches!(ch, ' ' | '\t'))
            .collect())
    }

    /// Indentation column of the row containing `offset`.
    fn row_indent(&self, offset: usize, tab_size: usize) -> Result<usize, BadLocation> {
        let leading = self.row_leading_whitespace(offset)?;
        Ok(leading.chars().fold(0, |col, ch| match ch {
            '\t' if tab_size > 0 => (col / tab_size + 1) * tab_size,
            _ => col + 1,
        }))
    }

    /// Offset of the first non-blank character of the row, if the row has one.
    fn row_first_non_blank(&self, offset: usize) -> Result<Option<usize>, BadLocation> {
        let start = self.row_start(offset)?;
        let end = self.row_end(offset)?;
        let row = self.text(start, end)?;
        Ok(row
            .chars()
            .position(|ch| !matches!(ch, ' ' | '\t'))
            .map(|i| start + i))
    }
}

/// A document the indentation engine may rewrite.
pub trait DocumentMut: Document {
    fn replace(&mut self, start: usize, end: usize, text: &str) -> Result<(), BadLocation>;
}

/// In-memory document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextDocument {
    chars: Vec<char>,
}

impl TextDocument {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
        }
    }

    pub fn as_string(&self) -> String {
        self.chars.iter().collect()
    }

    fn check(&self, offset: usize) -> Result<(), BadLocation> {
        if offset > self.chars.len() {
            return Err(BadLocation {
                offset,
                len: self.chars.len(),
            });
        }
        Ok(())
    }
}

impl Document for TextDocument {
    fn len(&self) -> usize {
        self.chars.len()
    }

    fn text(&self, start: usize, end: usize) -> Result<String, BadLocation> {
        self.check(end)?;
        if start > end {
            return Err(BadLocation {
                offset: start,
                len: self.chars.len(),
            });
        }
        Ok(self.chars[start..end].iter().collect())
    }

    fn row_start(&self, offset: usize) -> Result<usize, BadLocation> {
        self.check(offset)?;
        Ok(self.chars[..offset]
            .iter()
            .rposition(|&ch| ch == '\n')
            .map_or(0, |i| i + 1))
    }

    fn row_end(&self, offset: usize) -> Result<usize, BadLocation> {
        self.check(offset)?;
        Ok(self.chars[offset..]
            .iter()
            .position(|&ch| ch == '\n')
            .map_or(self.chars.len(), |i| offset + i))
    }
}

impl DocumentMut for TextDocument {
    fn replace(&mut self, start: usize, end: usize, text: &str) -> Result<(), BadLocation> {
        self.check(end)?;
        if start > end {
            return Err(BadLocation {
                offset: start,
                len: self.chars.len(),
            });
        }
        self.chars.splice(start..end, text.chars());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows() {
        let doc = TextDocument::new("ab\n\t cd\n");
        assert_eq!(doc.row_start(4), Ok(3));
        assert_eq!(doc.row_end(4), Ok(7));
        assert_eq!(doc.row_start(8), Ok(8));
        assert_eq!(doc.row_end(8), Ok(8));
        assert_eq!(doc.row_indent(5, 8), Ok(9));
        assert_eq!(doc.row_first_non_blank(3), Ok(Some(5)));
        assert_eq!(doc.char_at(5), Ok('c'));
    }

    #[test]
    fn test_bad_location() {
        let doc = TextDocument::new("ab");
        assert_eq!(doc.row_start(3), Err(BadLocation { offset: 3, len: 2 }));
        assert!(doc.char_at(2).is_err());
    }

    #[test]
    fn test_replace() {
        let mut doc = TextDocument::new("  x");
        doc.replace(0, 2, "\t").expect("in range");
        assert_eq!(doc.as_string(), "\tx");
    }
}
