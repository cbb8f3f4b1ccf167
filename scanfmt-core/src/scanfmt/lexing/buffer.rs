//! The scan window shared by a scanner driver and its syntax state machines.

/// Result of testing a delimiter against the window at some index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternMatch {
    /// Every character of the pattern is present.
    Full,
    /// The window ends before the pattern does, and everything up to the end matches.
    Partial,
    No,
}

/// Characters of the current scan window plus the cursor bookkeeping.
///
/// Indices are relative to the window. `start_pos` is the absolute position of the first
/// character, so `start_pos + offset` is the absolute scan position.
///
/// Invariants: `token_offset <= offset <= stop <= chars.len()`.
#[derive(Debug, Clone, Default)]
pub struct ScanBuffer {
    pub(crate) chars: Vec<char>,
    pub(crate) offset: usize,
    pub(crate) token_offset: usize,
    pub(crate) stop: usize,
    pub(crate) last: bool,
    pub(crate) start_pos: usize,
}

impl ScanBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Character under the cursor, or `None` once the cursor reached the stop offset.
    pub fn current(&self) -> Option<char> {
        if self.offset < self.stop {
            Some(self.chars[self.offset])
        } else {
            None
        }
    }

    pub fn advance(&mut self) {
        self.offset += 1;
    }

    /// Steps back one character so the main loop looks at it again.
    pub fn retreat(&mut self) {
        debug_assert!(self.offset > self.token_offset);
        self.offset -= 1;
    }

    /// Characters consumed by the pending token so far.
    pub fn token_len(&self) -> usize {
        self.offset - self.token_offset
    }

    /// Cuts the pending token back to `len` characters.
    pub fn rewind_token_to(&mut self, len: usize) {
        self.offset = self.token_offset + len;
    }

    /// Whether no text follows the current window.
    pub fn is_last(&self) -> bool {
        self.last
    }

    pub fn token_chars(&self) -> &[char] {
        &self.chars[self.token_offset..self.offset]
    }

    /// Absolute scan position.
    pub fn position(&self) -> usize {
        self.start_pos + self.offset
    }

    /// Absolute position of the pending token.
    pub fn token_position(&self) -> usize {
        self.start_pos + self.token_offset
    }

    pub(crate) fn absolute(&self, index: usize) -> usize {
        self.start_pos + index
    }

    pub(crate) fn load(&mut self, chars: Vec<char>, start_pos: usize, prescan: usize, last: bool) {
        self.stop = chars.len();
        self.chars = chars;
        self.start_pos = start_pos;
        self.token_offset = 0;
        self.offset = prescan.min(self.stop);
        self.last = last;
    }

    /// Drops everything before the pending token and appends `text`.
    pub(crate) fn splice(&mut self, text: &str, last: bool) {
        let keep_from = self.token_offset;
        let scanned = self.offset - keep_from;
        self.chars.drain(..keep_from);
        self.chars.extend(text.chars());
        self.start_pos += keep_from;
        self.token_offset = 0;
        self.offset = scanned;
        self.stop = self.chars.len();
        self.last = last;
    }

    /// Marks the pending token as emitted.
    pub(crate) fn finish_token(&mut self) {
        self.token_offset = self.offset;
    }

    /// Window characters for an absolute span, if the span is still inside the window.
    pub(crate) fn slice_abs(&self, start: usize, len: usize) -> Option<&[char]> {
        let from = start.checked_sub(self.start_pos)?;
        self.chars.get(from..from + len)
    }

    /// Characters received but not yet emitted as tokens.
    pub(crate) fn pending(&self) -> &[char] {
        &self.chars[self.token_offset..self.stop]
    }

    pub(crate) fn match_at(&self, index: usize, pattern: &[char]) -> PatternMatch {
        for (i, expected) in pattern.iter().enumerate() {
            match self.chars.get(index + i) {
                Some(ch) if index + i < self.stop => {
                    if ch != expected {
                        return PatternMatch::No;
                    }
                }
                _ => return PatternMatch::Partial,
            }
        }
        PatternMatch::Full
    }
}
