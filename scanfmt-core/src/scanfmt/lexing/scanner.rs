//! Scanner driver
//!
//! `Scanner` owns the scan window and drives a `Syntax` over it. It is the only type
//! callers talk to: it turns the state machine's kinds into tokens with absolute offsets,
//! splices the pre-scan on relocation and implements the state mark protocol.

use super::buffer::ScanBuffer;
use super::common::{MarkCompare, ScanError, StateMark, Syntax, EOL_NAME};
use crate::scanfmt::token::{Token, TokenId};
use std::borrow::Cow;

/// Drives one syntax over a sequence of text pieces.
///
/// # Examples
///
/// ```ignore
/// let mut scanner = Scanner::new(JavaSyntax::new());
/// scanner.load(None, "int x", 0, false)?;
/// while let Some(token) = scanner.next_token() { /* ... */ }
/// scanner.relocate(" = 1;\n", true);
/// while let Some(token) = scanner.next_token() { /* ... */ }
/// ```
#[derive(Debug, Clone)]
pub struct Scanner<S> {
    syntax: S,
    buf: ScanBuffer,
}

impl<S: Syntax> Scanner<S> {
    /// A scanner with an empty, non-final window. Call `load` before scanning.
    pub fn new(syntax: S) -> Self {
        Self {
            syntax,
            buf: ScanBuffer::new(),
        }
    }

    pub fn syntax(&self) -> &S {
        &self.syntax
    }

    pub fn syntax_mut(&mut self) -> &mut S {
        &mut self.syntax
    }

    pub fn into_syntax(self) -> S {
        self.syntax
    }

    /// Binds a fresh window.
    ///
    /// With a mark, `text` must start with the mark's pre-scan characters and `start_pos`
    /// is the absolute position of the first of them. Without one, scanning starts in the
    /// syntax's initial state.
    pub fn load(
        &mut self,
        mark: Option<&StateMark>,
        text: &str,
        start_pos: usize,
        last: bool,
    ) -> Result<(), ScanError> {
        self.syntax.load_state(mark.map(|m| &m.state))?;
        let prescan = mark.map_or(0, |m| m.prescan);
        self.buf.load(text.chars().collect(), start_pos, prescan, last);
        Ok(())
    }

    /// Continues the session with the next piece of text.
    ///
    /// The unfinished token of the current window is kept in front of `text`; tokens
    /// returned before this call no longer have readable text afterwards.
    pub fn relocate(&mut self, text: &str, last: bool) {
        self.buf.splice(text, last);
    }

    /// Next token, or `None` when the window is exhausted.
    ///
    /// `None` on a non-final window means "give me more text"; the pending characters
    /// are reported by `prescan()`.
    pub fn next_token(&mut self) -> Option<Token> {
        if self.buf.offset >= self.buf.stop && (!self.buf.last || self.buf.token_len() == 0) {
            return None;
        }
        let kind = self.syntax.parse_token(&mut self.buf)?;
        debug_assert!(self.buf.token_len() > 0, "syntax returned an empty token");
        let token = Token {
            id: kind.id,
            helper: kind.helper,
            offset: self.buf.token_position(),
            len: self.buf.token_len(),
        };
        self.buf.finish_token();
        Some(token)
    }

    /// Absolute scan position.
    pub fn position(&self) -> usize {
        self.buf.position()
    }

    /// Characters of the unfinished token consumed so far.
    pub fn prescan(&self) -> usize {
        self.buf.token_len()
    }

    /// Text of a token still inside the current window.
    pub fn token_text(&self, token: &Token) -> String {
        self.buf
            .slice_abs(token.offset, token.len)
            .map(|chars| chars.iter().collect())
            .unwrap_or_default()
    }

    /// Characters received but not yet emitted as tokens.
    pub fn pending_text(&self) -> String {
        self.buf.pending().iter().collect()
    }

    pub fn is_last(&self) -> bool {
        self.buf.is_last()
    }

    /// A mark holding the current state, to be refreshed with `store_state`.
    pub fn create_state_mark(&self) -> StateMark {
        StateMark::new(self.syntax.store_state())
    }

    pub fn store_state(&self, mark: &mut StateMark) {
        mark.prescan = self.prescan();
        self.syntax.store_state_into(&mut mark.state);
    }

    pub fn snapshot(&self) -> StateMark {
        let mut mark = self.create_state_mark();
        mark.prescan = self.prescan();
        mark
    }

    /// Restores the syntax state only; the window is left as it is.
    pub fn load_state(&mut self, mark: &StateMark) -> Result<(), ScanError> {
        self.syntax.load_state(Some(&mark.state))
    }

    pub fn compare_state(&self, mark: &StateMark) -> MarkCompare {
        if mark.prescan != self.prescan() {
            return MarkCompare::Different;
        }
        self.syntax.compare_state(&mark.state)
    }

    pub fn token_name(&self, id: TokenId) -> Cow<'static, str> {
        if id.is_eol() {
            return Cow::Borrowed(EOL_NAME);
        }
        self.syntax
            .token_name(id)
            .unwrap_or(Cow::Borrowed("unknown"))
    }
}
