//! Common scanner module
//!
//! This module contains the `Syntax` trait every state machine implements, the state
//! snapshot types and the scanner error type.

use super::buffer::ScanBuffer;
use super::html::HtmlMark;
use super::java::JavaMark;
use super::multi::MultiMark;
use crate::scanfmt::token::{TokenId, TokenKind};
use std::borrow::Cow;
use thiserror::Error;

/// API misuse detected by a scanner. Malformed text is never an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("cannot load a {found} state mark into the {expected} syntax")]
    MarkMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("state mark says `{0}` is active but carries no valid state for it")]
    MissingSubMark(&'static str),
    #[error("child syntax `{0}` registered after token ids were handed out")]
    RegistrationClosed(&'static str),
    #[error("child syntax `{0}` registered with an empty region delimiter")]
    EmptyDelimiter(&'static str),
}

/// Outcome of comparing a live scanner against a recorded mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkCompare {
    Equal,
    Different,
}

impl MarkCompare {
    pub fn from_eq(equal: bool) -> Self {
        if equal {
            MarkCompare::Equal
        } else {
            MarkCompare::Different
        }
    }

    pub fn is_equal(self) -> bool {
        self == MarkCompare::Equal
    }
}

/// Syntax-private state, opaque outside the syntax that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxState {
    Java(JavaMark),
    Html(HtmlMark),
    Multi(Box<MultiMark>),
    /// For small syntaxes whose whole state fits in one number.
    Custom(u32),
}

impl SyntaxState {
    /// Short name of the syntax family this state belongs to.
    pub fn family(&self) -> &'static str {
        match self {
            SyntaxState::Java(_) => "java",
            SyntaxState::Html(_) => "html",
            SyntaxState::Multi(_) => "multi",
            SyntaxState::Custom(_) => "custom",
        }
    }
}

/// Snapshot of a scanner at its scan position.
///
/// `prescan` counts the characters before the scan position that belong to the unfinished
/// token. A scanner resuming from this mark must be given text starting that many
/// characters before the position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateMark {
    pub(crate) prescan: usize,
    pub(crate) state: SyntaxState,
}

impl StateMark {
    pub fn new(state: SyntaxState) -> Self {
        Self { prescan: 0, state }
    }

    pub fn prescan(&self) -> usize {
        self.prescan
    }

    pub fn state(&self) -> &SyntaxState {
        &self.state
    }
}

/// A character-level state machine.
///
/// `parse_token` reads from the buffer starting at its cursor, which sits at the start of
/// a token or, after a resume, inside one. It returns the kind of the token that ends at
/// the cursor when it returns, or `None` when the window ends before the token does and
/// the window is not the last one.
///
/// When the window is the last one, the syntax must emit whatever it has consumed and
/// return to its initial state.
pub trait Syntax {
    /// Short stable name; also used to key sub-marks in composed syntaxes.
    fn name(&self) -> &'static str;

    /// Highest id this syntax can produce.
    fn highest_token_id(&self) -> u32;

    fn token_name(&self, id: TokenId) -> Option<Cow<'static, str>>;

    fn parse_token(&mut self, buf: &mut ScanBuffer) -> Option<TokenKind>;

    fn store_state(&self) -> SyntaxState;

    /// Stores into an existing state, reusing whatever it already holds where possible.
    fn store_state_into(&self, target: &mut SyntaxState) {
        *target = self.store_state();
    }

    /// Loads a stored state, or resets to the initial state for `None`.
    fn load_state(&mut self, state: Option<&SyntaxState>) -> Result<(), ScanError>;

    fn compare_state(&self, state: &SyntaxState) -> MarkCompare {
        MarkCompare::from_eq(self.store_state() == *state)
    }
}

impl<S: Syntax + ?Sized> Syntax for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn highest_token_id(&self) -> u32 {
        (**self).highest_token_id()
    }

    fn token_name(&self, id: TokenId) -> Option<Cow<'static, str>> {
        (**self).token_name(id)
    }

    fn parse_token(&mut self, buf: &mut ScanBuffer) -> Option<TokenKind> {
        (**self).parse_token(buf)
    }

    fn store_state(&self) -> SyntaxState {
        (**self).store_state()
    }

    fn store_state_into(&self, target: &mut SyntaxState) {
        (**self).store_state_into(target)
    }

    fn load_state(&mut self, state: Option<&SyntaxState>) -> Result<(), ScanError> {
        (**self).load_state(state)
    }

    fn compare_state(&self, state: &SyntaxState) -> MarkCompare {
        (**self).compare_state(state)
    }
}

/// Name of the EOL pseudo-token, shared by every syntax.
pub const EOL_NAME: &str = "eol";

/// Error raised when `state` does not belong to `expected`.
pub(crate) fn mismatch(expected: &'static str, state: &SyntaxState) -> ScanError {
    ScanError::MarkMismatch {
        expected,
        found: state.family(),
    }
}
