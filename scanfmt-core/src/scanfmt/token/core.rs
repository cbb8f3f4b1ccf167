//! Core token types

use serde::Serialize;
use std::fmt;

/// Numeric token kind.
///
/// `TokenId::EOL` is the only id shared by every syntax. Ids above it belong to the syntax
/// that produced the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TokenId(pub u32);

impl TokenId {
    /// Line terminator pseudo-token.
    pub const EOL: TokenId = TokenId(0);

    pub fn is_eol(self) -> bool {
        self == Self::EOL
    }

    /// Moves a syntax-local id into a composed id space. EOL is never shifted.
    pub fn shifted(self, shift: u32) -> TokenId {
        if self.is_eol() {
            self
        } else {
            TokenId(self.0 + shift)
        }
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a syntax state machine reports for one recognized span.
///
/// `helper` sub-classifies the token where one id covers a family, e.g. which keyword or
/// which operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenKind {
    pub id: TokenId,
    pub helper: Option<u16>,
}

impl TokenKind {
    pub fn new(id: TokenId) -> Self {
        Self { id, helper: None }
    }

    pub fn with_helper(id: TokenId, helper: u16) -> Self {
        Self {
            id,
            helper: Some(helper),
        }
    }

    pub fn eol() -> Self {
        Self::new(TokenId::EOL)
    }
}

impl From<TokenId> for TokenKind {
    fn from(id: TokenId) -> Self {
        Self::new(id)
    }
}

/// A recognized span of the scan window.
///
/// `offset` is absolute (it counts characters from the start of the scanned text, across
/// every relocation) and `len` is in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Token {
    pub id: TokenId,
    pub helper: Option<u16>,
    pub offset: usize,
    pub len: usize,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        TokenKind {
            id: self.id,
            helper: self.helper,
        }
    }

    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    pub fn is_eol(&self) -> bool {
        self.id.is_eol()
    }
}
