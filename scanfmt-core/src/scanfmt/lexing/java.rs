//! Java scanner
//!
//! A hand-written character-level state machine. Every state is named after what the
//! scanner is inside of (`Isi*`) or what it has just seen (`Isa*`). Operators are resolved
//! by maximal munch: the scanner stays in an intermediate state for as long as a longer
//! operator is still possible and falls back to the shorter one on the first character
//! that cannot extend it.
//!
//! Line terminators are always their own EOL token, including inside block comments,
//! which are emitted segment by segment around each line break.

use super::buffer::ScanBuffer;
use super::common::{mismatch, ScanError, Syntax, SyntaxState};
use super::keywords::{match_keyword, Operator};
use crate::scanfmt::token::{TokenId, TokenKind};
use std::borrow::Cow;

/// Token ids produced by [`JavaSyntax`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum JavaTokenId {
    Whitespace = 1,
    LineComment,
    BlockComment,
    Identifier,
    /// An identifier directly followed by `(`, possibly across spaces or tabs.
    MethodCall,
    /// Helper: [`Keyword`](super::keywords::Keyword) code.
    Keyword,
    /// Helper: [`Operator`] code.
    Operator,
    CharLiteral,
    StringLiteral,
    IntLiteral,
    LongLiteral,
    HexLiteral,
    OctalLiteral,
    FloatLiteral,
    DoubleLiteral,
    /// Helper: [`JavaError`] code.
    Error,
}

impl JavaTokenId {
    pub const HIGHEST: u32 = JavaTokenId::Error as u32;

    pub fn id(self) -> TokenId {
        TokenId(self as u32)
    }

    pub fn from_id(id: TokenId) -> Option<JavaTokenId> {
        use JavaTokenId::*;
        let kind = match id.0 {
            1 => Whitespace,
            2 => LineComment,
            3 => BlockComment,
            4 => Identifier,
            5 => MethodCall,
            6 => Keyword,
            7 => Operator,
            8 => CharLiteral,
            9 => StringLiteral,
            10 => IntLiteral,
            11 => LongLiteral,
            12 => HexLiteral,
            13 => OctalLiteral,
            14 => FloatLiteral,
            15 => DoubleLiteral,
            16 => Error,
            _ => return None,
        };
        Some(kind)
    }

    pub fn name(self) -> &'static str {
        match self {
            JavaTokenId::Whitespace => "Whitespace",
            JavaTokenId::LineComment => "LineComment",
            JavaTokenId::BlockComment => "BlockComment",
            JavaTokenId::Identifier => "Identifier",
            JavaTokenId::MethodCall => "MethodCall",
            JavaTokenId::Keyword => "Keyword",
            JavaTokenId::Operator => "Operator",
            JavaTokenId::CharLiteral => "CharLiteral",
            JavaTokenId::StringLiteral => "StringLiteral",
            JavaTokenId::IntLiteral => "IntLiteral",
            JavaTokenId::LongLiteral => "LongLiteral",
            JavaTokenId::HexLiteral => "HexLiteral",
            JavaTokenId::OctalLiteral => "OctalLiteral",
            JavaTokenId::FloatLiteral => "FloatLiteral",
            JavaTokenId::DoubleLiteral => "DoubleLiteral",
            JavaTokenId::Error => "Error",
        }
    }
}

/// What an error token is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum JavaError {
    InvalidChar,
    UnterminatedString,
    UnterminatedChar,
    InvalidOctal,
    InvalidOperator,
    /// `*/` outside of a comment.
    InvalidCommentEnd,
}

impl JavaError {
    pub fn code(self) -> u16 {
        self as u16
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum State {
    Init,
    IsiWhitespace,
    IsiLineComment,
    IsiBlockComment,
    IsaStarIBlockComment,
    IsiString,
    IsiStringBslash,
    IsiChar,
    IsiCharBslash,
    IsiIdentifier,
    /// Identifier followed by blanks; waiting to see whether `(` comes next.
    IsaIdentifierWs,
    IsaSlash,
    IsaEq,
    IsaGt,
    IsaGtGt,
    IsaGtGtGt,
    IsaLt,
    IsaLtLt,
    /// Extra `<` after a `<<`.
    InvalidShift,
    IsaPlus,
    IsaMinus,
    IsaStar,
    IsaPipe,
    IsaPercent,
    IsaAnd,
    IsaXor,
    IsaExclamation,
    IsaZero,
    IsiInt,
    IsiOctal,
    InvalidOctal,
    IsiDouble,
    IsaExp,
    IsiDoubleExp,
    IsiHex,
    IsaDot,
}

/// Stored state of a [`JavaSyntax`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JavaMark {
    state: State,
    ident_len: usize,
}

/// Java state machine.
#[derive(Debug, Clone)]
pub struct JavaSyntax {
    state: State,
    /// Length of the identifier in `IsaIdentifierWs`, the rest of the token is blanks.
    ident_len: usize,
}

impl Default for JavaSyntax {
    fn default() -> Self {
        Self::new()
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '$'
}

fn is_ident_part(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

fn is_blank(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\x0c')
}

fn kind(id: JavaTokenId) -> TokenKind {
    TokenKind::new(id.id())
}

fn op(op: Operator) -> TokenKind {
    TokenKind::with_helper(JavaTokenId::Operator.id(), op.code())
}

fn error(err: JavaError) -> TokenKind {
    TokenKind::with_helper(JavaTokenId::Error.id(), err.code())
}

impl JavaSyntax {
    pub fn new() -> Self {
        Self {
            state: State::Init,
            ident_len: 0,
        }
    }

    fn emit(&mut self, kind: TokenKind) -> Option<TokenKind> {
        self.state = State::Init;
        Some(kind)
    }

    /// Consumes the current character and emits.
    fn emit_with(&mut self, buf: &mut ScanBuffer, kind: TokenKind) -> Option<TokenKind> {
        buf.advance();
        self.emit(kind)
    }

    fn identifier(&mut self, buf: &ScanBuffer) -> TokenKind {
        match match_keyword(buf.token_chars()) {
            Some(kw) => TokenKind::with_helper(JavaTokenId::Keyword.id(), kw.code()),
            None => kind(JavaTokenId::Identifier),
        }
    }

    /// Token for whatever is pending when the last window runs out.
    fn finish(&mut self, buf: &mut ScanBuffer) -> Option<TokenKind> {
        use State::*;
        let kind = match self.state {
            Init => return None,
            IsiWhitespace => kind(JavaTokenId::Whitespace),
            IsiLineComment => kind(JavaTokenId::LineComment),
            IsiBlockComment | IsaStarIBlockComment => kind(JavaTokenId::BlockComment),
            IsiString | IsiStringBslash => error(JavaError::UnterminatedString),
            IsiChar | IsiCharBslash => error(JavaError::UnterminatedChar),
            IsiIdentifier => self.identifier(buf),
            IsaIdentifierWs => {
                buf.rewind_token_to(self.ident_len);
                kind(JavaTokenId::Identifier)
            }
            IsaSlash => op(Operator::Slash),
            IsaEq => op(Operator::Eq),
            IsaGt => op(Operator::Gt),
            IsaGtGt => op(Operator::RShift),
            IsaGtGtGt => op(Operator::RUShift),
            IsaLt => op(Operator::Lt),
            IsaLtLt => op(Operator::LShift),
            InvalidShift => error(JavaError::InvalidOperator),
            IsaPlus => op(Operator::Plus),
            IsaMinus => op(Operator::Minus),
            IsaStar => op(Operator::Star),
            IsaPipe => op(Operator::Or),
            IsaPercent => op(Operator::Percent),
            IsaAnd => op(Operator::And),
            IsaXor => op(Operator::Xor),
            IsaExclamation => op(Operator::Not),
            IsaZero | IsiInt => kind(JavaTokenId::IntLiteral),
            IsiOctal => kind(JavaTokenId::OctalLiteral),
            InvalidOctal => error(JavaError::InvalidOctal),
            IsiDouble | IsaExp | IsiDoubleExp => kind(JavaTokenId::DoubleLiteral),
            IsiHex => kind(JavaTokenId::HexLiteral),
            IsaDot => op(Operator::Dot),
        };
        self.emit(kind)
    }
}

impl Syntax for JavaSyntax {
    fn name(&self) -> &'static str {
        "java"
    }

    fn highest_token_id(&self) -> u32 {
        JavaTokenId::HIGHEST
    }

    fn token_name(&self, id: TokenId) -> Option<Cow<'static, str>> {
        JavaTokenId::from_id(id).map(|t| Cow::Borrowed(t.name()))
    }

    fn parse_token(&mut self, buf: &mut ScanBuffer) -> Option<TokenKind> {
        use State::*;

        while let Some(ch) = buf.current() {
            match self.state {
                Init => match ch {
                    '\n' => return self.emit_with(buf, TokenKind::eol()),
                    c if is_blank(c) => self.state = IsiWhitespace,
                    '"' => self.state = IsiString,
                    '\'' => self.state = IsiChar,
                    '/' => self.state = IsaSlash,
                    '=' => self.state = IsaEq,
                    '>' => self.state = IsaGt,
                    '<' => self.state = IsaLt,
                    '+' => self.state = IsaPlus,
                    '-' => self.state = IsaMinus,
                    '*' => self.state = IsaStar,
                    '|' => self.state = IsaPipe,
                    '%' => self.state = IsaPercent,
                    '&' => self.state = IsaAnd,
                    '^' => self.state = IsaXor,
                    '!' => self.state = IsaExclamation,
                    '0' => self.state = IsaZero,
                    '1'..='9' => self.state = IsiInt,
                    '.' => self.state = IsaDot,
                    c if is_ident_start(c) => self.state = IsiIdentifier,
                    c => match Operator::from_char(c) {
                        Some(single) => return self.emit_with(buf, op(single)),
                        None => return self.emit_with(buf, error(JavaError::InvalidChar)),
                    },
                },

                IsiWhitespace => {
                    if !is_blank(ch) {
                        return self.emit(kind(JavaTokenId::Whitespace));
                    }
                }

                IsiLineComment => {
                    if ch == '\n' {
                        return self.emit(kind(JavaTokenId::LineComment));
                    }
                }

                IsiBlockComment => match ch {
                    '\n' => {
                        if buf.token_len() == 0 {
                            buf.advance();
                            return Some(TokenKind::eol());
                        }
                        return Some(kind(JavaTokenId::BlockComment));
                    }
                    '*' => self.state = IsaStarIBlockComment,
                    _ => {}
                },

                IsaStarIBlockComment => match ch {
                    '/' => return self.emit_with(buf, kind(JavaTokenId::BlockComment)),
                    '*' => {}
                    _ => {
                        self.state = IsiBlockComment;
                        continue;
                    }
                },

                IsiString => match ch {
                    '\\' => self.state = IsiStringBslash,
                    '"' => return self.emit_with(buf, kind(JavaTokenId::StringLiteral)),
                    '\n' => return self.emit(error(JavaError::UnterminatedString)),
                    _ => {}
                },

                IsiStringBslash => {
                    self.state = IsiString;
                    if ch != '"' && ch != '\\' {
                        continue;
                    }
                }

                IsiChar => match ch {
                    '\\' => self.state = IsiCharBslash,
                    '\'' => return self.emit_with(buf, kind(JavaTokenId::CharLiteral)),
                    '\n' => return self.emit(error(JavaError::UnterminatedChar)),
                    _ => {}
                },

                IsiCharBslash => {
                    self.state = IsiChar;
                    if ch != '\'' && ch != '\\' {
                        continue;
                    }
                }

                IsiIdentifier => {
                    if !is_ident_part(ch) {
                        let found = self.identifier(buf);
                        if found.id != JavaTokenId::Identifier.id() {
                            return self.emit(found);
                        }
                        match ch {
                            '(' => return self.emit(kind(JavaTokenId::MethodCall)),
                            ' ' | '\t' => {
                                self.ident_len = buf.token_len();
                                self.state = IsaIdentifierWs;
                            }
                            _ => return self.emit(found),
                        }
                    }
                }

                IsaIdentifierWs => match ch {
                    ' ' | '\t' => {}
                    '(' => {
                        buf.rewind_token_to(self.ident_len);
                        return self.emit(kind(JavaTokenId::MethodCall));
                    }
                    _ => {
                        buf.rewind_token_to(self.ident_len);
                        return self.emit(kind(JavaTokenId::Identifier));
                    }
                },

                IsaSlash => match ch {
                    '/' => self.state = IsiLineComment,
                    '*' => self.state = IsiBlockComment,
                    '=' => return self.emit_with(buf, op(Operator::SlashEq)),
                    _ => return self.emit(op(Operator::Slash)),
                },

                IsaEq => match ch {
                    '=' => return self.emit_with(buf, op(Operator::EqEq)),
                    _ => return self.emit(op(Operator::Eq)),
                },

                IsaGt => match ch {
                    '>' => self.state = IsaGtGt,
                    '=' => return self.emit_with(buf, op(Operator::GtEq)),
                    _ => return self.emit(op(Operator::Gt)),
                },

                IsaGtGt => match ch {
                    '>' => self.state = IsaGtGtGt,
                    '=' => return self.emit_with(buf, op(Operator::RShiftEq)),
                    _ => return self.emit(op(Operator::RShift)),
                },

                IsaGtGtGt => match ch {
                    '=' => return self.emit_with(buf, op(Operator::RUShiftEq)),
                    _ => return self.emit(op(Operator::RUShift)),
                },

                IsaLt => match ch {
                    '<' => self.state = IsaLtLt,
                    '=' => return self.emit_with(buf, op(Operator::LtEq)),
                    _ => return self.emit(op(Operator::Lt)),
                },

                IsaLtLt => match ch {
                    '<' => {
                        self.state = InvalidShift;
                        return Some(op(Operator::LShift));
                    }
                    '=' => return self.emit_with(buf, op(Operator::LShiftEq)),
                    _ => return self.emit(op(Operator::LShift)),
                },

                InvalidShift => {
                    if ch != '<' {
                        if buf.token_len() == 0 {
                            self.state = Init;
                            continue;
                        }
                        return self.emit(error(JavaError::InvalidOperator));
                    }
                }

                IsaPlus => match ch {
                    '+' => return self.emit_with(buf, op(Operator::PlusPlus)),
                    '=' => return self.emit_with(buf, op(Operator::PlusEq)),
                    _ => return self.emit(op(Operator::Plus)),
                },

                IsaMinus => match ch {
                    '-' => return self.emit_with(buf, op(Operator::MinusMinus)),
                    '=' => return self.emit_with(buf, op(Operator::MinusEq)),
                    _ => return self.emit(op(Operator::Minus)),
                },

                IsaStar => match ch {
                    '=' => return self.emit_with(buf, op(Operator::StarEq)),
                    '/' => return self.emit_with(buf, error(JavaError::InvalidCommentEnd)),
                    _ => return self.emit(op(Operator::Star)),
                },

                IsaPipe => match ch {
                    '|' => return self.emit_with(buf, op(Operator::OrOr)),
                    '=' => return self.emit_with(buf, op(Operator::OrEq)),
                    _ => return self.emit(op(Operator::Or)),
                },

                IsaPercent => match ch {
                    '=' => return self.emit_with(buf, op(Operator::PercentEq)),
                    _ => return self.emit(op(Operator::Percent)),
                },

                IsaAnd => match ch {
                    '&' => return self.emit_with(buf, op(Operator::AndAnd)),
                    '=' => return self.emit_with(buf, op(Operator::AndEq)),
                    _ => return self.emit(op(Operator::And)),
                },

                IsaXor => match ch {
                    '=' => return self.emit_with(buf, op(Operator::XorEq)),
                    _ => return self.emit(op(Operator::Xor)),
                },

                IsaExclamation => match ch {
                    '=' => return self.emit_with(buf, op(Operator::NotEq)),
                    _ => return self.emit(op(Operator::Not)),
                },

                IsaZero => match ch {
                    'x' | 'X' => self.state = IsiHex,
                    '0'..='7' => self.state = IsiOctal,
                    '8' | '9' => self.state = InvalidOctal,
                    'l' | 'L' => return self.emit_with(buf, kind(JavaTokenId::LongLiteral)),
                    '.' => self.state = IsiDouble,
                    'e' | 'E' => self.state = IsaExp,
                    'f' | 'F' => return self.emit_with(buf, kind(JavaTokenId::FloatLiteral)),
                    'd' | 'D' => return self.emit_with(buf, kind(JavaTokenId::DoubleLiteral)),
                    _ => return self.emit(kind(JavaTokenId::IntLiteral)),
                },

                IsiInt => match ch {
                    '0'..='9' => {}
                    'l' | 'L' => return self.emit_with(buf, kind(JavaTokenId::LongLiteral)),
                    '.' => self.state = IsiDouble,
                    'e' | 'E' => self.state = IsaExp,
                    'f' | 'F' => return self.emit_with(buf, kind(JavaTokenId::FloatLiteral)),
                    'd' | 'D' => return self.emit_with(buf, kind(JavaTokenId::DoubleLiteral)),
                    _ => return self.emit(kind(JavaTokenId::IntLiteral)),
                },

                IsiOctal => match ch {
                    '0'..='7' => {}
                    '8' | '9' => self.state = InvalidOctal,
                    'l' | 'L' => return self.emit_with(buf, kind(JavaTokenId::LongLiteral)),
                    _ => return self.emit(kind(JavaTokenId::OctalLiteral)),
                },

                InvalidOctal => {
                    if !ch.is_ascii_digit() {
                        return self.emit(error(JavaError::InvalidOctal));
                    }
                }

                IsiDouble => match ch {
                    '0'..='9' => {}
                    'e' | 'E' => self.state = IsaExp,
                    'f' | 'F' => return self.emit_with(buf, kind(JavaTokenId::FloatLiteral)),
                    'd' | 'D' => return self.emit_with(buf, kind(JavaTokenId::DoubleLiteral)),
                    _ => return self.emit(kind(JavaTokenId::DoubleLiteral)),
                },

                IsaExp => match ch {
                    '+' | '-' | '0'..='9' => self.state = IsiDoubleExp,
                    _ => return self.emit(kind(JavaTokenId::DoubleLiteral)),
                },

                IsiDoubleExp => match ch {
                    '0'..='9' => {}
                    'f' | 'F' => return self.emit_with(buf, kind(JavaTokenId::FloatLiteral)),
                    'd' | 'D' => return self.emit_with(buf, kind(JavaTokenId::DoubleLiteral)),
                    _ => return self.emit(kind(JavaTokenId::DoubleLiteral)),
                },

                IsiHex => match ch {
                    c if c.is_ascii_hexdigit() => {}
                    'l' | 'L' => return self.emit_with(buf, kind(JavaTokenId::LongLiteral)),
                    _ => return self.emit(kind(JavaTokenId::HexLiteral)),
                },

                IsaDot => match ch {
                    '0'..='9' => self.state = IsiDouble,
                    _ => return self.emit(op(Operator::Dot)),
                },
            }
            buf.advance();
        }

        if buf.is_last() && buf.token_len() > 0 {
            return self.finish(buf);
        }
        None
    }

    fn store_state(&self) -> SyntaxState {
        let ident_len = if self.state == State::IsaIdentifierWs {
            self.ident_len
        } else {
            0
        };
        SyntaxState::Java(JavaMark {
            state: self.state,
            ident_len,
        })
    }

    fn load_state(&mut self, state: Option<&SyntaxState>) -> Result<(), ScanError> {
        match state {
            None => *self = Self::new(),
            Some(SyntaxState::Java(mark)) => {
                self.state = mark.state;
                self.ident_len = mark.ident_len;
            }
            Some(other) => return Err(mismatch(self.name(), other)),
        }
        Ok(())
    }
}
