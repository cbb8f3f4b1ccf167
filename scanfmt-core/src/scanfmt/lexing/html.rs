//! HTML scanner
//!
//! Relaxed by intent: a character that makes no sense inside a tag turns the rest of the
//! construct into plain text instead of producing an error token. Comments, declarations
//! and quoted values may span lines; like Java block comments they are emitted segment by
//! segment around each EOL.
//!
//! Character references can interrupt plain text or a quoted value. The state to return
//! to afterwards is part of the stored mark, so a reference split across two windows
//! resumes correctly.

use super::buffer::ScanBuffer;
use super::common::{mismatch, ScanError, Syntax, SyntaxState};
use crate::scanfmt::token::{TokenId, TokenKind};
use std::borrow::Cow;

/// Token ids produced by [`HtmlSyntax`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum HtmlTokenId {
    Text = 1,
    Ws,
    Error,
    /// `<name` or `</name`. Helper: [`START_TAG`] or [`END_TAG`].
    Tag,
    /// `>` or `/>`.
    TagClose,
    Argument,
    /// The `=` between an argument and its value.
    Operator,
    /// Argument value, quotes included.
    Value,
    /// `<!-- ... -->`
    BlockComment,
    /// `-- ... --` inside a declaration.
    SgmlComment,
    /// `<!DOCTYPE ...>` and friends.
    Declaration,
    CharRef,
}

/// Helper of a [`HtmlTokenId::Tag`] opening an element.
pub const START_TAG: u16 = 0;
/// Helper of a [`HtmlTokenId::Tag`] closing an element.
pub const END_TAG: u16 = 1;

impl HtmlTokenId {
    pub const HIGHEST: u32 = HtmlTokenId::CharRef as u32;

    pub fn id(self) -> TokenId {
        TokenId(self as u32)
    }

    pub fn from_id(id: TokenId) -> Option<HtmlTokenId> {
        use HtmlTokenId::*;
        let kind = match id.0 {
            1 => Text,
            2 => Ws,
            3 => Error,
            4 => Tag,
            5 => TagClose,
            6 => Argument,
            7 => Operator,
            8 => Value,
            9 => BlockComment,
            10 => SgmlComment,
            11 => Declaration,
            12 => CharRef,
            _ => return None,
        };
        Some(kind)
    }

    pub fn name(self) -> &'static str {
        match self {
            HtmlTokenId::Text => "Text",
            HtmlTokenId::Ws => "Ws",
            HtmlTokenId::Error => "Error",
            HtmlTokenId::Tag => "Tag",
            HtmlTokenId::TagClose => "TagClose",
            HtmlTokenId::Argument => "Argument",
            HtmlTokenId::Operator => "Operator",
            HtmlTokenId::Value => "Value",
            HtmlTokenId::BlockComment => "BlockComment",
            HtmlTokenId::SgmlComment => "SgmlComment",
            HtmlTokenId::Declaration => "Declaration",
            HtmlTokenId::CharRef => "CharRef",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum State {
    Init,
    IsiText,
    IsaLt,
    IsaSlash,
    IsiTag,
    IsiEndTag,
    /// Inside a start tag, between its parts.
    IsaTagX,
    IsiTagWs,
    IsaTagSlash,
    IsiArg,
    IsaArgX,
    IsiArgWs,
    IsaEqX,
    IsiEqWs,
    IsiVal,
    IsiValQuot,
    IsiValDquot,
    IsaEndTagX,
    IsiEndTagWs,
    /// `<!`
    IsaSgmlEscape,
    /// `<!-`
    IsaSgmlDash,
    IsiHtmlComment,
    IsaHtmlCommentDash,
    IsaHtmlCommentDashDash,
    IsiSgmlDecl,
    IsaSgmlDeclDash,
    IsiSgmlComment,
    IsaSgmlCommentDash,
    /// `&`
    IsaRef,
    IsiRefName,
    /// `&#`
    IsaRefHash,
    IsiRefDec,
    /// `&#x`
    IsaRefX,
    IsiRefHex,
}

impl State {
    fn in_reference(self) -> bool {
        matches!(
            self,
            State::IsaRef
                | State::IsiRefName
                | State::IsaRefHash
                | State::IsiRefDec
                | State::IsaRefX
                | State::IsiRefHex
        )
    }
}

/// Stored state of a [`HtmlSyntax`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HtmlMark {
    state: State,
    ref_return: State,
}

/// HTML state machine.
#[derive(Debug, Clone)]
pub struct HtmlSyntax {
    state: State,
    /// Where to continue once a character reference is done.
    ref_return: State,
}

impl Default for HtmlSyntax {
    fn default() -> Self {
        Self::new()
    }
}

fn is_ws(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\x0c')
}

fn is_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '-' | '_' | ':' | '.')
}

fn kind(id: HtmlTokenId) -> TokenKind {
    TokenKind::new(id.id())
}

impl HtmlSyntax {
    pub fn new() -> Self {
        Self {
            state: State::Init,
            ref_return: State::Init,
        }
    }

    fn to(&mut self, state: State, kind: TokenKind) -> Option<TokenKind> {
        self.state = state;
        Some(kind)
    }

    fn to_with(&mut self, buf: &mut ScanBuffer, state: State, kind: TokenKind) -> Option<TokenKind> {
        buf.advance();
        self.to(state, kind)
    }

    /// Line break inside a multi-line construct: EOL on its own, otherwise the segment so far.
    fn segment(&mut self, buf: &mut ScanBuffer, id: HtmlTokenId) -> Option<TokenKind> {
        if buf.token_len() == 0 {
            buf.advance();
            return Some(TokenKind::eol());
        }
        Some(kind(id))
    }

    /// State that absorbs a malformed reference into the surrounding token.
    fn fold_state(&self) -> State {
        match self.ref_return {
            State::Init => State::IsiText,
            other => other,
        }
    }

    fn ref_fallback_kind(&self) -> TokenKind {
        match self.ref_return {
            State::Init => kind(HtmlTokenId::Text),
            _ => kind(HtmlTokenId::Value),
        }
    }

    fn finish(&mut self) -> Option<TokenKind> {
        use State::*;
        let found = match self.state {
            Init => return None,
            IsiText | IsaLt | IsaSlash | IsaSgmlEscape | IsaSgmlDash => kind(HtmlTokenId::Text),
            IsiTag => TokenKind::with_helper(HtmlTokenId::Tag.id(), START_TAG),
            IsiEndTag => TokenKind::with_helper(HtmlTokenId::Tag.id(), END_TAG),
            IsiTagWs | IsiArgWs | IsiEqWs | IsiEndTagWs => kind(HtmlTokenId::Ws),
            IsaTagX | IsaArgX | IsaEqX | IsaEndTagX | IsaTagSlash => kind(HtmlTokenId::Error),
            IsiArg => kind(HtmlTokenId::Argument),
            IsiVal | IsiValQuot | IsiValDquot => kind(HtmlTokenId::Value),
            IsiHtmlComment | IsaHtmlCommentDash | IsaHtmlCommentDashDash => {
                kind(HtmlTokenId::BlockComment)
            }
            IsiSgmlDecl | IsaSgmlDeclDash => kind(HtmlTokenId::Declaration),
            IsiSgmlComment | IsaSgmlCommentDash => kind(HtmlTokenId::SgmlComment),
            IsaRef | IsaRefHash | IsaRefX => self.ref_fallback_kind(),
            IsiRefName | IsiRefDec | IsiRefHex => kind(HtmlTokenId::CharRef),
        };
        self.state = Init;
        self.ref_return = Init;
        Some(found)
    }
}

impl Syntax for HtmlSyntax {
    fn name(&self) -> &'static str {
        "html"
    }

    fn highest_token_id(&self) -> u32 {
        HtmlTokenId::HIGHEST
    }

    fn token_name(&self, id: TokenId) -> Option<Cow<'static, str>> {
        HtmlTokenId::from_id(id).map(|t| Cow::Borrowed(t.name()))
    }

    fn parse_token(&mut self, buf: &mut ScanBuffer) -> Option<TokenKind> {
        use State::*;

        while let Some(ch) = buf.current() {
            match self.state {
                Init => match ch {
                    '\n' => return self.to_with(buf, Init, TokenKind::eol()),
                    '<' => self.state = IsaLt,
                    '&' => {
                        self.ref_return = Init;
                        self.state = IsaRef;
                    }
                    _ => self.state = IsiText,
                },

                IsiText => {
                    if matches!(ch, '<' | '&' | '\n') {
                        return self.to(Init, kind(HtmlTokenId::Text));
                    }
                }

                IsaLt => match ch {
                    c if c.is_alphabetic() => self.state = IsiTag,
                    '/' => self.state = IsaSlash,
                    '!' => self.state = IsaSgmlEscape,
                    _ => {
                        self.state = IsiText;
                        continue;
                    }
                },

                IsaSlash => {
                    if ch.is_alphabetic() {
                        self.state = IsiEndTag;
                    } else {
                        self.state = IsiText;
                        continue;
                    }
                }

                IsiTag => {
                    if !is_name_char(ch) {
                        return self.to(IsaTagX, TokenKind::with_helper(HtmlTokenId::Tag.id(), START_TAG));
                    }
                }

                IsiEndTag => {
                    if !is_name_char(ch) {
                        return self.to(IsaEndTagX, TokenKind::with_helper(HtmlTokenId::Tag.id(), END_TAG));
                    }
                }

                IsaTagX => match ch {
                    c if is_ws(c) => self.state = IsiTagWs,
                    '\n' => return self.to_with(buf, IsaTagX, TokenKind::eol()),
                    '>' => return self.to_with(buf, Init, kind(HtmlTokenId::TagClose)),
                    '/' => self.state = IsaTagSlash,
                    c if c.is_alphabetic() || c == '_' => self.state = IsiArg,
                    _ => {
                        self.state = Init;
                        continue;
                    }
                },

                IsiTagWs => {
                    if !is_ws(ch) {
                        return self.to(IsaTagX, kind(HtmlTokenId::Ws));
                    }
                }

                IsaTagSlash => match ch {
                    '>' => return self.to_with(buf, Init, kind(HtmlTokenId::TagClose)),
                    _ => return self.to(IsaTagX, kind(HtmlTokenId::Error)),
                },

                IsiArg => {
                    if !is_name_char(ch) {
                        return self.to(IsaArgX, kind(HtmlTokenId::Argument));
                    }
                }

                IsaArgX => match ch {
                    c if is_ws(c) => self.state = IsiArgWs,
                    '\n' => return self.to_with(buf, IsaArgX, TokenKind::eol()),
                    '=' => return self.to_with(buf, IsaEqX, kind(HtmlTokenId::Operator)),
                    _ => {
                        self.state = IsaTagX;
                        continue;
                    }
                },

                IsiArgWs => {
                    if !is_ws(ch) {
                        return self.to(IsaArgX, kind(HtmlTokenId::Ws));
                    }
                }

                IsaEqX => match ch {
                    c if is_ws(c) => self.state = IsiEqWs,
                    '\n' => return self.to_with(buf, IsaEqX, TokenKind::eol()),
                    '"' => self.state = IsiValDquot,
                    '\'' => self.state = IsiValQuot,
                    '>' => {
                        self.state = IsaTagX;
                        continue;
                    }
                    _ => self.state = IsiVal,
                },

                IsiEqWs => {
                    if !is_ws(ch) {
                        return self.to(IsaEqX, kind(HtmlTokenId::Ws));
                    }
                }

                IsiVal => {
                    if is_ws(ch) || ch == '>' || ch == '\n' {
                        return self.to(IsaTagX, kind(HtmlTokenId::Value));
                    }
                }

                IsiValQuot | IsiValDquot => {
                    let quote = if self.state == IsiValQuot { '\'' } else { '"' };
                    match ch {
                        c if c == quote => {
                            return self.to_with(buf, IsaTagX, kind(HtmlTokenId::Value));
                        }
                        '\n' => return self.segment(buf, HtmlTokenId::Value),
                        '&' => {
                            if buf.token_len() > 0 {
                                return Some(kind(HtmlTokenId::Value));
                            }
                            self.ref_return = self.state;
                            self.state = IsaRef;
                        }
                        _ => {}
                    }
                }

                IsaEndTagX => match ch {
                    c if is_ws(c) => self.state = IsiEndTagWs,
                    '\n' => return self.to_with(buf, IsaEndTagX, TokenKind::eol()),
                    '>' => return self.to_with(buf, Init, kind(HtmlTokenId::TagClose)),
                    _ => {
                        self.state = Init;
                        continue;
                    }
                },

                IsiEndTagWs => {
                    if !is_ws(ch) {
                        return self.to(IsaEndTagX, kind(HtmlTokenId::Ws));
                    }
                }

                IsaSgmlEscape => match ch {
                    '-' => self.state = IsaSgmlDash,
                    c if c.is_alphabetic() => self.state = IsiSgmlDecl,
                    _ => {
                        self.state = IsiText;
                        continue;
                    }
                },

                IsaSgmlDash => {
                    if ch == '-' {
                        self.state = IsiHtmlComment;
                    } else {
                        self.state = IsiText;
                        continue;
                    }
                }

                IsiHtmlComment => match ch {
                    '-' => self.state = IsaHtmlCommentDash,
                    '\n' => return self.segment(buf, HtmlTokenId::BlockComment),
                    _ => {}
                },

                IsaHtmlCommentDash => match ch {
                    '-' => self.state = IsaHtmlCommentDashDash,
                    _ => {
                        self.state = IsiHtmlComment;
                        continue;
                    }
                },

                IsaHtmlCommentDashDash => match ch {
                    '>' => return self.to_with(buf, Init, kind(HtmlTokenId::BlockComment)),
                    '-' => {}
                    _ => {
                        self.state = IsiHtmlComment;
                        continue;
                    }
                },

                IsiSgmlDecl => match ch {
                    '>' => return self.to_with(buf, Init, kind(HtmlTokenId::Declaration)),
                    '-' => self.state = IsaSgmlDeclDash,
                    '\n' => return self.segment(buf, HtmlTokenId::Declaration),
                    _ => {}
                },

                IsaSgmlDeclDash => match ch {
                    '-' => {
                        let len = buf.token_len();
                        // A declaration cut at a region leaves the first dash in the emitted token.
                        if len <= 1 {
                            self.state = IsiSgmlComment;
                        } else {
                            // Emit the declaration text up to the first dash.
                            buf.rewind_token_to(len - 1);
                            return self.to(IsiSgmlDecl, kind(HtmlTokenId::Declaration));
                        }
                    }
                    _ => {
                        self.state = IsiSgmlDecl;
                        continue;
                    }
                },

                IsiSgmlComment => match ch {
                    '-' => self.state = IsaSgmlCommentDash,
                    '\n' => return self.segment(buf, HtmlTokenId::SgmlComment),
                    _ => {}
                },

                IsaSgmlCommentDash => match ch {
                    '-' => return self.to_with(buf, IsiSgmlDecl, kind(HtmlTokenId::SgmlComment)),
                    _ => {
                        self.state = IsiSgmlComment;
                        continue;
                    }
                },

                IsaRef => match ch {
                    c if c.is_alphabetic() => self.state = IsiRefName,
                    '#' => self.state = IsaRefHash,
                    _ => {
                        self.state = self.fold_state();
                        continue;
                    }
                },

                IsiRefName => match ch {
                    c if c.is_alphanumeric() => {}
                    ';' => return self.to_with(buf, self.ref_return, kind(HtmlTokenId::CharRef)),
                    _ => return self.to(self.ref_return, kind(HtmlTokenId::CharRef)),
                },

                IsaRefHash => match ch {
                    '0'..='9' => self.state = IsiRefDec,
                    'x' | 'X' => self.state = IsaRefX,
                    _ => {
                        self.state = self.fold_state();
                        continue;
                    }
                },

                IsiRefDec => match ch {
                    '0'..='9' => {}
                    ';' => return self.to_with(buf, self.ref_return, kind(HtmlTokenId::CharRef)),
                    _ => return self.to(self.ref_return, kind(HtmlTokenId::CharRef)),
                },

                IsaRefX => {
                    if ch.is_ascii_hexdigit() {
                        self.state = IsiRefHex;
                    } else {
                        self.state = self.fold_state();
                        continue;
                    }
                }

                IsiRefHex => match ch {
                    c if c.is_ascii_hexdigit() => {}
                    ';' => return self.to_with(buf, self.ref_return, kind(HtmlTokenId::CharRef)),
                    _ => return self.to(self.ref_return, kind(HtmlTokenId::CharRef)),
                },
            }
            buf.advance();
        }

        if buf.is_last() && buf.token_len() > 0 {
            return self.finish();
        }
        None
    }

    fn store_state(&self) -> SyntaxState {
        let ref_return = if self.state.in_reference() {
            self.ref_return
        } else {
            State::Init
        };
        SyntaxState::Html(HtmlMark {
            state: self.state,
            ref_return,
        })
    }

    fn load_state(&mut self, state: Option<&SyntaxState>) -> Result<(), ScanError> {
        match state {
            None => *self = Self::new(),
            Some(SyntaxState::Html(mark)) => {
                self.state = mark.state;
                self.ref_return = mark.ref_return;
            }
            Some(other) => return Err(mismatch(self.name(), other)),
        }
        Ok(())
    }
}
