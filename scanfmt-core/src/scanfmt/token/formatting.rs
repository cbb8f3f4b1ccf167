//! Rendering of token streams
//!
//! This module converts scanned tokens back into text. It is used for:
//!
//! - Round-trip testing (source -> tokens -> source)
//! - Human-readable dumps of token streams (CLI, snapshot tests)
//!
//! Tokens carry no text of their own, so both helpers work on `(Token, String)` pairs as
//! collected from a scanner with [`token_text`](crate::scanfmt::lexing::Scanner::token_text).

use super::core::Token;

/// Concatenates the text of every token, EOLs included.
///
/// For a complete token stream this reproduces the scanned input exactly.
pub fn detokenize(tokens: &[(Token, String)]) -> String {
    tokens.iter().map(|(_, text)| text.as_str()).collect()
}

/// Renders one token as `Name(text)`, with line terminators and tabs made visible.
pub fn describe(name: &str, text: &str) -> String {
    let mut out = String::with_capacity(name.len() + text.len() + 2);
    out.push_str(name);
    out.push('(');
    for ch in text.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push(')');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanfmt::token::TokenId;

    fn tok(offset: usize, len: usize) -> Token {
        Token {
            id: TokenId(1),
            helper: None,
            offset,
            len,
        }
    }

    #[test]
    fn test_detokenize_concatenates() {
        let tokens = vec![
            (tok(0, 2), "if".to_string()),
            (tok(2, 1), " ".to_string()),
            (tok(3, 1), "\n".to_string()),
        ];
        assert_eq!(detokenize(&tokens), "if \n");
    }

    #[test]
    fn test_describe_escapes_control_chars() {
        assert_eq!(describe("eol", "\n"), "eol(\\n)");
        assert_eq!(describe("ws", "\t "), "ws(\\t )");
    }
}
