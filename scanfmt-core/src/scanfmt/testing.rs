//! Testing utilities
//!
//!     Helpers shared by the unit tests and the integration tests. They drive a scanner
//!     through the three ways text reaches it in practice:
//!
//!         1. Whole: one last window ([tokenize]).
//!         2. Streamed: several windows joined with `relocate` ([tokenize_chunks]).
//!         3. Resumed: a first scanner stops at a split point, a second one continues from
//!            its state mark ([tokenize_split]).
//!
//!     All three must yield the same tokens for the same text. The integration tests check
//!     exactly that, so when adding a syntax, run it through every helper here.
//!
//!     Tokens are collected as `(Token, String)` pairs because token text is only readable
//!     while the window that produced it is loaded.

use super::lexing::{ScanError, Scanner, Syntax};
use super::token::{describe, Token};

fn drain<S: Syntax>(scanner: &mut Scanner<S>, out: &mut Vec<(Token, String)>) {
    while let Some(token) = scanner.next_token() {
        let text = scanner.token_text(&token);
        out.push((token, text));
    }
}

/// Scans `text` as one last window.
pub fn tokenize<S: Syntax>(syntax: S, text: &str) -> Vec<(Token, String)> {
    let mut scanner = Scanner::new(syntax);
    let mut tokens = Vec::new();
    if scanner.load(None, text, 0, true).is_ok() {
        drain(&mut scanner, &mut tokens);
    }
    tokens
}

/// Renders the token stream of `text` as space separated `Name(text)` items.
pub fn render_tokens<S: Syntax>(syntax: S, text: &str) -> String {
    let mut scanner = Scanner::new(syntax);
    let mut tokens = Vec::new();
    if scanner.load(None, text, 0, true).is_ok() {
        drain(&mut scanner, &mut tokens);
    }
    tokens
        .iter()
        .map(|(token, text)| describe(&scanner.token_name(token.id), text))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Scans `chunks` as consecutive windows of one session.
pub fn tokenize_chunks<S: Syntax>(syntax: S, chunks: &[&str]) -> Vec<(Token, String)> {
    let mut scanner = Scanner::new(syntax);
    let mut tokens = Vec::new();
    let Some((first, rest)) = chunks.split_first() else {
        return tokens;
    };
    if scanner.load(None, first, 0, rest.is_empty()).is_err() {
        return tokens;
    }
    drain(&mut scanner, &mut tokens);
    for (i, chunk) in rest.iter().enumerate() {
        scanner.relocate(chunk, i + 1 == rest.len());
        drain(&mut scanner, &mut tokens);
    }
    tokens
}

/// Scans the first `split` characters with one scanner, then hands its state mark to a
/// fresh scanner that scans the rest.
pub fn tokenize_split<S, F>(make: F, text: &str, split: usize) -> Result<Vec<(Token, String)>, ScanError>
where
    S: Syntax,
    F: Fn() -> S,
{
    let chars: Vec<char> = text.chars().collect();
    let split = split.min(chars.len());
    let head: String = chars[..split].iter().collect();

    let mut first = Scanner::new(make());
    first.load(None, &head, 0, false)?;
    let mut tokens = Vec::new();
    drain(&mut first, &mut tokens);
    let mark = first.snapshot();
    let resume_at = first.position() - mark.prescan();

    let tail: String = chars[resume_at..].iter().collect();
    let mut second = Scanner::new(make());
    second.load(Some(&mark), &tail, resume_at, true)?;
    drain(&mut second, &mut tokens);
    Ok(tokens)
}
