//! Scanner properties over generated text
//!
//! Every scanner must cover its input exactly and produce the same tokens whether the
//! text arrives whole, in chunks, or through a state mark handed to a fresh scanner.

use proptest::prelude::*;
use scanfmt_core::scanfmt::lexing::{HtmlSyntax, JavaSyntax, MultiSyntax, Scanner, Syntax};
use scanfmt_core::scanfmt::testing::{tokenize, tokenize_chunks, tokenize_split};
use scanfmt_core::scanfmt::token::{detokenize, Token};

/// Java-looking text: operators, literals, comments and line breaks.
fn java_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z0-9 ]{0,30}",
        "[a-zA-Z0-9_ \n\t\"'\\\\/*+=<>!&|^%.;,(){}\\[\\]?:~@-]{0,60}",
        prop::collection::vec(
            prop_oneof![
                Just("int".to_string()),
                Just("synchronized".to_string()),
                Just(" ".to_string()),
                Just("\n".to_string()),
                Just("/* c".to_string()),
                Just("*/".to_string()),
                Just("// x".to_string()),
                Just(">>>=".to_string()),
                Just("<<<".to_string()),
                Just("0x1F".to_string()),
                Just("017".to_string()),
                Just("089".to_string()),
                Just("1.5e-3f".to_string()),
                Just("\"s\\\"".to_string()),
                Just("'c'".to_string()),
                Just("foo".to_string()),
                Just("(".to_string()),
                Just("{".to_string()),
                Just("}".to_string()),
            ],
            0..20
        )
        .prop_map(|parts| parts.concat()),
    ]
}

/// Markup-looking text, malformed more often than not.
fn html_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z <>/=\"'&#;!\n-]{0,60}",
        prop::collection::vec(
            prop_oneof![
                Just("<p".to_string()),
                Just("</p".to_string()),
                Just(">".to_string()),
                Just(" ".to_string()),
                Just("\n".to_string()),
                Just("class".to_string()),
                Just("=".to_string()),
                Just("\"v".to_string()),
                Just("'w".to_string()),
                Just("\"".to_string()),
                Just("&amp;".to_string()),
                Just("&#38;".to_string()),
                Just("&#x2F".to_string()),
                Just("&".to_string()),
                Just("<!--".to_string()),
                Just("-->".to_string()),
                Just("<!DOCTYPE".to_string()),
                Just("--".to_string()),
                Just("text".to_string()),
            ],
            0..20
        )
        .prop_map(|parts| parts.concat()),
    ]
}

/// Markup with embedded code regions, delimiters often unbalanced.
fn jsp_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just("<%".to_string()),
            Just("%>".to_string()),
            Just("<%=".to_string()),
            Just("<".to_string()),
            Just("%".to_string()),
            Just("<p".to_string()),
            Just(">".to_string()),
            Just(" ".to_string()),
            Just("\n".to_string()),
            Just("\"".to_string()),
            Just("'".to_string()),
            Just("<!--".to_string()),
            Just("-->".to_string()),
            Just("<!DOCTYPE".to_string()),
            Just("-".to_string()),
            Just("&amp;".to_string()),
            Just("int".to_string()),
            Just("x".to_string()),
            Just("/*".to_string()),
            Just("*/".to_string()),
        ],
        0..16,
    )
    .prop_map(|parts| parts.concat())
}

fn assert_covers(tokens: &[(Token, String)], text: &str) {
    let mut at = 0;
    for (token, token_text) in tokens {
        assert_eq!(token.offset, at, "gap or overlap before {token_text:?}");
        assert!(token.len > 0, "empty token at {at}");
        assert_eq!(token.len, token_text.chars().count());
        at += token.len;
    }
    assert_eq!(detokenize(tokens), text);
}

/// Cuts `text` into chunks at the given character positions.
fn chunks(text: &str, cuts: &[usize]) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut cuts: Vec<usize> = cuts.iter().map(|c| c % (chars.len() + 1)).collect();
    cuts.sort_unstable();
    let mut out = Vec::new();
    let mut from = 0;
    for cut in cuts {
        out.push(chars[from..cut].iter().collect());
        from = cut;
    }
    out.push(chars[from..].iter().collect());
    out
}

fn assert_resumable<S, F>(make: F, text: &str)
where
    S: Syntax,
    F: Fn() -> S,
{
    let whole = tokenize(make(), text);
    for k in 0..=text.chars().count() {
        let split = tokenize_split(&make, text, k).expect("same syntax on both sides");
        assert_eq!(split, whole, "split at {k} of {text:?}");
    }
}

proptest! {
    #[test]
    fn java_tokens_cover_input(text in java_text()) {
        assert_covers(&tokenize(JavaSyntax::new(), &text), &text);
    }

    #[test]
    fn java_tokens_cover_any_input(text in any::<String>()) {
        assert_covers(&tokenize(JavaSyntax::new(), &text), &text);
    }

    #[test]
    fn html_tokens_cover_input(text in html_text()) {
        assert_covers(&tokenize(HtmlSyntax::new(), &text), &text);
    }

    #[test]
    fn html_tokens_cover_any_input(text in any::<String>()) {
        assert_covers(&tokenize(HtmlSyntax::new(), &text), &text);
    }

    #[test]
    fn java_resumes_at_every_split(text in java_text()) {
        assert_resumable(JavaSyntax::new, &text);
    }

    #[test]
    fn html_resumes_at_every_split(text in html_text()) {
        assert_resumable(HtmlSyntax::new, &text);
    }

    #[test]
    fn jsp_tokens_cover_input(text in jsp_text()) {
        assert_covers(&tokenize(MultiSyntax::jsp(), &text), &text);
    }

    #[test]
    fn jsp_resumes_at_every_split(text in jsp_text()) {
        assert_resumable(MultiSyntax::jsp, &text);
    }

    #[test]
    fn java_chunks_match_whole(text in java_text(), cuts in prop::collection::vec(any::<usize>(), 0..5)) {
        let parts = chunks(&text, &cuts);
        let parts: Vec<&str> = parts.iter().map(String::as_str).collect();
        prop_assert_eq!(tokenize_chunks(JavaSyntax::new(), &parts), tokenize(JavaSyntax::new(), &text));
    }

    #[test]
    fn html_chunks_match_whole(text in html_text(), cuts in prop::collection::vec(any::<usize>(), 0..5)) {
        let parts = chunks(&text, &cuts);
        let parts: Vec<&str> = parts.iter().map(String::as_str).collect();
        prop_assert_eq!(tokenize_chunks(HtmlSyntax::new(), &parts), tokenize(HtmlSyntax::new(), &text));
    }

    #[test]
    fn jsp_chunks_match_whole(text in jsp_text(), cuts in prop::collection::vec(any::<usize>(), 0..5)) {
        let parts = chunks(&text, &cuts);
        let parts: Vec<&str> = parts.iter().map(String::as_str).collect();
        prop_assert_eq!(tokenize_chunks(MultiSyntax::jsp(), &parts), tokenize(MultiSyntax::jsp(), &text));
    }
}

#[test]
fn jsp_page_covers_input() {
    let text = "<html>\n<% int i = 0; %>\n<a href=\"x<%= i %>y\">&amp;</a>\n";
    let tokens = tokenize(MultiSyntax::jsp(), text);
    assert_covers(&tokens, text);
}

#[test]
fn mark_compares_equal_after_same_prefix() {
    let mut a = Scanner::new(JavaSyntax::new());
    let mut b = Scanner::new(JavaSyntax::new());
    a.load(None, "int x = /* c", 0, false).expect("fresh scanner");
    b.load(None, "long y = /* d", 0, false).expect("fresh scanner");
    while a.next_token().is_some() {}
    while b.next_token().is_some() {}

    let mark = a.snapshot();
    assert_eq!(mark.prescan(), 4);
    assert_eq!(b.prescan(), 4);
    assert!(b.compare_state(&mark).is_equal());

    b.relocate(" */", false);
    while b.next_token().is_some() {}
    assert!(!b.compare_state(&mark).is_equal());
}
