//! Formatter behaviour through the public writer API

use proptest::prelude::*;
use scanfmt_core::scanfmt::formatting::{
    format_text, FormatOptions, FormatWriter, JavaFormatLayer, WriterOptions,
};

#[derive(Debug, Clone)]
enum Stmt {
    Simple(String),
    Block(String, Vec<Stmt>),
}

fn stmt() -> impl Strategy<Value = Stmt> {
    let leaf = "[a-z]{1,6}".prop_map(Stmt::Simple);
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            "[a-z]{1,6}".prop_map(Stmt::Simple),
            ("[a-z]{1,6}", prop::collection::vec(inner, 0..4))
                .prop_map(|(head, body)| Stmt::Block(head, body)),
        ]
    })
}

fn render(stmts: &[Stmt], depth: usize, indent: &dyn Fn(usize) -> String, out: &mut String) {
    for stmt in stmts {
        match stmt {
            Stmt::Simple(name) => out.push_str(&format!("{}{name};\n", indent(depth))),
            Stmt::Block(head, body) => {
                out.push_str(&format!("{}{head} {{\n", indent(depth)));
                render(body, depth + 1, indent, out);
                out.push_str(&format!("{}}}\n", indent(depth)));
            }
        }
    }
}

fn program(stmts: &[Stmt], indent: &dyn Fn(usize) -> String) -> String {
    let mut out = String::new();
    render(stmts, 0, indent, &mut out);
    out
}

fn format(text: &str) -> String {
    format_text(JavaFormatLayer, &FormatOptions::default(), text).expect("string sink")
}

proptest! {
    #[test]
    fn well_indented_program_is_unchanged(stmts in prop::collection::vec(stmt(), 0..6)) {
        let text = program(&stmts, &|depth: usize| "    ".repeat(depth));
        prop_assert_eq!(format(&text), text);
    }

    #[test]
    fn flat_program_gets_indented(stmts in prop::collection::vec(stmt(), 0..6)) {
        let flat = program(&stmts, &|_: usize| String::new());
        let expected = program(&stmts, &|depth: usize| "    ".repeat(depth));
        prop_assert_eq!(format(&flat), expected);
    }

    #[test]
    fn chunked_writes_match_one_write(
        stmts in prop::collection::vec(stmt(), 0..6),
        sizes in prop::collection::vec(1usize..8, 1..10),
    ) {
        let text = program(&stmts, &|depth: usize| "  ".repeat(depth));
        let chars: Vec<char> = text.chars().collect();
        let mut writer = FormatWriter::new(
            JavaFormatLayer,
            FormatOptions::default(),
            WriterOptions::default(),
            String::new(),
        );
        let mut at = 0;
        for size in sizes.iter().cycle() {
            if at >= chars.len() {
                break;
            }
            let end = (at + size).min(chars.len());
            let piece: String = chars[at..end].iter().collect();
            writer.write(&piece).expect("open writer");
            at = end;
        }
        writer.close().expect("string sink");
        prop_assert_eq!(writer.into_sink(), format(&text));
    }
}

#[test]
fn reindents_if_block() {
    assert_eq!(format("if(x){\n  y=1;\n}"), "if(x){\n    y=1;\n}\n");
}

#[test]
fn early_flush_on_empty_first_line() {
    let mut writer = FormatWriter::new(
        JavaFormatLayer,
        FormatOptions::default(),
        WriterOptions {
            start_indent: 8,
            start_at_line_begin: true,
        },
        String::new(),
    );
    writer.flush().expect("string sink");
    assert_eq!(writer.sink(), "        ");
    assert!(writer.flushed_early());
}

#[test]
fn start_indent_is_the_base_of_every_line() {
    let mut writer = FormatWriter::new(
        JavaFormatLayer,
        FormatOptions::default(),
        WriterOptions {
            start_indent: 2,
            start_at_line_begin: true,
        },
        String::new(),
    );
    writer.write("a {\nb;\n}\n").expect("open writer");
    writer.close().expect("string sink");
    assert_eq!(writer.into_sink(), "  a {\n      b;\n  }\n");
}
