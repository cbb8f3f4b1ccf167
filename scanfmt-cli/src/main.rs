//! Command-line interface for scanfmt
//! This binary dumps the token streams of the bundled scanners and reformats Java sources.
//!
//! Usage:
//!   scanfmt tokens `<path>` [--syntax `<syntax>`] [--format `<format>`]   - Print the token stream
//!   scanfmt format `<path>` [--config `<file>`] [--shift-width `<n>`]     - Reformat a Java file

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use scanfmt_config::{Loader, Overrides};
use scanfmt_core::scanfmt::formatting::{FormatWriter, IoSink, JavaFormatLayer};
use scanfmt_core::scanfmt::lexing::{HtmlSyntax, JavaSyntax, MultiSyntax, Scanner, Syntax};
use scanfmt_core::scanfmt::token::describe;
use serde::Serialize;
use std::io;
use std::path::Path;
use tracing::{debug, Level};

fn build_cli() -> Command {
    Command::new("scanfmt")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Scan and reformat Java and HTML sources")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log to stderr (repeat for more detail)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("tokens")
                .about("Print the token stream of a file")
                .arg(Arg::new("path").help("Path to the source file").required(true).index(1))
                .arg(
                    Arg::new("syntax")
                        .long("syntax")
                        .short('s')
                        .help("Scanner to use (default: from the file extension, else java)")
                        .value_parser(["java", "html", "jsp"]),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format")
                        .value_parser(["simple", "json"])
                        .default_value("simple"),
                ),
        )
        .subcommand(
            Command::new("format")
                .about("Reformat a Java file and print the result")
                .arg(Arg::new("path").help("Path to the Java file").required(true).index(1))
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .help("TOML file layered over the built-in defaults"),
                )
                .arg(
                    Arg::new("shift-width")
                        .long("shift-width")
                        .help("Columns per indentation level")
                        .value_parser(value_parser!(usize)),
                ),
        )
}

fn main() {
    let matches = build_cli().get_matches();
    init_logging(matches.get_count("verbose"));

    let result = match matches.subcommand() {
        Some(("tokens", sub)) => handle_tokens_command(sub),
        Some(("format", sub)) => handle_format_command(sub),
        _ => Err("unknown command".to_string()),
    };
    if let Err(message) = result {
        eprintln!("Error: {message}");
        std::process::exit(1);
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => return,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn read_source(path: &str) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("cannot read {path}: {e}"))
}

/// One token as printed by `tokens --format json`.
#[derive(Debug, Serialize)]
struct TokenRow {
    name: String,
    id: u32,
    helper: Option<u16>,
    offset: usize,
    len: usize,
    text: String,
}

fn scan<S: Syntax>(syntax: S, text: &str) -> Result<Vec<TokenRow>, String> {
    let mut scanner = Scanner::new(syntax);
    scanner
        .load(None, text, 0, true)
        .map_err(|e| e.to_string())?;
    let mut rows = Vec::new();
    while let Some(token) = scanner.next_token() {
        rows.push(TokenRow {
            name: scanner.token_name(token.id).into_owned(),
            id: token.id.0,
            helper: token.helper,
            offset: token.offset,
            len: token.len,
            text: scanner.token_text(&token),
        });
    }
    Ok(rows)
}

/// Picks a scanner from the file extension.
fn syntax_for(path: &str) -> &'static str {
    match Path::new(path).extension().and_then(|ext| ext.to_str()) {
        Some("html" | "htm") => "html",
        Some("jsp") => "jsp",
        _ => "java",
    }
}

/// Handle the tokens command
fn handle_tokens_command(matches: &ArgMatches) -> Result<(), String> {
    let path = matches
        .get_one::<String>("path")
        .ok_or("path is required")?;
    let syntax = matches
        .get_one::<String>("syntax")
        .map_or_else(|| syntax_for(path), String::as_str);
    let format = matches
        .get_one::<String>("format")
        .map_or("simple", String::as_str);
    let text = read_source(path)?;
    debug!(path, syntax, chars = text.chars().count(), "scanning");

    let rows = match syntax {
        "html" => scan(HtmlSyntax::new(), &text)?,
        "jsp" => scan(MultiSyntax::jsp(), &text)?,
        _ => scan(JavaSyntax::new(), &text)?,
    };

    let output = match format {
        "json" => serde_json::to_string_pretty(&rows).map_err(|e| e.to_string())?,
        _ => rows
            .iter()
            .map(|row| describe(&row.name, &row.text))
            .collect::<Vec<_>>()
            .join("\n"),
    };
    println!("{output}");
    Ok(())
}

/// Handle the format command
fn handle_format_command(matches: &ArgMatches) -> Result<(), String> {
    let path = matches
        .get_one::<String>("path")
        .ok_or("path is required")?;

    let mut loader = Loader::new().with_overrides(Overrides {
        shift_width: matches.get_one::<usize>("shift-width").copied(),
        ..Overrides::default()
    });
    if let Some(config) = matches.get_one::<String>("config") {
        loader = loader.with_file(config);
    }
    let config = loader
        .build()
        .map_err(|e| format!("invalid configuration: {e}"))?;
    debug!(?config, "configuration loaded");

    let text = read_source(path)?;
    let stdout = io::stdout().lock();
    let mut writer = FormatWriter::new(
        JavaFormatLayer,
        config.formatting,
        config.writer,
        IoSink::new(stdout),
    );
    writer.write(&text).map_err(|e| e.to_string())?;
    writer.close().map_err(|e| e.to_string())
}
