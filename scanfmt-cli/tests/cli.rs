use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn source(dir: &TempDir, name: &str, text: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, text).expect("write fixture");
    path.to_string_lossy().into_owned()
}

#[test]
fn tokens_simple_output() {
    let dir = TempDir::new().expect("temp dir");
    let path = source(&dir, "A.java", "int x = 1;\n");
    let mut cmd = cargo_bin_cmd!("scanfmt");
    cmd.arg("tokens").arg(&path);
    cmd.assert().success().stdout(
        predicate::str::contains("Keyword(int)\nWhitespace( )\nIdentifier(x)")
            .and(predicate::str::contains("eol(\\n)")),
    );
}

#[test]
fn tokens_json_output() {
    let dir = TempDir::new().expect("temp dir");
    let path = source(&dir, "A.java", "x >>>= 2;");
    let mut cmd = cargo_bin_cmd!("scanfmt");
    cmd.arg("tokens").arg(&path).arg("--format").arg("json");
    cmd.assert().success().stdout(
        predicate::str::contains("\"name\": \"Operator\"")
            .and(predicate::str::contains("\"text\": \">>>=\"")),
    );
}

#[test]
fn tokens_syntax_from_extension() {
    let dir = TempDir::new().expect("temp dir");
    let path = source(&dir, "page.html", "<p class=\"a\">hi</p>");
    let mut cmd = cargo_bin_cmd!("scanfmt");
    cmd.arg("tokens").arg(&path);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Tag(<p)\nWs( )\nArgument(class)"));
}

#[test]
fn tokens_jsp_regions() {
    let dir = TempDir::new().expect("temp dir");
    let path = source(&dir, "page.txt", "<b><% x(); %></b>");
    let mut cmd = cargo_bin_cmd!("scanfmt");
    cmd.arg("tokens").arg(&path).arg("--syntax").arg("jsp");
    cmd.assert().success().stdout(
        predicate::str::contains("RegionOpen(<%)")
            .and(predicate::str::contains("MethodCall(x)"))
            .and(predicate::str::contains("RegionClose(%>)")),
    );
}

#[test]
fn format_reindents_java() {
    let dir = TempDir::new().expect("temp dir");
    let path = source(&dir, "A.java", "if(x){\n  y=1;\n}");
    let mut cmd = cargo_bin_cmd!("scanfmt");
    cmd.arg("format").arg(&path);
    cmd.assert().success().stdout("if(x){\n    y=1;\n}\n");
}

#[test]
fn format_shift_width_flag() {
    let dir = TempDir::new().expect("temp dir");
    let path = source(&dir, "A.java", "a {\nb;\n}\n");
    let mut cmd = cargo_bin_cmd!("scanfmt");
    cmd.arg("format").arg(&path).arg("--shift-width").arg("2");
    cmd.assert().success().stdout("a {\n  b;\n}\n");
}

#[test]
fn format_config_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = source(&dir, "A.java", "foo(x);\n");
    let config = source(
        &dir,
        "scanfmt.toml",
        "[formatting]\nadd_space_before_parenthesis = true\n",
    );
    let mut cmd = cargo_bin_cmd!("scanfmt");
    cmd.arg("format").arg(&path).arg("--config").arg(&config);
    cmd.assert().success().stdout("foo (x);\n");
}

#[test]
fn missing_file_fails() {
    let mut cmd = cargo_bin_cmd!("scanfmt");
    cmd.arg("format").arg("/definitely/not/here/A.java");
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: cannot read"));
}
