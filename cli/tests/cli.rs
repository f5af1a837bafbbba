use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use tempfile::TempDir;

fn write_file(path: &Path, contents: &str) {
    fs::write(path, contents).expect("write test file");
}

#[test]
fn decodes_json_file() {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("input.json");
    write_file(&input, r#"{"a[b]":"c","a[n]":"2"}"#);

    cargo_bin_cmd!("nested-form")
        .arg(&input)
        .args(["--indent", "0"])
        .assert()
        .success()
        .stdout(r#"{"a":{"b":"c","n":2}}"#);
}

#[test]
fn decodes_urlencoded_form_with_pretty_output() {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("input.form");
    write_file(&input, "a%5B0%5D%5Bx%5D=1&a%5B0%5D%5By%5D=true\n");

    let expected = "{\n  \"a\": [\n    {\n      \"x\": 1,\n      \"y\": true\n    }\n  ]\n}";

    cargo_bin_cmd!("nested-form")
        .arg(&input)
        .assert()
        .success()
        .stdout(expected);
}

#[test]
fn form_detected_from_content_on_stdin() {
    cargo_bin_cmd!("nested-form")
        .args(["--indent", "0"])
        .write_stdin("tags[]=a&tags[]=b&name=x")
        .assert()
        .success()
        .stdout(r#"{"tags":["a","b"],"name":"x"}"#);
}

#[test]
fn explicit_format_overrides_detection() {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("input.json");
    write_file(&input, "item[attribute][0][t]=size&item[attribute][3][t]=color");

    cargo_bin_cmd!("nested-form")
        .arg(&input)
        .args(["--format", "form", "--indent", "0"])
        .assert()
        .success()
        .stdout(r#"{"item":{"attribute":[{"t":"size"},null,null,{"t":"color"}]}}"#);
}

#[test]
fn blank_and_empty_flags() {
    cargo_bin_cmd!("nested-form")
        .args(["--indent", "0", "--no-allow-blank", "--allow-empty"])
        .write_stdin(r#"{"x":"","y[]":"[]"}"#)
        .assert()
        .success()
        .stdout(r#"{"x":null,"y":[]}"#);
}

#[test]
fn plain_input_is_echoed_unless_strict() {
    cargo_bin_cmd!("nested-form")
        .args(["--indent", "0"])
        .write_stdin(r#"{"plain":"v"}"#)
        .assert()
        .success()
        .stdout(r#"{"plain":"v"}"#);

    cargo_bin_cmd!("nested-form")
        .arg("--strict")
        .write_stdin(r#"{"plain":"v"}"#)
        .assert()
        .failure()
        .stdout("")
        .stderr(contains("ERROR").and(contains("not a nested type")));
}

#[test]
fn check_reports_through_exit_status() {
    cargo_bin_cmd!("nested-form")
        .arg("--check")
        .write_stdin(r#"{"a[0]":"x"}"#)
        .assert()
        .success()
        .stdout("");

    cargo_bin_cmd!("nested-form")
        .arg("--check")
        .write_stdin(r#"["a[0]"]"#)
        .assert()
        .code(1)
        .stdout("");
}

#[test]
fn sparse_overflow_is_reported() {
    cargo_bin_cmd!("nested-form")
        .write_stdin("a[0]=x&a[1002]=y")
        .assert()
        .failure()
        .stderr(contains("ERROR").and(contains("exceeds 1000")));
}

#[test]
fn writes_output_file_and_reports_status() {
    let dir = TempDir::new().expect("tempdir");
    let input = dir.path().join("input.json");
    let output = dir.path().join("out.json");
    write_file(&input, r#"{"[0][sku]":"A","[1][sku]":"B"}"#);

    cargo_bin_cmd!("nested-form")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .args(["--indent", "0"])
        .assert()
        .success()
        .stdout(contains("Decoded").and(contains("out.json")));

    let written = fs::read_to_string(&output).expect("read output");
    assert_eq!(written, r#"[{"sku":"A"},{"sku":"B"}]"#);
}

#[test]
fn invalid_json_fails() {
    cargo_bin_cmd!("nested-form")
        .args(["--format", "json"])
        .write_stdin("{not json")
        .assert()
        .failure()
        .stderr(contains("ERROR"));
}
