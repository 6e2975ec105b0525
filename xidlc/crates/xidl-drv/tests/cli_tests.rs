//! End-to-end CLI tests for the xidlc binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn xidlc_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_xidlc"))
}

const PRELUDE: &str = "namespace xcom {\n\
    interface IUnknown(\"6e9e44bf-d0f4-4617-b880-0ba98a0b0897\") {}\n\
    }\n";

fn write_idl(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_cli_no_arguments_prints_usage() {
    Command::new(xidlc_bin())
        .assert()
        .failure()
        .stderr(predicate::str::contains("usage"));
}

#[test]
fn test_cli_compiles_enum_to_header() {
    let temp = TempDir::new().unwrap();
    write_idl(temp.path(), "colors.idl", "namespace m { enum Color { Red, Green, Blue } }");

    Command::new(xidlc_bin())
        .current_dir(temp.path())
        .arg("colors.idl")
        .assert()
        .success();

    let header = std::fs::read_to_string(temp.path().join("colors.hpp")).unwrap();
    assert!(header.contains("namespace m"));
    assert!(header.contains("typedef Color::type ColorEnum;"));
}

#[test]
fn test_cli_interface_produces_tie_header() {
    let temp = TempDir::new().unwrap();
    let source = format!(
        "{PRELUDE}namespace calc {{\n\
         interface ICalc(\"01234567-89ab-cdef-0123-456789abcdef\") extends xcom::IUnknown {{\n\
         int add(in int a, in int b);\n\
         }}\n\
         }}\n"
    );
    write_idl(temp.path(), "calc.idl", &source);

    Command::new(xidlc_bin())
        .current_dir(temp.path())
        .arg("calc.idl")
        .assert()
        .success();

    assert!(temp.path().join("calc.hpp").exists());
    let tie = std::fs::read_to_string(temp.path().join("calcTie.hpp")).unwrap();
    assert!(tie.contains("#include \"calc.hpp\""));
    assert!(tie.contains("class ICalcTie"));
}

#[test]
fn test_cli_single_header_option() {
    let temp = TempDir::new().unwrap();
    let source = format!(
        "{PRELUDE}namespace calc {{\n\
         interface ICalc(\"01234567-89ab-cdef-0123-456789abcdef\") extends xcom::IUnknown {{\n\
         int add(in int a, in int b);\n\
         }}\n\
         }}\n"
    );
    write_idl(temp.path(), "calc.idl", &source);

    Command::new(xidlc_bin())
        .current_dir(temp.path())
        .args(["-s", "calc.idl"])
        .assert()
        .success();

    assert!(!temp.path().join("calcTie.hpp").exists());
    let header = std::fs::read_to_string(temp.path().join("calc.hpp")).unwrap();
    assert!(header.contains("class ICalc"));
    assert!(header.contains("class ICalcTie"));
}

#[test]
fn test_cli_missing_input_fails() {
    let temp = TempDir::new().unwrap();

    Command::new(xidlc_bin())
        .current_dir(temp.path())
        .arg("absent.idl")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot open idl file"));
}

#[test]
fn test_cli_syntax_error_reports_location() {
    let temp = TempDir::new().unwrap();
    write_idl(temp.path(), "bad.idl", "namespace m {\nenum E { }\n}\n");

    Command::new(xidlc_bin())
        .current_dir(temp.path())
        .arg("bad.idl")
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("bad.idl:2: error:")
                .and(predicate::str::contains("an enumeration with no element")),
        );
}

#[test]
fn test_cli_continues_after_failure() {
    let temp = TempDir::new().unwrap();
    write_idl(temp.path(), "bad.idl", "struct Broken {");
    write_idl(temp.path(), "good.idl", "enum Fine { A }");

    Command::new(xidlc_bin())
        .current_dir(temp.path())
        .args(["bad.idl", "good.idl"])
        .assert()
        .failure();

    // The second file still compiled.
    assert!(temp.path().join("good.hpp").exists());
}

#[test]
fn test_cli_include_path_resolves_import() {
    let temp = TempDir::new().unwrap();
    let shared = TempDir::new().unwrap();
    write_idl(shared.path(), "base.idl", "namespace base { enum Kind { A, B } }");
    write_idl(
        temp.path(),
        "main.idl",
        "import \"base.idl\";\nnamespace m { sequence<base::Kind> Kinds; }",
    );

    Command::new(xidlc_bin())
        .current_dir(temp.path())
        .arg(format!("-I{}", shared.path().display()))
        .arg("main.idl")
        .assert()
        .success();

    let header = std::fs::read_to_string(temp.path().join("main.hpp")).unwrap();
    assert!(header.contains("#include <base.hpp>"));
    assert!(header.contains("class Kinds"));
}

#[test]
fn test_cli_separated_include_spelling() {
    let temp = TempDir::new().unwrap();
    let shared = TempDir::new().unwrap();
    write_idl(shared.path(), "dep.idl", "enum Dep { X }");
    write_idl(temp.path(), "main.idl", "import \"dep.idl\";");

    Command::new(xidlc_bin())
        .current_dir(temp.path())
        .args(["-I".to_string(), shared.path().display().to_string()])
        .arg("main.idl")
        .assert()
        .success();
}

#[test]
fn test_cli_verbose_reports_progress() {
    let temp = TempDir::new().unwrap();
    write_idl(temp.path(), "v.idl", "enum V { A }");

    Command::new(xidlc_bin())
        .current_dir(temp.path())
        .args(["--verbose", "v.idl"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Parsing: v.idl"));
}
