//! Integration tests for pkg2src
//!
//! Runs the built binary in a scratch directory and decodes the generated
//! array back into bytes.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;
use vgs0_common::codegen::parse_hex_tokens;

fn pkg2src(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pkg2src"))
        .current_dir(dir)
        .env("RUST_LOG", "off")
        .args(args)
        .output()
        .expect("Failed to run pkg2src")
}

/// Declared length from `extern const unsigned char <name>[N];`
fn declared_len(header: &str) -> usize {
    let open = header.find('[').expect("missing [");
    let close = header.find(']').expect("missing ]");
    header[open + 1..close].parse().expect("length is not a number")
}

fn check_roundtrip(data: &[u8]) {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("game.pkg"), data).unwrap();

    let output = pkg2src(dir.path(), &["game.pkg"]);
    assert!(output.status.success(), "pkg2src failed: {:?}", output);

    let source = std::fs::read_to_string(dir.path().join("gamepkg.c")).unwrap();
    let header = std::fs::read_to_string(dir.path().join("gamepkg.h")).unwrap();

    let decoded: Vec<u8> = parse_hex_tokens(&source)
        .into_iter()
        .map(|v| u8::try_from(v).expect("token is not a byte"))
        .collect();
    assert_eq!(decoded, data);
    assert_eq!(declared_len(&header), data.len());
    assert!(source.starts_with(&format!("const unsigned char gamepkg[{}] = {{\n", data.len())));
}

#[test]
fn test_roundtrip_small() {
    check_roundtrip(b"VGS0PKG\0");
}

#[test]
fn test_roundtrip_non_multiple_of_sixteen() {
    let data: Vec<u8> = (0..8229u32).map(|i| (i.wrapping_mul(2654435761) >> 13) as u8).collect();
    check_roundtrip(&data);
}

#[test]
fn test_roundtrip_empty() {
    check_roundtrip(&[]);
}

#[test]
fn test_header_layout() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("game.pkg"), [0u8; 33]).unwrap();

    assert!(pkg2src(dir.path(), &["game.pkg"]).status.success());
    assert_eq!(
        std::fs::read_to_string(dir.path().join("gamepkg.h")).unwrap(),
        "#pragma once\n\nextern \"C\" {\n    extern const unsigned char gamepkg[33];\n}\n"
    );
}

#[test]
fn test_custom_name_and_directory() {
    let dir = tempdir().unwrap();
    std::fs::create_dir(dir.path().join("gen")).unwrap();
    std::fs::write(dir.path().join("title.bin"), [1u8, 2, 3]).unwrap();

    let output = pkg2src(dir.path(), &["title.bin", "--name", "titlepkg", "--out-dir", "gen"]);
    assert!(output.status.success());
    let source = std::fs::read_to_string(dir.path().join("gen/titlepkg.c")).unwrap();
    assert_eq!(
        source,
        "const unsigned char titlepkg[3] = {\n    0x01, 0x02, 0x03\n};\n"
    );
    assert!(dir.path().join("gen/titlepkg.h").exists());
}

#[test]
fn test_missing_input_fails() {
    let dir = tempdir().unwrap();
    let output = pkg2src(dir.path(), &["missing.pkg"]);

    assert!(!output.status.success());
    #[cfg(unix)]
    assert_eq!(output.status.code(), Some(255));
    assert!(String::from_utf8_lossy(&output.stderr).contains("file open error"));
    assert!(!dir.path().join("gamepkg.c").exists());
}

#[test]
fn test_missing_argument_fails() {
    let dir = tempdir().unwrap();
    let output = pkg2src(dir.path(), &[]);
    assert!(!output.status.success());
    assert!(!output.stderr.is_empty());
}
