//! Integration tests for the srm-sim CLI.

#![allow(clippy::cast_possible_truncation)]

use thiserror as _;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use simulator_cli::parse_image;
use simulator_core::{encode_absolute, encode_immediate, encode_niladic, Opcode};

fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_srm-sim"))
}

fn write_image(dir: &Path, name: &str, text: &[u32], datasize: u32, data: &[u32]) -> PathBuf {
    let mut bytes = Vec::new();
    for header in [text.len() as u32, datasize, data.len() as u32] {
        bytes.extend_from_slice(&header.to_le_bytes());
    }
    for word in text.iter().chain(data) {
        bytes.extend_from_slice(&word.to_le_bytes());
    }
    let path = dir.join(name);
    fs::write(&path, bytes).expect("image file writes");
    path
}

fn halting_program() -> Vec<u32> {
    vec![
        encode_immediate(Opcode::Load, 0, 5),
        encode_immediate(Opcode::Add, 0, 3),
        encode_absolute(Opcode::Store, 0, 0),
        encode_niladic(Opcode::Halt),
    ]
}

#[test]
fn run_reports_halt_and_exits_successfully() {
    let dir = tempfile::tempdir().expect("temp dir");
    let image = write_image(dir.path(), "ok.bin", &halting_program(), 4, &[0]);

    let output = Command::new(binary_path())
        .args(["run", image.to_str().expect("utf-8 path")])
        .output()
        .expect("srm-sim runs");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("WARNING: HALT reached at address 0x0003"));
    assert!(stdout.contains("*** CPU ***"));
    assert!(stdout.contains("CC: P"));
}

#[test]
fn run_reports_faults_on_stderr_and_fails() {
    let dir = tempfile::tempdir().expect("temp dir");
    let text = vec![encode_absolute(Opcode::Load, 0, 100), encode_niladic(Opcode::Halt)];
    let image = write_image(dir.path(), "fault.bin", &text, 10, &[]);

    let output = Command::new(binary_path())
        .args(["run", image.to_str().expect("utf-8 path")])
        .output()
        .expect("srm-sim runs");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: segmentation fault in data at address 0x0000"));
}

#[test]
fn run_writes_a_reloadable_dump() {
    let dir = tempfile::tempdir().expect("temp dir");
    let image = write_image(dir.path(), "ok.bin", &halting_program(), 4, &[0]);
    let dump = dir.path().join("dump.prog");

    let status = Command::new(binary_path())
        .args([
            "run",
            image.to_str().expect("utf-8 path"),
            "--dump",
            dump.to_str().expect("utf-8 path"),
        ])
        .status()
        .expect("srm-sim runs");
    assert!(status.success());

    // The dump holds the post-run static data (data[0] == 8) and reloads.
    let bytes = fs::read(&dump).expect("dump exists");
    let program = parse_image(&bytes).expect("dump reloads");
    assert_eq!(program.data()[0], 8);
}

#[test]
fn trace_prints_each_executed_instruction() {
    let dir = tempfile::tempdir().expect("temp dir");
    let image = write_image(dir.path(), "ok.bin", &halting_program(), 4, &[0]);

    let output = Command::new(binary_path())
        .args(["run", image.to_str().expect("utf-8 path"), "-t"])
        .output()
        .expect("srm-sim runs");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("TRACE: Executing: 0x0000: LOAD R00, #5"));
    assert!(stdout.contains("TRACE: Executing: 0x0003: HALT"));
}

#[test]
fn show_lists_the_program_without_executing() {
    let dir = tempfile::tempdir().expect("temp dir");
    let image = write_image(dir.path(), "ok.bin", &halting_program(), 4, &[9]);

    let output = Command::new(binary_path())
        .args(["show", image.to_str().expect("utf-8 path")])
        .output()
        .expect("srm-sim runs");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("*** PROGRAM (size: 4) ***"));
    assert!(stdout.contains("STORE R00, @0000"));
    // Not executed: the initial data word is untouched.
    assert!(stdout.contains("0x0000: 0x00000009 9"));
}

#[test]
fn corrupt_images_are_rejected_before_execution() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("bad.bin");
    fs::write(&path, [1, 2, 3]).expect("file writes");

    let output = Command::new(binary_path())
        .args(["run", path.to_str().expect("utf-8 path")])
        .output()
        .expect("srm-sim runs");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("truncated"));
}
