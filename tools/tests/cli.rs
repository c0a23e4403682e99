//! Runs the `svo-tools` binary to check what only the CLI does: the
//! per-frame notice on stderr and the exit status.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const MODES: &str = "tiny 2 1 0 0 0 0 0 0\n";

fn frames(dir: &Path, modes: &str, log: &str) -> Output {
    fs::write(dir.join("modes.txt"), modes).unwrap();
    fs::write(dir.join("sim.log"), log).unwrap();
    Command::new(env!("CARGO_BIN_EXE_svo-tools"))
        .env("RUST_LOG", "info")
        .arg("frames")
        .arg("--modes")
        .arg(dir.join("modes.txt"))
        .arg("--mode")
        .arg("tiny")
        .arg("-o")
        .arg(dir.join("out"))
        .arg(dir.join("sim.log"))
        .output()
        .unwrap()
}

#[test]
fn reports_each_frame_start() {
    let dir = tempfile::TempDir::new().unwrap();
    let log = "\
%Info: reset released
## 0000 1 2 3
## 0000 4 5 6
## 0000 7 8 9
";
    let out = frames(dir.path(), MODES, log);
    let stderr = String::from_utf8_lossy(&out.stderr);

    assert!(out.status.success(), "{}", stderr);
    assert!(stderr.contains("first line of frame 0 (line 2): ## 0000 1 2 3"));
    assert!(stderr.contains("first line of frame 1 (line 4): ## 0000 7 8 9"));

    assert_eq!(
        fs::read_to_string(dir.path().join("out/frame_000.ppm")).unwrap(),
        "P3\n2 1 63\n1 2 3\n4 5 6\n"
    );
    assert!(!dir.path().join("out/frame_001.ppm").exists());
}

#[test]
fn malformed_record_exits_non_zero() {
    let dir = tempfile::TempDir::new().unwrap();
    let out = frames(dir.path(), MODES, "## 0000 1 2 3\n## 0000 1 two 3\n");
    let stderr = String::from_utf8_lossy(&out.stderr);

    assert_eq!(out.status.code(), Some(1), "{}", stderr);
    assert!(stderr.contains("line 2: malformed pixel record"));
}

#[test]
fn oversized_mode_exits_non_zero() {
    let dir = tempfile::TempDir::new().unwrap();
    let modes = format!("tiny {} 1 1 0 0 0 0 0\n", usize::MAX);
    let out = frames(dir.path(), &modes, "## 0000 1 2 3\n");
    let stderr = String::from_utf8_lossy(&out.stderr);

    assert_eq!(out.status.code(), Some(1), "{}", stderr);
    assert!(stderr.contains("invalid mode definition"));
}
