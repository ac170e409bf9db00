//! End-to-end tests driving the udbg binary

mod common;

use assert_cmd::Command;
use common::{create_binary, create_test_config};
use predicates::prelude::*;
use tempfile::TempDir;

fn udbg(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("udbg").unwrap();
    cmd.current_dir(dir.path()).env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_version() {
    let dir = TempDir::new().unwrap();
    udbg(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_then_quit() {
    let dir = TempDir::new().unwrap();
    udbg(&dir)
        .args(["--arch", "x86", "--mode", "32"])
        .write_stdin("help\nhelp show\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Module core loaded"))
        .stdout(predicate::str::contains("Commands list:"))
        .stdout(predicate::str::contains("\tquit (q)"))
        .stdout(predicate::str::contains("Show list of mappings and patches"));
}

#[test]
fn test_unknown_command_keeps_session_alive() {
    let dir = TempDir::new().unwrap();
    udbg(&dir)
        .args(["-a", "arm", "-m", "thumb"])
        .write_stdin("frob\nshow\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("'frob' not found"))
        .stdout(predicate::str::contains("arch: arm"))
        .stdout(predicate::str::contains("mode: thumb"));
}

#[test]
fn test_end_of_input_exits_cleanly() {
    let dir = TempDir::new().unwrap();
    udbg(&dir)
        .args(["--arch", "mips", "--mode", "mips32"])
        .write_stdin("modules\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded modules:"));
}

#[test]
fn test_load_and_start() {
    let dir = TempDir::new().unwrap();
    let image = create_binary(&dir, "image.bin", &[0x90, 0x90, 0xc3]);

    udbg(&dir)
        .args(["--arch", "x86", "--mode", "64"])
        .write_stdin(format!("load {}\ns mappings\nc\nq\n", image.display()))
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded 3 bytes"))
        .stdout(predicate::str::contains("0x00001000 - 0x00001003 (3 bytes)"))
        .stdout(predicate::str::contains("Emulation started at 0x1000"));
}

#[test]
fn test_config_file_supplies_pair_and_aliases() {
    let (dir, config_path) = create_test_config(
        r#"
prompt: "emu>"
arch: arm64
mode: little-endian
aliases:
  info: show
"#,
    );

    udbg(&dir)
        .arg("-f")
        .arg(&config_path)
        .write_stdin("info\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("emu> "))
        .stdout(predicate::str::contains("Module aliases loaded"))
        .stdout(predicate::str::contains("arch: arm64"));
}

#[test]
fn test_config_discovered_from_working_directory() {
    let (dir, _) = create_test_config("arch: sparc\nmode: big-endian\n");

    udbg(&dir)
        .write_stdin("show\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("arch: sparc"))
        .stdout(predicate::str::contains("Select arch").not());
}

#[test]
fn test_prompts_when_pair_missing() {
    let dir = TempDir::new().unwrap();
    udbg(&dir)
        .write_stdin("riscv\n64\nshow\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Select arch"))
        .stdout(predicate::str::contains("Select mode"))
        .stdout(predicate::str::contains("arch: riscv"));
}

#[test]
fn test_invalid_config_fails() {
    let (dir, config_path) = create_test_config("aliases:\n  a: b\n  b: show\n");

    udbg(&dir)
        .arg("--file")
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("itself an alias"));
}

#[test]
fn test_missing_config_file_fails() {
    let dir = TempDir::new().unwrap();
    udbg(&dir)
        .args(["-f", "nowhere.yml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nowhere.yml"));
}

#[test]
fn test_bad_arch_is_rejected() {
    let dir = TempDir::new().unwrap();
    udbg(&dir)
        .args(["--arch", "z80"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("z80"));
}
