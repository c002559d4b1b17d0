//! Integration tests for the stepscope debug command

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

const SOURCE: &str = "let a = 1;\nlet b = f(a);\nprint(b);\n";
const TRACE: &str = r#"# recorded run
{"event":"push","expression":"Let a","offset":0}
{"event":"pop"}
{"event":"push","expression":"Let b","offset":11}
{"event":"push","expression":"Call f","offset":19}
{"event":"pop"}
{"event":"pop"}
"#;

fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn stepscope_cmd(cwd: &TempDir) -> Command {
    let mut cmd = Command::from(assert_cmd::cargo::cargo_bin_cmd!("stepscope"));
    cmd.current_dir(cwd.path())
        .env("NO_COLOR", "1")
        .env("STEPSCOPE_NO_HISTORY", "1")
        .env_remove("STEPSCOPE_POP_BEHAVIOR")
        .env_remove("STEPSCOPE_CARET_GLYPH")
        .env_remove("STEPSCOPE_LOG")
        .env_remove("STEPSCOPE_LOG_FILE");
    cmd
}

fn debug_traced(cwd: &TempDir, source: &NamedTempFile, trace: &NamedTempFile) -> Command {
    let mut cmd = stepscope_cmd(cwd);
    cmd.args([
        "debug",
        source.path().to_str().unwrap(),
        "--trace",
        trace.path().to_str().unwrap(),
    ]);
    cmd
}

// ── Basic launch tests ────────────────────────────────────────────────────────

#[test]
fn test_debug_help() {
    let cwd = TempDir::new().unwrap();
    stepscope_cmd(&cwd)
        .args(["debug", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Debug a source file"));
}

#[test]
fn test_debug_missing_file() {
    let cwd = TempDir::new().unwrap();
    stepscope_cmd(&cwd)
        .args(["debug", "nonexistent.src"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read source file"));
}

#[test]
fn test_debug_bad_trace() {
    let cwd = TempDir::new().unwrap();
    let source = create_test_file(SOURCE);
    let trace = create_test_file("{\"event\":\"pop\"}\n");
    debug_traced(&cwd, &source, &trace)
        .assert()
        .failure()
        .stderr(predicate::str::contains("pop without a matching push"));
}

#[test]
fn test_debug_launch_and_quit() {
    let cwd = TempDir::new().unwrap();
    let source = create_test_file(SOURCE);
    stepscope_cmd(&cwd)
        .args(["debug", source.path().to_str().unwrap()])
        .write_stdin("quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("stepscope debugger"))
        .stdout(predicate::str::contains("no trace loaded"))
        .stdout(predicate::str::contains("Debugger exited"));
}

#[test]
fn test_debug_exits_on_eof() {
    let cwd = TempDir::new().unwrap();
    let source = create_test_file(SOURCE);
    stepscope_cmd(&cwd)
        .args(["debug", source.path().to_str().unwrap()])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Debugger exited"));
}

// ── Stepping tests ────────────────────────────────────────────────────────────

#[test]
fn test_debug_starts_at_first_frame() {
    let cwd = TempDir::new().unwrap();
    let source = create_test_file(SOURCE);
    let trace = create_test_file(TRACE);
    debug_traced(&cwd, &source, &trace)
        .write_stdin("where\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("In frame Let a (depth 1)"));
}

#[test]
fn test_debug_step() {
    let cwd = TempDir::new().unwrap();
    let source = create_test_file(SOURCE);
    let trace = create_test_file(TRACE);
    debug_traced(&cwd, &source, &trace)
        .write_stdin("step\nstep\nbacktrace\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Stepped into Let b at 2:0"))
        .stdout(predicate::str::contains("Stepped into Call f at 2:8"))
        .stdout(predicate::str::contains("#0 Call f at 2:8 (offset 19)"))
        .stdout(predicate::str::contains("#1 Let b at 2:0 (offset 11)"));
}

#[test]
fn test_debug_continue_to_end() {
    let cwd = TempDir::new().unwrap();
    let source = create_test_file(SOURCE);
    let trace = create_test_file(TRACE);
    debug_traced(&cwd, &source, &trace)
        .write_stdin("continue\nbacktrace\nstep\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Continued (program ended)"))
        .stdout(predicate::str::contains("No stack frames."))
        .stdout(predicate::str::contains("The program has finished."));
}

#[test]
fn test_debug_step_without_trace() {
    let cwd = TempDir::new().unwrap();
    let source = create_test_file(SOURCE);
    stepscope_cmd(&cwd)
        .args(["debug", source.path().to_str().unwrap()])
        .write_stdin("step\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to run"));
}

// ── Caret tests ───────────────────────────────────────────────────────────────

#[test]
fn test_debug_run_to_position() {
    let cwd = TempDir::new().unwrap();
    let source = create_test_file(SOURCE);
    stepscope_cmd(&cwd)
        .args(["debug", source.path().to_str().unwrap()])
        .write_stdin("run 2 4\nshow\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Caret moved to offset 15 (2:4)"))
        .stdout(predicate::str::contains("let |b = f(a);"));
}

#[test]
fn test_debug_run_invalid_position() {
    let cwd = TempDir::new().unwrap();
    let source = create_test_file(SOURCE);
    stepscope_cmd(&cwd)
        .args(["debug", source.path().to_str().unwrap()])
        .write_stdin("run 40 1\nwhere\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "line 40, column 1 is not inside the source buffer",
        ))
        .stdout(predicate::str::contains("(offset 0)"))
        .stderr(predicate::str::contains("run-to request rejected").not());
}

#[test]
fn test_debug_click() {
    let cwd = TempDir::new().unwrap();
    let source = create_test_file(SOURCE);
    stepscope_cmd(&cwd)
        .args(["debug", source.path().to_str().unwrap()])
        .write_stdin("run 2 0\nclick remaining 4\nclick consumed 2\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Caret moved to offset 15 (2:4)"))
        .stdout(predicate::str::contains("Caret moved to offset 2 (1:2)"));
}

#[test]
fn test_debug_unknown_command() {
    let cwd = TempDir::new().unwrap();
    let source = create_test_file(SOURCE);
    stepscope_cmd(&cwd)
        .args(["debug", source.path().to_str().unwrap()])
        .write_stdin("frobnicate\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown command: 'frobnicate'"));
}

// ── Configuration tests ───────────────────────────────────────────────────────

#[test]
fn test_debug_project_caret_glyph() {
    let cwd = TempDir::new().unwrap();
    fs::write(
        cwd.path().join("stepscope.toml"),
        "[view]\ncaret_glyph = \"^\"\n",
    )
    .unwrap();
    let source = create_test_file(SOURCE);
    stepscope_cmd(&cwd)
        .args(["debug", source.path().to_str().unwrap()])
        .write_stdin("run 2 4\nshow\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("let ^b = f(a);"));
}

#[test]
fn test_debug_resync_on_pop_flag() {
    let cwd = TempDir::new().unwrap();
    let source = create_test_file(SOURCE);
    let trace = create_test_file(TRACE);
    debug_traced(&cwd, &source, &trace)
        .arg("--resync-on-pop")
        .write_stdin("step\nstep\nstep\nwhere\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("(offset 11)"));
}

#[test]
fn test_debug_invalid_config_falls_back() {
    let cwd = TempDir::new().unwrap();
    fs::write(cwd.path().join("stepscope.toml"), "[view]\nbogus = 1\n").unwrap();
    let source = create_test_file(SOURCE);
    stepscope_cmd(&cwd)
        .args(["debug", source.path().to_str().unwrap()])
        .write_stdin("quit\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("using default settings"));
}

#[test]
fn test_completions_bash() {
    let cwd = TempDir::new().unwrap();
    stepscope_cmd(&cwd)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stepscope"));
}
