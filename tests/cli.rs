use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

fn get_shred_binary() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_shred"));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn eval(source: &str, extra: &[&str]) -> Output {
    get_shred_binary()
        .arg("--color")
        .arg("never")
        .args(extra)
        .arg("-e")
        .arg(source)
        .output()
        .expect("Failed to execute shred")
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
        .join("program.shd")
}

#[test]
fn test_version_flag() {
    let output = get_shred_binary()
        .arg("--version")
        .output()
        .expect("Failed to execute shred");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("shred"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_eval_prints_to_stdout() {
    let output = eval("shout(\"hi\" + 1);", &[]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "hi1\n");
    assert!(output.stderr.is_empty());
}

#[test]
fn test_run_file() {
    let output = get_shred_binary()
        .arg(fixture("countdown"))
        .output()
        .expect("Failed to execute shred");
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "5\n4\n3\n2\n1\nliftoff\n"
    );
}

#[test]
fn test_program_from_stdin() {
    let mut child = get_shred_binary()
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn shred");

    {
        let stdin = child.stdin.as_mut().expect("Failed to open stdin");
        stdin
            .write_all(b"trick x = 2;\nshout(x + 3);\n")
            .expect("Failed to write to stdin");
    }

    let output = child.wait_with_output().expect("Failed to read output");
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "5\n");
}

#[test]
fn test_empty_stdin_is_an_error() {
    let output = get_shred_binary()
        .stdin(Stdio::null())
        .output()
        .expect("Failed to execute shred");
    assert!(!output.status.success());
    assert!(String::from_utf8(output.stderr).unwrap().contains("No input provided"));
}

#[test]
fn test_bail_is_output_with_success() {
    let output = eval("shout(1);\nbail(\"stop\");\nshout(2);", &[]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "1\nstop\n");
}

#[test]
fn test_runtime_error_exits_with_failure() {
    let output = eval("shout(1);\nx = 5;", &[]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "1\n");

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("error[E0203]: Variable 'x' is not declared"), "{}", stderr);
    assert!(stderr.contains("--> <eval>:2:1"), "{}", stderr);
}

#[test]
fn test_parse_error_runs_nothing() {
    let output = eval("shout(1);\nwibble", &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8(output.stderr).unwrap().contains("Unknown statement: wibble"));
}

#[test]
fn test_unclosed_block_warning_still_runs() {
    let output = eval("carve(1 == 1) {\nshout(\"ran\");", &[]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "ran\n");
    assert!(String::from_utf8(output.stderr).unwrap().contains("warning[W0101]"));
}

#[test]
fn test_check_mode_does_not_run() {
    let output = eval("shout(\"side effect\");", &["--check"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(!stdout.contains("side effect"));
    assert!(stdout.contains("1 top-level statement(s), no errors"));
}

#[test]
fn test_dump_env() {
    let output = eval("trick x = 5;\ntrick s = \"hi\";\ntrick b = 1 < 2;", &["--dump-env"]);
    assert!(output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert_eq!(stderr, "x = 5 (integer)\ns = hi (string)\nb = True (boolean)\n");
}

#[test]
fn test_output_file() {
    let out_path = std::env::temp_dir().join(format!("shred_cli_out_{}.txt", std::process::id()));
    let output = eval("shout(\"to file\");", &["--out", out_path.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let written = std::fs::read_to_string(&out_path).expect("output file should exist");
    let _ = std::fs::remove_file(&out_path);
    assert_eq!(written, "to file\n");
}

#[test]
fn test_file_conflicts_with_eval() {
    let output = get_shred_binary()
        .arg(fixture("hello"))
        .arg("-e")
        .arg("shout(1)")
        .output()
        .expect("Failed to execute shred");
    assert!(!output.status.success());
}

#[test]
fn test_missing_file() {
    let output = get_shred_binary()
        .arg("--color")
        .arg("never")
        .arg("does/not/exist.shd")
        .output()
        .expect("Failed to execute shred");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8(output.stderr).unwrap().contains("Failed to read does/not/exist.shd"));
}

#[test]
fn test_completions() {
    let output = get_shred_binary()
        .arg("complete")
        .arg("bash")
        .output()
        .expect("Failed to execute shred");
    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout).unwrap().contains("shred"));
}
