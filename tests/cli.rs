use assert_cmd::Command;

fn stderr_of(args: &[&str]) -> (bool, String) {
    let output = Command::cargo_bin("retype")
        .unwrap()
        .args(args)
        .output()
        .unwrap();
    (
        output.status.success(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    )
}

#[test]
fn missing_file_is_reported_before_the_terminal_is_touched() {
    let (ok, stderr) = stderr_of(&["-f", "/nonexistent/retype-input.txt"]);
    assert!(!ok);
    assert!(stderr.contains("cannot read reference file"), "{stderr}");
}

#[test]
fn empty_prompt_is_rejected() {
    let (ok, stderr) = stderr_of(&["-p", ""]);
    assert!(!ok);
    assert!(stderr.contains("reference text is empty"), "{stderr}");
}

#[test]
fn zero_seconds_is_rejected() {
    let (ok, stderr) = stderr_of(&["-s", "0", "-p", "hi"]);
    assert!(!ok);
    assert!(stderr.contains("0"), "{stderr}");
}

#[test]
fn unusable_log_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "").unwrap();
    let log = blocker.join("retype.log");

    let (ok, stderr) = stderr_of(&["--log-file", log.to_str().unwrap(), "-p", "hi"]);
    assert!(!ok);
    assert!(stderr.contains("cannot open log file"), "{stderr}");
}

#[test]
fn refuses_to_run_without_a_tty() {
    let (ok, stderr) = stderr_of(&["-p", "hi"]);
    assert!(!ok);
    assert!(stderr.contains("stdin must be a tty"), "{stderr}");
}

#[test]
fn help_lists_the_sources() {
    let output = Command::cargo_bin("retype")
        .unwrap()
        .arg("--help")
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("--file"));
    assert!(stdout.contains("--prompt"));
    assert!(stdout.contains("--word-list"));
}
