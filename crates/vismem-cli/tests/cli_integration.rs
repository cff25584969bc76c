//! CLI integration tests — run the actual vismem binary against a live
//! backend. Marked `#[ignore]` to skip in normal `cargo test`.

use std::process::Command;

fn vismem() -> Command {
    Command::new(env!("CARGO_BIN_EXE_vismem"))
}

// `suggest` is fully client-side, so it works without a backend and is
// not ignored.
#[test]
fn test_cli_suggest_output() {
    let output = vismem()
        .args(["suggest", "login"])
        .output()
        .expect("failed to execute");
    assert!(
        output.status.success(),
        "vismem suggest failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("login form"));
}

#[test]
fn test_cli_suggest_no_matches() {
    let output = vismem()
        .args(["suggest", "zzzz"])
        .output()
        .expect("failed to execute");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No suggestions"));
}

#[test]
fn test_cli_search_rejects_unknown_sort_key() {
    let output = vismem()
        .args(["search", "login", "--sort", "size"])
        .output()
        .expect("failed to execute");
    assert!(!output.status.success(), "unknown sort key should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown sort key"));
}

#[test]
#[ignore]
fn test_cli_list_json() {
    let output = vismem()
        .args(["list", "--json"])
        .output()
        .expect("failed to execute");
    assert!(
        output.status.success(),
        "vismem list failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    let _: Vec<serde_json::Value> =
        serde_json::from_str(stdout.trim()).expect("invalid JSON output");
}

#[test]
#[ignore]
fn test_cli_search_json() {
    let output = vismem()
        .args(["search", "login page", "--json"])
        .output()
        .expect("failed to execute");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let _: Vec<serde_json::Value> =
        serde_json::from_str(stdout.trim()).expect("invalid JSON output");
}

#[test]
#[ignore]
fn test_cli_migrate() {
    let output = vismem().arg("migrate").output().expect("failed to execute");
    assert!(
        output.status.success(),
        "vismem migrate failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}
