//! Startup validation, help and completions.

use predicates::prelude::*;

use crate::support::*;

#[test]
fn test_serve_rejects_port_zero() {
    let t = Test::new();
    let output = t.run(&["serve", "--port", "0"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid value for port");
    assert_stderr_contains(&output, "JOBHOOK_PORT");
}

#[test]
fn test_serve_rejects_port_out_of_range() {
    let t = Test::new();
    let output = t
        .cmd()
        .env("JOBHOOK_PORT", "70000")
        .arg("serve")
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid value for port");
}

#[test]
fn test_serve_rejects_bad_port_in_config() {
    let t = Test::new();
    t.write(&t.path("jobhook.toml"), "port = 99999\n");
    let output = t.run(&["serve"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid value for port");
}

#[test]
fn test_serve_rejects_bad_host() {
    let t = Test::new();
    let output = t.run(&["serve", "--host", "not-an-address"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid value for host");
}

#[test]
fn test_help_lists_commands() {
    let t = Test::new();
    let output = t.run(&["--help"]);
    assert_success(&output);
    for command in ["serve", "keygen", "token", "project", "jobs", "completions"] {
        assert_stdout_contains(&output, command);
    }
}

#[test]
fn test_version() {
    let t = Test::new();
    let output = t.run(&["--version"]);
    assert_success(&output);
    assert_stdout_contains(&output, env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_completions() {
    let t = Test::new();
    let output = t.run(&["completions", "bash"]);
    assert_success(&output);
    assert_stdout_contains(&output, "jobhook");
}

#[test]
fn test_completions_zsh() {
    let t = Test::new();
    t.cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef jobhook"));
}

#[test]
fn test_unknown_subcommand_fails() {
    let t = Test::new();
    t.cmd()
        .arg("deploy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}
