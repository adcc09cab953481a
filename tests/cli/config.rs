//! Settings layering: flags and environment over `jobhook.toml` over defaults.

use crate::support::*;

#[test]
fn test_config_file_sets_paths() {
    let t = Test::new();
    t.write(&t.path("jobhook.toml"), "jobs_dir = \"scripts\"\n");

    assert_success(&t.project_init("project-a", "deploy"));
    assert!(t.path("scripts/project-a/deploy.sh").is_file());
    assert!(!t.jobs_dir().exists());
}

#[test]
fn test_env_beats_config_file() {
    let t = Test::new();
    t.write(&t.path("jobhook.toml"), "jobs_dir = \"scripts\"\n");

    let output = t
        .cmd()
        .env("JOBHOOK_JOBS_DIR", "from-env")
        .args(["project", "init", "project-a"])
        .output()
        .unwrap();
    assert_success(&output);
    assert!(t.path("from-env/project-a/deploy.sh").is_file());
}

#[test]
fn test_flag_beats_env() {
    let t = Test::new();
    let output = t
        .cmd()
        .env("JOBHOOK_AUTHORIZED_TOKENS", "env-tokens")
        .args(["token", "add", "k1", "--tokens", "flag-tokens"])
        .output()
        .unwrap();
    assert_success(&output);
    assert!(t.path("flag-tokens").is_file());
    assert!(!t.path("env-tokens").exists());
}

#[test]
fn test_explicit_config_path() {
    let t = Test::new();
    t.write(&t.path("conf/custom.toml"), "tokens = \"custom-tokens\"\n");

    assert_success(&t.run(&["--config", "conf/custom.toml", "token", "add", "k1"]));
    assert!(t.path("custom-tokens").is_file());
}

#[test]
fn test_missing_explicit_config_fails() {
    let t = Test::new();
    let output = t.run(&["--config", "nope.toml", "token", "list"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "failed to read config file");
}

#[test]
fn test_unknown_config_key_fails() {
    let t = Test::new();
    t.write(&t.path("jobhook.toml"), "prot = 8080\n");
    let output = t.run(&["token", "list"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "failed to parse config file");
}
