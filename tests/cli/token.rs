//! Tests for `jobhook token add/list/rm`.

use jobhook::core::credentials::fingerprint;

use crate::support::*;

#[test]
fn test_token_add_creates_file() {
    let t = Test::new();

    let output = t.token_add("ci-runner-key");
    assert_success(&output);
    assert_stdout_contains(&output, &fingerprint("ci-runner-key"));
    assert_stdout_excludes(&output, "ci-runner-key");

    assert!(t.read("config/authorized_tokens").contains("ci-runner-key\n"));
}

#[test]
fn test_token_add_twice_is_noop() {
    let t = Test::new();
    assert_success(&t.token_add("ci-runner-key"));

    let output = t.token_add("ci-runner-key");
    assert_success(&output);
    assert_stderr_contains(&output, "already authorized");
    assert_eq!(t.read("config/authorized_tokens").matches("ci-runner-key").count(), 1);
}

#[test]
fn test_token_add_rejects_blank() {
    let t = Test::new();
    let output = t.token_add("   ");
    assert_failure(&output);
    assert_stderr_contains(&output, "token cannot be empty");
}

#[test]
fn test_token_list_json_shows_fingerprints() {
    let t = Test::with_fixture();

    let output = t.token_list_json();
    assert_success(&output);

    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    assert_eq!(parsed["count"], 3);
    let tokens = parsed["tokens"].as_array().unwrap();
    assert!(tokens.contains(&serde_json::json!(fingerprint(PROJECT_A_KEY))));
    assert_stdout_excludes(&output, PROJECT_A_KEY);
}

#[test]
fn test_token_list_empty() {
    let t = Test::new();
    let output = t.run(&["token", "list"]);
    assert_success(&output);
    assert_stdout_contains(&output, "no tokens authorized");
}

#[test]
fn test_token_rm_keeps_comments() {
    let t = Test::with_fixture();

    let output = t.token_rm(PROJECT_B_KEY);
    assert_success(&output);

    let contents = t.read("config/authorized_tokens");
    assert!(contents.starts_with("# authorized webhook tokens\n"));
    assert!(!contents.contains(PROJECT_B_KEY));
    assert!(contents.contains(PROJECT_A_KEY));
}

#[test]
fn test_token_rm_unknown() {
    let t = Test::with_fixture();
    let output = t.token_rm("nope");
    assert_success(&output);
    assert_stderr_contains(&output, "was not authorized");
}

#[test]
fn test_token_rm_rejects_blank() {
    let t = Test::with_fixture();
    let before = t.read("config/authorized_tokens");

    let output = t.token_rm("   ");
    assert_failure(&output);
    assert_stderr_contains(&output, "token cannot be empty");

    let output = t.token_rm("# authorized webhook tokens");
    assert_success(&output);
    assert_stderr_contains(&output, "was not authorized");

    assert_eq!(t.read("config/authorized_tokens"), before);
}
