//! Tests for `jobhook jobs`.

use crate::support::*;

#[test]
fn test_jobs_json_lists_sorted_jobs() {
    let t = Test::with_fixture();

    let output = t.jobs_json("project-a");
    assert_success(&output);

    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    assert_eq!(parsed["project"], "project-a");
    assert_eq!(parsed["jobs"], serde_json::json!(PROJECT_A_JOBS));
}

#[test]
fn test_jobs_plain_output() {
    let t = Test::with_fixture();
    let output = t.run(&["jobs", "project-b"]);
    assert_success(&output);
    assert_stdout_contains(&output, "release");
}

#[test]
fn test_jobs_unknown_project_is_empty() {
    let t = Test::with_fixture();
    let output = t.run(&["jobs", "project-z"]);
    assert_success(&output);
    assert_stdout_contains(&output, "no jobs for project-z");
}

#[test]
fn test_jobs_rejects_unsafe_project() {
    let t = Test::with_fixture();
    let output = t.run(&["jobs", "../jobs"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid project name");
}
