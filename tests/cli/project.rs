//! Tests for `jobhook project assign/rm/list/init`.

use jobhook::core::credentials::fingerprint;

use crate::support::*;

fn clients(t: &Test) -> serde_json::Value {
    serde_json::from_str(&t.read("config/clients.json")).expect("valid clients document")
}

#[test]
fn test_assign_writes_clients_document() {
    let t = Test::new();

    let output = t.run(&[
        "project",
        "assign",
        "ci-runner-key",
        "project-a",
        "--description",
        "main CI",
    ]);
    assert_success(&output);

    let doc = clients(&t);
    assert_eq!(doc["clients"]["ci-runner-key"]["project"], "project-a");
    assert_eq!(doc["clients"]["ci-runner-key"]["description"], "main CI");
}

#[test]
fn test_reassign_is_last_write_wins() {
    let t = Test::with_fixture();

    let output = t.project_assign(PROJECT_A_KEY, "project-b");
    assert_success(&output);
    assert_stdout_contains(&output, "moved from project-a to project-b");

    let doc = clients(&t);
    assert_eq!(doc["clients"][PROJECT_A_KEY]["project"], "project-b");
    assert_eq!(doc["clients"].as_object().unwrap().len(), 3);
}

#[test]
fn test_assign_rejects_unsafe_project() {
    let t = Test::new();
    let output = t.project_assign("ci-runner-key", "../etc");
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid project name");
    assert!(!t.clients_path().exists());
}

#[test]
fn test_assign_hints_for_unauthorized_token() {
    let t = Test::with_fixture();
    let output = t.project_assign("brand-new-key", "project-a");
    assert_success(&output);
    assert_stderr_contains(&output, "jobhook token add");
}

#[test]
fn test_rm_assignment() {
    let t = Test::with_fixture();

    assert_success(&t.project_rm(PROJECT_B_KEY));
    assert!(clients(&t)["clients"].get(PROJECT_B_KEY).is_none());

    let output = t.project_rm(PROJECT_B_KEY);
    assert_success(&output);
    assert_stderr_contains(&output, "has no assignment");
}

#[test]
fn test_rm_missing_entry_does_not_rewrite() {
    let t = Test::with_fixture();
    let before = t.read("config/clients.json");
    t.write(&t.clients_path(), &format!("{}\n\n", before));

    assert_success(&t.project_rm("nope"));
    assert_eq!(t.read("config/clients.json"), format!("{}\n\n", before));
}

#[test]
fn test_list_json_uses_fingerprints() {
    let t = Test::with_fixture();

    let output = t.project_list_json();
    assert_success(&output);
    assert_stdout_excludes(&output, PROJECT_A_KEY);

    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    let entries = parsed["clients"].as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert!(entries.iter().any(|e| {
        e["fingerprint"] == fingerprint(PROJECT_A_KEY) && e["project"] == "project-a"
    }));
}

#[test]
fn test_list_malformed_document_fails() {
    let t = Test::new();
    t.write(&t.clients_path(), "{ not json");

    let output = t.run(&["project", "list"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "malformed clients document");
}

#[test]
fn test_init_scaffolds_executable_job() {
    let t = Test::new();

    let output = t.project_init("project-c", "release");
    assert_success(&output);

    let script = t.jobs_dir().join("project-c").join("release.sh");
    assert!(script.is_file());
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&script).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    let output = t.project_init("project-c", "release");
    assert_failure(&output);
    assert_stderr_contains(&output, "already exists");
}
