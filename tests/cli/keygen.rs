//! Tests for `jobhook keygen`.

use crate::support::*;

#[test]
fn test_keygen_writes_key_pair() {
    let t = Test::new();

    let output = t.keygen();
    assert_success(&output);

    let public = t.read("keys/server.pub");
    assert!(public.starts_with("age1"));
    assert_stdout_contains(&output, public.trim());

    let private = t.read("keys/server.key");
    assert!(private.starts_with("AGE-SECRET-KEY-"));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(t.private_key_path())
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

#[test]
fn test_keygen_refuses_to_overwrite() {
    let t = Test::new();
    assert_success(&t.keygen());
    let before = t.read("keys/server.pub");

    let output = t.keygen();
    assert_failure(&output);
    assert_stderr_contains(&output, "already exists");
    assert_eq!(t.read("keys/server.pub"), before);

    let output = t.run(&["keygen", "--force"]);
    assert_success(&output);
    assert_ne!(t.read("keys/server.pub"), before);
}

#[test]
fn test_keygen_custom_paths() {
    let t = Test::new();
    let output = t.run(&[
        "keygen",
        "--public-key",
        "custom/pub.txt",
        "--private-key",
        "custom/key.txt",
    ]);
    assert_success(&output);
    assert!(t.path("custom/pub.txt").is_file());
    assert!(t.path("custom/key.txt").is_file());
    assert!(!t.public_key_path().exists());
}
