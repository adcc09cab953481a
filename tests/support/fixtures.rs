//! Test fixtures and constants.

pub const PROJECT_A_KEY: &str = "project-a-key";
pub const PROJECT_B_KEY: &str = "project-b-key";

/// Authorized but never assigned to a project.
pub const UNASSIGNED_KEY: &str = "unassigned-key";

/// Assigned in the clients document but absent from the tokens file.
pub const REVOKED_KEY: &str = "revoked-key";

pub const STANDARD_TOKENS: &[&str] = &[PROJECT_A_KEY, PROJECT_B_KEY, UNASSIGNED_KEY];

pub const STANDARD_CLIENTS: &[(&str, &str)] = &[
    (PROJECT_A_KEY, "project-a"),
    (PROJECT_B_KEY, "project-b"),
    (REVOKED_KEY, "project-a"),
];

pub const DEPLOY_SCRIPT: &str = "#!/usr/bin/env bash\necho \"deploying ${JOB_PROJECT}\"\n";

pub const FAILING_SCRIPT: &str = "#!/usr/bin/env bash\necho \"build broke\" >&2\nexit 1\n";

pub const ENV_SCRIPT: &str = "#!/usr/bin/env bash\n\
echo \"project=${JOB_PROJECT}\"\n\
echo \"job=${JOB_NAME}\"\n\
echo \"cwd=$(pwd)\"\n\
echo \"id=${JOB_EXECUTION_ID}\"\n";

/// `(project, job, script body)` written by `Test::with_fixture`.
pub const STANDARD_JOBS: &[(&str, &str, &str)] = &[
    ("project-a", "deploy", DEPLOY_SCRIPT),
    ("project-a", "test", DEPLOY_SCRIPT),
    ("project-a", "fail", FAILING_SCRIPT),
    ("project-a", "env", ENV_SCRIPT),
    ("project-b", "deploy", DEPLOY_SCRIPT),
    ("project-b", "release", DEPLOY_SCRIPT),
];

/// Jobs of project-a, in listing order.
pub const PROJECT_A_JOBS: &[&str] = &["deploy", "env", "fail", "test"];
