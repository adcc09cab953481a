//! Authorization Pipeline.
//!
//! Three gates run strictly in order, each failing fast with its own
//! [`AuthError`]:
//!
//! 1. [`authenticate`]: a token is present and in the Credential Store.
//! 2. [`scope_project`]: the requested project equals the caller's
//!    assigned project.
//! 3. [`validate_job`]: the requested job exists in that project.
//!
//! Gates are pure functions of the request parameters and the stores, which
//! are reached through the traits below so tests can supply fakes.
//!
//! Parameters resolve by source priority: body, then query, then headers.
//! An empty value at a higher-priority source falls through to the next.

use std::collections::HashMap;

use tracing::debug;

use crate::core::catalog::JobCatalog;
use crate::core::constants::{BEARER_PREFIX, TOKEN_FIELD};
use crate::core::credentials::{fingerprint, CredentialStore};
use crate::core::directory::ProjectDirectory;
use crate::core::types::{JobName, ProjectName, Token};
use crate::error::{AuthError, Parameter};

/// Answers whether a presented token is authorized.
pub trait TokenVerifier {
    fn verify(&self, token: &str) -> bool;
}

/// Answers which project a caller is assigned to.
pub trait ProjectLookup {
    fn project_for(&self, caller: &str) -> Option<ProjectName>;
}

/// Answers which jobs a project has.
pub trait JobLookup {
    fn job_exists(&self, project: &str, job: &str) -> bool;
    fn list_jobs(&self, project: &str) -> Vec<JobName>;
}

impl TokenVerifier for CredentialStore {
    fn verify(&self, token: &str) -> bool {
        CredentialStore::verify(self, token)
    }
}

impl ProjectLookup for ProjectDirectory {
    fn project_for(&self, caller: &str) -> Option<ProjectName> {
        self.get_project(caller)
    }
}

impl JobLookup for JobCatalog {
    fn job_exists(&self, project: &str, job: &str) -> bool {
        JobCatalog::job_exists(self, project, job)
    }

    fn list_jobs(&self, project: &str) -> Vec<JobName> {
        JobCatalog::list_jobs(self, project)
    }
}

/// Request-derived facts the gates read from.
///
/// Built by the HTTP boundary; holds only string-valued fields.
#[derive(Debug, Clone, Default)]
pub struct RequestParams {
    pub body: HashMap<String, String>,
    pub query: HashMap<String, String>,
    /// Value of the dedicated token header.
    pub token_header: Option<String>,
    /// Value of the `Authorization` header.
    pub authorization: Option<String>,
}

impl RequestParams {
    /// Resolve a parameter from body, then query.
    pub fn param(&self, name: &str) -> Option<&str> {
        first_present([
            self.body.get(name).map(String::as_str),
            self.query.get(name).map(String::as_str),
        ])
    }

    /// Resolve the caller token from body, query, token header, then a
    /// `Bearer ` authorization header.
    pub fn token(&self) -> Option<&str> {
        first_present([
            self.body.get(TOKEN_FIELD).map(String::as_str),
            self.query.get(TOKEN_FIELD).map(String::as_str),
            self.token_header.as_deref(),
            self.authorization.as_deref().and_then(bearer_token),
        ])
    }
}

/// Extract the token from an `Authorization: Bearer <token>` value.
///
/// Anything without the exact `Bearer ` prefix yields `None`.
pub fn bearer_token(value: &str) -> Option<&str> {
    value.strip_prefix(BEARER_PREFIX)
}

fn first_present<'a, const N: usize>(sources: [Option<&'a str>; N]) -> Option<&'a str> {
    sources.into_iter().flatten().find(|v| !v.is_empty())
}

/// Caller identity attached after the first gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    token: Token,
}

impl Caller {
    /// The raw token as presented.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Log-safe identifier.
    pub fn fingerprint(&self) -> String {
        fingerprint(&self.token)
    }
}

/// Everything a request carries once all three gates pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorized {
    pub caller: Caller,
    pub project: ProjectName,
    pub job: JobName,
}

/// Gate 1: find a token and check it against the Credential Store.
///
/// # Errors
///
/// `AuthError::NoToken` if no source carries a token,
/// `AuthError::InvalidToken` if the token is not authorized.
pub fn authenticate(
    params: &RequestParams,
    tokens: &dyn TokenVerifier,
) -> Result<Caller, AuthError> {
    let token = params.token().ok_or(AuthError::NoToken)?;
    if !tokens.verify(token) {
        debug!(client = %fingerprint(token), "rejected unknown token");
        return Err(AuthError::InvalidToken);
    }
    Ok(Caller {
        token: token.to_string(),
    })
}

/// Look up the caller's assigned project.
///
/// # Errors
///
/// `AuthError::NoProjectAssigned` if the caller has no assignment.
pub fn assigned_project(
    caller: &Caller,
    directory: &dyn ProjectLookup,
) -> Result<ProjectName, AuthError> {
    directory
        .project_for(caller.token())
        .ok_or(AuthError::NoProjectAssigned)
}

/// Gate 2: the requested project must be the caller's assigned project.
///
/// # Errors
///
/// `AuthError::NoProjectAssigned`, `AuthError::MissingParameter(Project)`,
/// or `AuthError::ProjectForbidden` carrying both names.
pub fn scope_project(
    caller: &Caller,
    params: &RequestParams,
    directory: &dyn ProjectLookup,
) -> Result<ProjectName, AuthError> {
    let assigned = assigned_project(caller, directory)?;
    let requested = params
        .param("project")
        .ok_or(AuthError::MissingParameter(Parameter::Project))?;

    if requested != assigned {
        debug!(
            client = %caller.fingerprint(),
            requested,
            assigned = %assigned,
            "project outside caller scope"
        );
        return Err(AuthError::ProjectForbidden {
            requested: requested.to_string(),
            assigned,
        });
    }
    Ok(assigned)
}

/// Gate 3: the requested job must exist in the scoped project.
///
/// # Errors
///
/// `AuthError::MissingParameter(Job)`, or `AuthError::JobNotFound` carrying
/// the project's current job listing.
pub fn validate_job(
    project: &str,
    params: &RequestParams,
    jobs: &dyn JobLookup,
) -> Result<JobName, AuthError> {
    let job = params
        .param("job")
        .ok_or(AuthError::MissingParameter(Parameter::Job))?;

    if !jobs.job_exists(project, job) {
        return Err(AuthError::JobNotFound {
            project: project.to_string(),
            job: job.to_string(),
            available: jobs.list_jobs(project),
        });
    }
    Ok(job.to_string())
}

/// Run all three gates in order.
///
/// # Errors
///
/// Returns the first gate failure.
pub fn authorize(
    params: &RequestParams,
    tokens: &dyn TokenVerifier,
    directory: &dyn ProjectLookup,
    jobs: &dyn JobLookup,
) -> Result<Authorized, AuthError> {
    let caller = authenticate(params, tokens)?;
    let project = scope_project(&caller, params, directory)?;
    let job = validate_job(&project, params, jobs)?;
    Ok(Authorized {
        caller,
        project,
        job,
    })
}
