//! Project assignment commands.

use serde_json::json;

use crate::cli::output;
use crate::core::catalog::JobCatalog;
use crate::core::config::Settings;
use crate::core::credentials;
use crate::core::directory::ProjectDirectory;
use crate::error::Result;

/// Assign a token to a project.
pub fn assign(settings: &Settings, token: &str, project: &str, description: &str) -> Result<()> {
    let directory = ProjectDirectory::load(&settings.clients)?;
    let previous = directory.get_project(token);
    directory.assign(token, project, description)?;

    let fingerprint = credentials::fingerprint(token.trim());
    match previous {
        Some(old) if old != project => output::success(&format!(
            "token {} moved from {} to {}",
            fingerprint, old, project
        )),
        _ => output::success(&format!("token {} assigned to {}", fingerprint, project)),
    }

    let tokens = credentials::load(&settings.tokens)?;
    if !credentials::verify(token, &tokens) {
        output::hint("token is not authorized yet, run: jobhook token add <TOKEN>");
    }
    if JobCatalog::new(&settings.jobs_dir).project_dir(project).is_none() {
        output::hint(&format!("no jobs yet, run: jobhook project init {}", project));
    }
    Ok(())
}

/// Remove a token's assignment.
pub fn rm(settings: &Settings, token: &str) -> Result<()> {
    let directory = ProjectDirectory::load(&settings.clients)?;
    let fingerprint = credentials::fingerprint(token.trim());
    if directory.remove(token)? {
        output::success(&format!("assignment for {} removed", fingerprint));
    } else {
        output::warn(&format!("token {} has no assignment", fingerprint));
    }
    Ok(())
}

/// List assignments.
pub fn list(settings: &Settings, json: bool) -> Result<()> {
    let directory = ProjectDirectory::load(&settings.clients)?;
    let entries = directory.list();

    if json {
        let clients: Vec<_> = entries
            .iter()
            .map(|(token, assignment)| {
                json!({
                    "fingerprint": credentials::fingerprint(token),
                    "project": assignment.project,
                    "description": assignment.description,
                })
            })
            .collect();
        output::data(&serde_json::to_string_pretty(&json!({ "clients": clients }))?);
        return Ok(());
    }

    if entries.is_empty() {
        output::dimmed("no projects assigned");
        return Ok(());
    }

    output::header(&format!("{} assignments", entries.len()));
    for (token, assignment) in &entries {
        let line = if assignment.description.is_empty() {
            format!("{}  {}", credentials::fingerprint(token), assignment.project)
        } else {
            format!(
                "{}  {}  ({})",
                credentials::fingerprint(token),
                assignment.project,
                assignment.description
            )
        };
        output::list_item(&line);
    }
    Ok(())
}

/// Scaffold a project directory with one job script.
pub fn init(settings: &Settings, project: &str, job: &str) -> Result<()> {
    let path = JobCatalog::new(&settings.jobs_dir).scaffold(project, job)?;
    output::success(&format!("created {}", output::path(&path)));
    Ok(())
}
