//! Jobs command - list a project's runnable jobs.

use serde_json::json;

use crate::cli::output;
use crate::core::catalog::JobCatalog;
use crate::core::config::Settings;
use crate::core::validation;
use crate::error::Result;

/// List the jobs of a project.
pub fn execute(settings: &Settings, project: &str, json: bool) -> Result<()> {
    validation::validate_project(project)?;
    let jobs = JobCatalog::new(&settings.jobs_dir).list_jobs(project);

    if json {
        let value = json!({ "project": project, "jobs": jobs });
        output::data(&serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if jobs.is_empty() {
        output::dimmed(&format!("no jobs for {}", project));
    } else {
        output::header(project);
        for job in &jobs {
            output::list_item(job);
        }
    }
    Ok(())
}
