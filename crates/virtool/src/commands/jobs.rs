//! Job command handlers.

use tabled::Tabled;

use virtool_core::model::Job;
use virtool_core::{Request, Response, Session};

use crate::cli::{GlobalOpts, JobFilter, JobsArgs, JobsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct JobRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Task")]
    task: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Stage")]
    stage: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "Created")]
    created: String,
}

fn percent(progress: Option<f64>) -> String {
    progress.map_or_else(|| "-".into(), |p| format!("{:.0}%", p * 100.0))
}

impl JobRow {
    fn new(j: &Job, color: bool) -> Self {
        Self {
            id: j.id.clone(),
            task: j.task.clone(),
            state: output::job_state(j.state.as_deref(), color),
            stage: j.stage.clone().unwrap_or_default(),
            progress: percent(j.progress),
            created: output::date(j.created_at.as_deref()),
        }
    }
}

fn detail(j: &Job) -> String {
    [
        format!("ID:       {}", j.id),
        format!("Task:     {}", j.task),
        format!("State:    {}", j.state.as_deref().unwrap_or("-")),
        format!("Stage:    {}", j.stage.as_deref().unwrap_or("-")),
        format!("Progress: {}", percent(j.progress)),
        format!("Created:  {}", output::date(j.created_at.as_deref())),
        format!("User:     {}", j.user.as_ref().map_or("-", |u| u.id.as_str())),
    ]
    .join("\n")
}

pub async fn handle(
    session: &Session,
    args: JobsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        JobsCommand::List(find) => {
            session
                .execute(Request::FindJobs(util::find_query(&find)))
                .await?;
            let state = session.state();
            let documents = state.jobs.documents.as_deref().unwrap_or_default();
            let out = output::render_list(
                &global.output,
                documents,
                |j| JobRow::new(j, color),
                |j| j.id.clone(),
            );
            output::print_output(&out, global.quiet);
            util::print_cursor(state.jobs.cursor, global);
            Ok(())
        }

        JobsCommand::Get { id } => {
            session
                .execute(Request::GetJob { job_id: id.clone() })
                .await?;
            let state = session.state();
            let job = state
                .jobs
                .detail
                .as_ref()
                .ok_or(CliError::NotFound { message: id })?;
            let out = output::render_single(&global.output, job, detail, |j| j.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        JobsCommand::Cancel { id } => {
            if !util::confirm(&format!("Cancel job {id}?"), global)? {
                return Ok(());
            }
            session
                .execute(Request::CancelJob { job_id: id.clone() })
                .await?;
            output::done(global, &format!("Job {id} cancelled"));
            Ok(())
        }

        JobsCommand::Remove { id } => {
            session
                .execute(Request::RemoveJob { job_id: id.clone() })
                .await?;
            output::done(global, &format!("Job {id} removed"));
            Ok(())
        }

        JobsCommand::Clear { filter } => {
            let filter = filter.map(|f| {
                match f {
                    JobFilter::Finished => "finished",
                    JobFilter::Complete => "complete",
                    JobFilter::Failed => "failed",
                }
                .to_owned()
            });
            let what = filter.as_deref().unwrap_or("finished");
            if !util::confirm(&format!("Remove all {what} jobs?"), global)? {
                return Ok(());
            }
            let response = session.execute(Request::ClearJobs { filter }).await?;
            if let Response::JobsCleared(removed) = response {
                output::done(global, &format!("Removed {} jobs", removed.len()));
            }
            Ok(())
        }
    }
}
