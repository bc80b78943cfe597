//! Analysis command handlers.

use tabled::Tabled;

use virtool_core::model::Analysis;
use virtool_core::{Request, Response, Session};

use crate::cli::{AnalysesArgs, AnalysesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct AnalysisRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Workflow")]
    algorithm: String,
    #[tabled(rename = "Reference")]
    reference: String,
    #[tabled(rename = "Ready")]
    ready: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl AnalysisRow {
    fn new(a: &Analysis, color: bool) -> Self {
        Self {
            id: a.id.clone(),
            algorithm: a.algorithm.clone(),
            reference: a
                .reference
                .as_ref()
                .map(|r| r.name.clone().unwrap_or_else(|| r.id.clone()))
                .unwrap_or_default(),
            ready: output::flag(a.ready, color),
            created: output::date(a.created_at.as_deref()),
        }
    }
}

fn detail(a: &Analysis) -> String {
    [
        format!("ID:        {}", a.id),
        format!("Workflow:  {}", a.algorithm),
        format!("Sample:    {}", a.sample.as_ref().map_or("-", |s| s.id.as_str())),
        format!(
            "Reference: {}",
            a.reference.as_ref().map_or("-", |r| r.id.as_str())
        ),
        format!("Ready:     {}", output::flag(a.ready, false)),
        format!("Created:   {}", output::date(a.created_at.as_deref())),
    ]
    .join("\n")
}

pub async fn handle(
    session: &Session,
    args: AnalysesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        AnalysesCommand::List { sample, page } => {
            session
                .execute(Request::FindAnalyses {
                    sample_id: sample,
                    page,
                })
                .await?;
            let state = session.state();
            let documents = state.analyses.documents.as_deref().unwrap_or_default();
            let out = output::render_list(
                &global.output,
                documents,
                |a| AnalysisRow::new(a, color),
                |a| a.id.clone(),
            );
            output::print_output(&out, global.quiet);
            util::print_cursor(state.analyses.cursor, global);
            Ok(())
        }

        AnalysesCommand::Get { id } => {
            session
                .execute(Request::GetAnalysis {
                    analysis_id: id.clone(),
                })
                .await?;
            let state = session.state();
            let analysis = state
                .analyses
                .detail
                .as_ref()
                .ok_or(CliError::NotFound { message: id })?;
            let out = output::render_single(&global.output, analysis, detail, |a| a.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AnalysesCommand::Create {
            sample,
            algorithm,
            reference,
        } => {
            let response = session
                .execute(Request::Analyze {
                    sample_id: sample.clone(),
                    algorithm: algorithm.clone(),
                    ref_id: reference,
                })
                .await?;
            if let Response::Analysis(started) = &response {
                let out =
                    output::render_single(&global.output, started, detail, |a| a.id.clone());
                output::print_output(&out, global.quiet);
            }
            output::done(global, &format!("{algorithm} analysis started on sample {sample}"));
            Ok(())
        }

        AnalysesCommand::Remove { id } => {
            if !util::confirm(&format!("Remove analysis {id}?"), global)? {
                return Ok(());
            }
            session
                .execute(Request::RemoveAnalysis {
                    analysis_id: id.clone(),
                })
                .await?;
            output::done(global, &format!("Analysis {id} removed"));
            Ok(())
        }
    }
}
