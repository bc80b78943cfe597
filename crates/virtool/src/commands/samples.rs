//! Sample command handlers.

use tabled::Tabled;

use virtool_core::model::{Sample, SampleCreate, SampleUpdate};
use virtool_core::{Request, Response, Session};

use crate::cli::{GlobalOpts, SamplesArgs, SamplesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct SampleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Ready")]
    ready: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl SampleRow {
    fn new(s: &Sample, color: bool) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            host: s.host.clone(),
            ready: output::flag(s.ready, color),
            created: output::date(s.created_at.as_deref()),
        }
    }
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

fn detail(s: &Sample) -> String {
    [
        format!("ID:      {}", s.id),
        format!("Name:    {}", s.name),
        format!("Host:    {}", or_dash(&s.host)),
        format!("Isolate: {}", or_dash(&s.isolate)),
        format!("Locale:  {}", or_dash(&s.locale)),
        format!("Ready:   {}", output::flag(s.ready, false)),
        format!("Created: {}", output::date(s.created_at.as_deref())),
        format!("User:    {}", s.user.as_ref().map_or("-", |u| u.id.as_str())),
    ]
    .join("\n")
}

fn show(global: &GlobalOpts, sample: &Sample) {
    let out = output::render_single(&global.output, sample, detail, |s| s.id.clone());
    output::print_output(&out, global.quiet);
}

pub async fn handle(
    session: &Session,
    args: SamplesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        SamplesCommand::List(find) => {
            session
                .execute(Request::FindSamples(util::find_query(&find)))
                .await?;
            let state = session.state();
            let documents = state.samples.documents.as_deref().unwrap_or_default();
            let out = output::render_list(
                &global.output,
                documents,
                |s| SampleRow::new(s, color),
                |s| s.id.clone(),
            );
            output::print_output(&out, global.quiet);
            util::print_cursor(state.samples.cursor, global);
            Ok(())
        }

        SamplesCommand::Get { id } => {
            session
                .execute(Request::GetSample {
                    sample_id: id.clone(),
                })
                .await?;
            let state = session.state();
            let sample = state
                .samples
                .detail
                .as_ref()
                .ok_or(CliError::NotFound { message: id })?;
            show(global, sample);
            Ok(())
        }

        SamplesCommand::Create {
            name,
            host,
            isolate,
            locale,
            subtraction,
            files,
        } => {
            let response = session
                .execute(Request::CreateSample(SampleCreate {
                    name,
                    host,
                    isolate,
                    locale,
                    subtraction,
                    files,
                }))
                .await?;
            if let Response::Sample(created) = response {
                if let Some(sample) = session.state().samples.get(&created.id) {
                    show(global, sample);
                }
                output::done(global, &format!("Sample '{}' created", created.name));
            }
            Ok(())
        }

        SamplesCommand::Edit {
            id,
            name,
            host,
            isolate,
            locale,
        } => {
            let changes = SampleUpdate {
                name,
                host,
                isolate,
                locale,
            };
            session
                .execute(Request::EditSample {
                    sample_id: id.clone(),
                    changes,
                })
                .await?;
            if let Some(sample) = session.state().samples.get(&id) {
                show(global, sample);
            }
            output::done(global, &format!("Sample {id} updated"));
            Ok(())
        }

        SamplesCommand::Remove { id } => {
            if !util::confirm(&format!("Remove sample {id}?"), global)? {
                return Ok(());
            }
            session
                .execute(Request::RemoveSample {
                    sample_id: id.clone(),
                })
                .await?;
            output::done(global, &format!("Sample {id} removed"));
            Ok(())
        }
    }
}
