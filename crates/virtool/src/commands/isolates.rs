//! Isolate command handlers.
//!
//! Isolates live inside their OTU document, so listing fetches the OTU.

use tabled::Tabled;

use virtool_core::model::{Isolate, IsolateFields};
use virtool_core::{Request, Response, Session};

use crate::cli::{GlobalOpts, IsolateFieldArgs, IsolatesArgs, IsolatesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct IsolateRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Default")]
    default: String,
    #[tabled(rename = "Sequences")]
    sequences: usize,
}

impl From<&Isolate> for IsolateRow {
    fn from(i: &Isolate) -> Self {
        Self {
            id: i.id.clone(),
            name: i.display_name(),
            default: if i.default { "yes" } else { "" }.into(),
            sequences: i.sequences.len(),
        }
    }
}

fn detail(i: &Isolate) -> String {
    [
        format!("ID:        {}", i.id),
        format!("Name:      {}", i.display_name()),
        format!("Default:   {}", i.default),
        format!("Sequences: {}", i.sequences.len()),
    ]
    .join("\n")
}

fn fields(args: IsolateFieldArgs) -> IsolateFields {
    IsolateFields {
        source_type: args.source_type.to_lowercase(),
        source_name: args.source_name,
    }
}

fn show_response(global: &GlobalOpts, response: &Response) {
    if let Response::Isolate(isolate) = response {
        let out = output::render_single(&global.output, isolate, detail, |i| i.id.clone());
        output::print_output(&out, global.quiet);
    }
}

pub async fn handle(
    session: &Session,
    args: IsolatesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        IsolatesCommand::List { otu } => {
            session.execute(Request::GetOtu { otu_id: otu.clone() }).await?;
            let state = session.state();
            let found = state
                .otus
                .list
                .detail
                .as_ref()
                .ok_or(CliError::NotFound { message: otu })?;
            let out = output::render_list(
                &global.output,
                &found.isolates,
                |i| IsolateRow::from(i),
                |i| i.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        IsolatesCommand::Add { otu, fields: args } => {
            let response = session
                .execute(Request::AddIsolate {
                    otu_id: otu.clone(),
                    isolate: fields(args),
                })
                .await?;
            show_response(global, &response);
            output::done(global, &format!("Isolate added to OTU {otu}"));
            Ok(())
        }

        IsolatesCommand::Edit {
            otu,
            isolate,
            fields: args,
        } => {
            let response = session
                .execute(Request::EditIsolate {
                    otu_id: otu,
                    isolate_id: isolate.clone(),
                    isolate: fields(args),
                })
                .await?;
            show_response(global, &response);
            output::done(global, &format!("Isolate {isolate} updated"));
            Ok(())
        }

        IsolatesCommand::SetDefault { otu, isolate } => {
            session
                .execute(Request::SetIsolateAsDefault {
                    otu_id: otu.clone(),
                    isolate_id: isolate.clone(),
                })
                .await?;
            output::done(global, &format!("Isolate {isolate} is now the default for {otu}"));
            Ok(())
        }

        IsolatesCommand::Remove { otu, isolate } => {
            if !util::confirm(&format!("Remove isolate {isolate}?"), global)? {
                return Ok(());
            }
            session
                .execute(Request::RemoveIsolate {
                    otu_id: otu,
                    isolate_id: isolate.clone(),
                })
                .await?;
            output::done(global, &format!("Isolate {isolate} removed"));
            Ok(())
        }
    }
}
