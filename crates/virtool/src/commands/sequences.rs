//! Sequence command handlers.

use tabled::Tabled;

use virtool_core::model::{Sequence, SequenceFields};
use virtool_core::{Request, Response, Session};

use crate::cli::{GlobalOpts, SequenceFieldArgs, SequencesArgs, SequencesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

const DEFINITION_WIDTH: usize = 60;

#[derive(Tabled)]
struct SequenceRow {
    #[tabled(rename = "Accession")]
    id: String,
    #[tabled(rename = "Definition")]
    definition: String,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Segment")]
    segment: String,
    #[tabled(rename = "Length")]
    length: usize,
}

impl From<&Sequence> for SequenceRow {
    fn from(s: &Sequence) -> Self {
        let definition = if s.definition.chars().count() > DEFINITION_WIDTH {
            let cut: String = s.definition.chars().take(DEFINITION_WIDTH - 1).collect();
            format!("{cut}…")
        } else {
            s.definition.clone()
        };
        Self {
            id: s.id.clone(),
            definition,
            host: s.host.clone(),
            segment: s.segment.clone().unwrap_or_default(),
            length: s.sequence.len(),
        }
    }
}

fn detail(s: &Sequence) -> String {
    [
        format!("Accession:  {}", s.id),
        format!("Definition: {}", s.definition),
        format!("Host:       {}", if s.host.is_empty() { "-" } else { s.host.as_str() }),
        format!("Segment:    {}", s.segment.as_deref().unwrap_or("-")),
        format!("Length:     {} bp", s.sequence.len()),
    ]
    .join("\n")
}

/// Build sequence fields, optionally completing them from GenBank.
///
/// Explicit flags always win over the fetched record.
async fn resolve_fields(
    session: &Session,
    args: SequenceFieldArgs,
) -> Result<SequenceFields, CliError> {
    let mut fields = SequenceFields {
        accession: args.accession.trim().to_owned(),
        definition: args.definition.unwrap_or_default(),
        host: args.host.unwrap_or_default(),
        sequence: args.sequence.unwrap_or_default(),
        segment: args.segment,
    };

    if args.fetch {
        let response = session
            .execute(Request::GetGenbank {
                accession: fields.accession.clone(),
            })
            .await?;
        if let Response::Genbank(record) = response {
            if fields.definition.is_empty() {
                fields.definition = record.definition;
            }
            if fields.host.is_empty() {
                fields.host = record.host;
            }
            if fields.sequence.is_empty() {
                fields.sequence = record.sequence;
            }
        }
    }

    Ok(fields)
}

pub async fn handle(
    session: &Session,
    args: SequencesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SequencesCommand::List { otu, isolate } => {
            session.execute(Request::GetOtu { otu_id: otu.clone() }).await?;
            let state = session.state();
            let found = state
                .otus
                .list
                .detail
                .as_ref()
                .and_then(|o| o.isolate(&isolate))
                .ok_or_else(|| CliError::NotFound {
                    message: format!("isolate {isolate} in OTU {otu}"),
                })?;
            let out = output::render_list(
                &global.output,
                &found.sequences,
                |s| SequenceRow::from(s),
                |s| s.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SequencesCommand::Add {
            otu,
            isolate,
            fields: args,
        } => {
            let sequence = resolve_fields(session, args).await?;
            let response = session
                .execute(Request::AddSequence {
                    otu_id: otu,
                    isolate_id: isolate.clone(),
                    sequence,
                })
                .await?;
            if let Response::Sequence(created) = &response {
                let out =
                    output::render_single(&global.output, created, detail, |s| s.id.clone());
                output::print_output(&out, global.quiet);
            }
            output::done(global, &format!("Sequence added to isolate {isolate}"));
            Ok(())
        }

        SequencesCommand::Edit {
            otu,
            isolate,
            id,
            fields: args,
        } => {
            let sequence = resolve_fields(session, args).await?;
            session
                .execute(Request::EditSequence {
                    otu_id: otu,
                    isolate_id: isolate,
                    sequence_id: id.clone(),
                    sequence,
                })
                .await?;
            output::done(global, &format!("Sequence {id} updated"));
            Ok(())
        }

        SequencesCommand::Remove { otu, isolate, id } => {
            if !util::confirm(&format!("Remove sequence {id}?"), global)? {
                return Ok(());
            }
            session
                .execute(Request::RemoveSequence {
                    otu_id: otu,
                    isolate_id: isolate,
                    sequence_id: id.clone(),
                })
                .await?;
            output::done(global, &format!("Sequence {id} removed"));
            Ok(())
        }
    }
}
