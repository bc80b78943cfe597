//! Reference command handlers.

use tabled::Tabled;

use virtool_core::model::{Reference, ReferenceCreate};
use virtool_core::{Request, Response, Session};

use crate::cli::{GlobalOpts, RefsArgs, RefsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ReferenceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    data_type: String,
    #[tabled(rename = "Organism")]
    organism: String,
    #[tabled(rename = "OTUs")]
    otus: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&Reference> for ReferenceRow {
    fn from(r: &Reference) -> Self {
        Self {
            id: r.id.clone(),
            name: r.name.clone(),
            data_type: r.data_type.clone().unwrap_or_default(),
            organism: r.organism.clone().unwrap_or_default(),
            otus: r.otu_count.map(|c| c.to_string()).unwrap_or_default(),
            created: output::date(r.created_at.as_deref()),
        }
    }
}

fn detail(r: &Reference) -> String {
    [
        format!("ID:          {}", r.id),
        format!("Name:        {}", r.name),
        format!(
            "Description: {}",
            if r.description.is_empty() {
                "-"
            } else {
                r.description.as_str()
            }
        ),
        format!("Data type:   {}", r.data_type.as_deref().unwrap_or("-")),
        format!("Organism:    {}", r.organism.as_deref().unwrap_or("-")),
        format!("OTUs:        {}", r.otu_count.map_or_else(|| "-".into(), |c| c.to_string())),
        format!("Created:     {}", output::date(r.created_at.as_deref())),
        format!(
            "Creator:     {}",
            r.user.as_ref().map_or("-", |u| u.id.as_str())
        ),
    ]
    .join("\n")
}

fn show(global: &GlobalOpts, reference: &Reference) {
    let out = output::render_single(&global.output, reference, detail, |r| r.id.clone());
    output::print_output(&out, global.quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &Session,
    args: RefsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        RefsCommand::List(find) => {
            session
                .execute(Request::ListReferences(util::find_query(&find)))
                .await?;
            let state = session.state();
            let documents = state.references.documents.as_deref().unwrap_or_default();
            let out = output::render_list(
                &global.output,
                documents,
                |r| ReferenceRow::from(r),
                |r| r.id.clone(),
            );
            output::print_output(&out, global.quiet);
            util::print_cursor(state.references.cursor, global);
            Ok(())
        }

        RefsCommand::Get { id } => {
            session
                .execute(Request::GetReference { ref_id: id.clone() })
                .await?;
            let state = session.state();
            let reference = state
                .references
                .detail
                .as_ref()
                .ok_or(CliError::NotFound { message: id })?;
            show(global, reference);
            Ok(())
        }

        RefsCommand::Create {
            name,
            description,
            data_type,
            organism,
        } => {
            let response = session
                .execute(Request::CreateReference(ReferenceCreate {
                    name,
                    description,
                    data_type,
                    organism,
                }))
                .await?;
            if let Response::Reference(created) = response {
                if let Some(reference) = session.state().references.get(&created.id) {
                    show(global, reference);
                }
                output::done(global, &format!("Reference '{}' created", created.name));
            }
            Ok(())
        }

        RefsCommand::Import {
            name,
            description,
            file,
        } => {
            session
                .execute(Request::ImportReference {
                    name: name.clone(),
                    description,
                    import_from: file,
                })
                .await?;
            output::done(global, &format!("Import of '{name}' started"));
            Ok(())
        }

        RefsCommand::Remove { id } => {
            if !util::confirm(&format!("Remove reference {id}?"), global)? {
                return Ok(());
            }
            session
                .execute(Request::RemoveReference { ref_id: id.clone() })
                .await?;
            output::done(global, &format!("Reference {id} removed"));
            Ok(())
        }
    }
}
