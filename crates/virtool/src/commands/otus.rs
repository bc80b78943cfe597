//! OTU command handlers.

use serde_json::Value;
use tabled::Tabled;

use virtool_core::model::{GenbankRecord, HistoryChange, Otu, OtuCreate, OtuName, OtuUpdate};
use virtool_core::{Request, Response, Session};

use crate::cli::{GlobalOpts, OtusArgs, OtusCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct OtuRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Abbreviation")]
    abbreviation: String,
    #[tabled(rename = "Verified")]
    verified: String,
    #[tabled(rename = "Version")]
    version: String,
}

impl OtuRow {
    fn new(o: &Otu, color: bool) -> Self {
        Self {
            id: o.id.clone(),
            name: o.name.clone(),
            abbreviation: o.abbreviation.clone(),
            verified: output::flag(o.verified, color),
            version: o.version.map(|v| v.to_string()).unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct NameRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
}

#[derive(Tabled)]
struct ChangeRow {
    #[tabled(rename = "Change")]
    id: String,
    #[tabled(rename = "Method")]
    method: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&HistoryChange> for ChangeRow {
    fn from(c: &HistoryChange) -> Self {
        Self {
            id: c.id.clone(),
            method: c.method_name.clone(),
            description: c.description.clone(),
            user: c.user.as_ref().map(|u| u.id.clone()).unwrap_or_default(),
            created: output::date(c.created_at.as_deref()),
        }
    }
}

fn detail(o: &Otu) -> String {
    let mut lines = vec![
        format!("ID:           {}", o.id),
        format!("Name:         {}", o.name),
        format!(
            "Abbreviation: {}",
            if o.abbreviation.is_empty() { "-" } else { o.abbreviation.as_str() }
        ),
        format!("Verified:     {}", output::flag(o.verified, false)),
        format!("Version:      {}", o.version.map_or_else(|| "-".into(), |v| v.to_string())),
        format!(
            "Reference:    {}",
            o.reference.as_ref().map_or("-", |r| r.id.as_str())
        ),
    ];
    if o.isolates.is_empty() {
        lines.push("Isolates:     (none)".into());
    } else {
        lines.push("Isolates:".into());
        for isolate in &o.isolates {
            let marker = if isolate.default { " (default)" } else { "" };
            lines.push(format!(
                "  {}  {}{marker}  [{} sequences]",
                isolate.id,
                isolate.display_name(),
                isolate.sequences.len()
            ));
        }
    }
    lines.join("\n")
}

fn genbank_detail(g: &GenbankRecord) -> String {
    [
        format!("Accession:  {}", g.accession),
        format!("Definition: {}", g.definition),
        format!("Host:       {}", if g.host.is_empty() { "-" } else { g.host.as_str() }),
        format!("Length:     {} bp", g.sequence.len()),
    ]
    .join("\n")
}

/// Parse a `--schema` argument: a JSON array of segment objects.
fn parse_schema(raw: &str) -> Result<Vec<Value>, CliError> {
    let invalid = |reason: String| CliError::Validation {
        field: "schema".into(),
        reason,
    };
    match serde_json::from_str(raw) {
        Ok(Value::Array(segments)) if segments.iter().all(Value::is_object) => Ok(segments),
        Ok(_) => Err(invalid("must be a JSON array of segment objects".into())),
        Err(e) => Err(invalid(format!("not valid JSON: {e}"))),
    }
}

fn show(global: &GlobalOpts, otu: &Otu) {
    let out = output::render_single(&global.output, otu, detail, |o| o.id.clone());
    output::print_output(&out, global.quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    session: &Session,
    args: OtusArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        OtusCommand::List { reference, find } => {
            session
                .execute(Request::FindOtus {
                    ref_id: reference,
                    query: util::find_query(&find),
                })
                .await?;
            let state = session.state();
            let documents = state.otus.list.documents.as_deref().unwrap_or_default();
            let out = output::render_list(
                &global.output,
                documents,
                |o| OtuRow::new(o, color),
                |o| o.id.clone(),
            );
            output::print_output(&out, global.quiet);
            util::print_cursor(state.otus.list.cursor, global);
            Ok(())
        }

        OtusCommand::Names { reference } => {
            session
                .execute(Request::ListOtuNames { ref_id: reference })
                .await?;
            let state = session.state();
            let names: &[OtuName] = state.otus.names.as_deref().unwrap_or_default();
            let out = output::render_list(
                &global.output,
                names,
                |n| NameRow {
                    id: n.id.clone(),
                    name: n.name.clone(),
                },
                |n| n.name.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        OtusCommand::Get { id } => {
            session.execute(Request::GetOtu { otu_id: id.clone() }).await?;
            let state = session.state();
            let otu = state
                .otus
                .list
                .detail
                .as_ref()
                .ok_or(CliError::NotFound { message: id })?;
            show(global, otu);
            Ok(())
        }

        OtusCommand::History { reference, id } => {
            session
                .execute(Request::GetOtuHistory {
                    ref_id: reference,
                    otu_id: id,
                })
                .await?;
            let state = session.state();
            let changes = state.otus.history.as_deref().unwrap_or_default();
            let out = output::render_list(
                &global.output,
                changes,
                |c| ChangeRow::from(c),
                |c| c.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        OtusCommand::Genbank { accession } => {
            session
                .execute(Request::GetGenbank {
                    accession: accession.clone(),
                })
                .await?;
            let state = session.state();
            let record = state
                .otus
                .last_genbank
                .as_ref()
                .ok_or(CliError::NotFound { message: accession })?;
            let out = output::render_single(&global.output, record, genbank_detail, |g| {
                g.accession.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        OtusCommand::Create {
            reference,
            name,
            abbreviation,
        } => {
            let response = session
                .execute(Request::CreateOtu {
                    ref_id: reference,
                    otu: OtuCreate { name, abbreviation },
                })
                .await?;
            if let Response::Otu(created) = response {
                if let Some(otu) = session.state().otus.list.get(&created.id) {
                    show(global, otu);
                }
                output::done(global, &format!("OTU '{}' created", created.name));
            }
            Ok(())
        }

        OtusCommand::Edit {
            id,
            name,
            abbreviation,
            schema,
        } => {
            if name.is_none() && abbreviation.is_none() && schema.is_none() {
                return Err(CliError::Validation {
                    field: "edit".into(),
                    reason: "pass at least one of --name, --abbreviation or --schema".into(),
                });
            }
            let schema = schema.as_deref().map(parse_schema).transpose()?;
            session
                .execute(Request::EditOtu {
                    otu_id: id.clone(),
                    changes: OtuUpdate {
                        name,
                        abbreviation,
                        schema,
                    },
                })
                .await?;
            if let Some(otu) = session.state().otus.list.get(&id) {
                show(global, otu);
            }
            output::done(global, &format!("OTU {id} updated"));
            Ok(())
        }

        OtusCommand::Remove { reference, id } => {
            if !util::confirm(&format!("Remove OTU {id}?"), global)? {
                return Ok(());
            }
            session
                .execute(Request::RemoveOtu {
                    ref_id: reference,
                    otu_id: id.clone(),
                })
                .await?;
            output::done(global, &format!("OTU {id} removed"));
            Ok(())
        }

        OtusCommand::Revert {
            reference,
            id,
            version,
        } => {
            if !util::confirm(&format!("Revert OTU {id} to version {version}?"), global)? {
                return Ok(());
            }
            session
                .execute(Request::RevertOtu {
                    ref_id: reference,
                    otu_id: id.clone(),
                    version,
                })
                .await?;
            output::done(global, &format!("OTU {id} reverted to version {version}"));
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn schema_must_be_array_of_objects() {
        let segments = parse_schema(r#"[{"name": "RNA1", "required": true}]"#).unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0]["name"], "RNA1");

        assert!(parse_schema("[]").unwrap().is_empty());
        assert!(parse_schema(r#"{"name": "RNA1"}"#).is_err());
        assert!(parse_schema(r#"["RNA1"]"#).is_err());
        assert!(parse_schema("RNA1").is_err());
    }
}
