//! Group command handlers.

use tabled::Tabled;

use virtool_core::model::Group;
use virtool_core::{Request, Session};

use crate::cli::{GlobalOpts, GroupsArgs, GroupsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Permissions")]
    granted: String,
}

impl From<&Group> for GroupRow {
    fn from(g: &Group) -> Self {
        let granted: Vec<&str> = g
            .permissions
            .iter()
            .filter(|(_, on)| **on)
            .map(|(name, _)| name.as_str())
            .collect();
        Self {
            id: g.id.clone(),
            granted: if granted.is_empty() {
                "-".into()
            } else {
                granted.join(", ")
            },
        }
    }
}

fn detail(g: &Group, color: bool) -> String {
    let mut lines = vec![format!("ID: {}", g.id), "Permissions:".into()];
    for (name, on) in &g.permissions {
        lines.push(format!("  {name:<24} {}", output::flag(Some(*on), color)));
    }
    lines.join("\n")
}

/// Fetch groups and look one up in the refreshed slice.
async fn fetch_group(session: &Session, id: &str) -> Result<Group, CliError> {
    session.execute(Request::ListGroups).await?;
    session
        .state()
        .groups
        .get(id)
        .cloned()
        .ok_or_else(|| CliError::NotFound {
            message: format!("group {id}"),
        })
}

pub async fn handle(
    session: &Session,
    args: GroupsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        GroupsCommand::List => {
            session.execute(Request::ListGroups).await?;
            let state = session.state();
            let documents = state.groups.documents.as_deref().unwrap_or_default();
            let out = output::render_list(
                &global.output,
                documents,
                |g| GroupRow::from(g),
                |g| g.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GroupsCommand::Get { id } => {
            let group = fetch_group(session, &id).await?;
            let out = output::render_single(
                &global.output,
                &group,
                |g| detail(g, color),
                |g| g.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GroupsCommand::Create { id } => {
            session
                .execute(Request::CreateGroup {
                    group_id: id.clone(),
                })
                .await?;
            output::done(global, &format!("Group '{id}' created"));
            Ok(())
        }

        GroupsCommand::Permission {
            id,
            permission,
            value,
        } => {
            session
                .execute(Request::SetGroupPermission {
                    group_id: id.clone(),
                    permission: permission.clone(),
                    value,
                })
                .await?;
            let verb = if value { "granted to" } else { "revoked from" };
            output::done(global, &format!("{permission} {verb} '{id}'"));
            Ok(())
        }

        GroupsCommand::Remove { id } => {
            if !util::confirm(&format!("Remove group {id}?"), global)? {
                return Ok(());
            }
            session
                .execute(Request::RemoveGroup {
                    group_id: id.clone(),
                })
                .await?;
            output::done(global, &format!("Group '{id}' removed"));
            Ok(())
        }
    }
}
