//! HMM command handlers, including the install progress monitor.

use std::time::Duration;

use bytesize::ByteSize;
use indicatif::{ProgressBar, ProgressStyle};
use tabled::Tabled;

use virtool_core::model::{FindQuery, Hmm, HmmStatus};
use virtool_core::{Request, Session};

use crate::cli::{GlobalOpts, HmmsArgs, HmmsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

const LAST_STEP: &str = "import_annotations";

#[derive(Tabled)]
struct HmmRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Cluster")]
    cluster: String,
    #[tabled(rename = "Names")]
    names: String,
    #[tabled(rename = "Count")]
    count: String,
}

impl From<&Hmm> for HmmRow {
    fn from(h: &Hmm) -> Self {
        Self {
            id: h.id.clone(),
            cluster: h.cluster.map(|c| c.to_string()).unwrap_or_default(),
            names: h.names.iter().take(3).cloned().collect::<Vec<_>>().join(", "),
            count: h.count.map(|c| c.to_string()).unwrap_or_default(),
        }
    }
}

fn detail(h: &Hmm) -> String {
    [
        format!("ID:      {}", h.id),
        format!("Cluster: {}", h.cluster.map_or_else(|| "-".into(), |c| c.to_string())),
        format!("Count:   {}", h.count.map_or_else(|| "-".into(), |c| c.to_string())),
        format!("Names:   {}", h.names.join(", ")),
    ]
    .join("\n")
}

fn release_size(status: &HmmStatus) -> Option<String> {
    status
        .release
        .as_ref()
        .and_then(|r| r.size)
        .map(|size| ByteSize::b(size).to_string())
}

fn status_detail(s: &HmmStatus) -> String {
    let mut lines = vec![format!("Installed: {}", output::flag(Some(s.is_installed()), false))];
    if let Some(ref release) = s.release {
        lines.push(format!("Release:   {}", release.name));
    }
    if let Some(size) = release_size(s) {
        lines.push(format!("Size:      {size}"));
    }
    if let Some(ref process) = s.process {
        lines.push(format!("Step:      {}", process.step));
        if let Some(pct) = s.install_percent() {
            lines.push(format!("Progress:  {pct:.0}%"));
        }
        if let Some(ref error) = process.error {
            lines.push(format!("Error:     {error}"));
        }
    }
    lines.join("\n")
}

/// Whether an install reported by `status` has run to completion.
fn install_finished(status: &HmmStatus) -> bool {
    match &status.process {
        None => status.is_installed(),
        Some(p) => p.error.is_none() && p.step == LAST_STEP && p.progress >= 1.0,
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
fn bar_position(percent: f64) -> u64 {
    percent.clamp(0.0, 100.0).round() as u64
}

async fn fetch_status(session: &Session) -> Result<Option<HmmStatus>, CliError> {
    session.execute(Request::FindHmms(FindQuery::page(1))).await?;
    Ok(session.state().hmms.status.clone())
}

/// Poll the HMM status until the install finishes or fails.
async fn watch_install(
    session: &Session,
    global: &GlobalOpts,
    interval: Duration,
) -> Result<(), CliError> {
    let bar = if global.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(100)
    };
    let style = ProgressStyle::with_template("{spinner} [{bar:40}] {pos:>3}% {msg}")
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?
        .progress_chars("=> ");
    bar.set_style(style);

    loop {
        if let Some(status) = fetch_status(session).await? {
            if let Some(error) = status.process.as_ref().and_then(|p| p.error.clone()) {
                bar.abandon_with_message("failed");
                return Err(CliError::InstallFailed {
                    message: format!("HMM install failed: {error}"),
                });
            }
            if install_finished(&status) {
                bar.finish_with_message("installed");
                return Ok(());
            }
            if let Some(pct) = status.install_percent() {
                bar.set_position(bar_position(pct));
            }
            let step = status.process.as_ref().map_or("waiting", |p| p.step.as_str());
            match release_size(&status) {
                Some(size) => bar.set_message(format!("{step} ({size})")),
                None => bar.set_message(step.to_owned()),
            }
        }
        tokio::time::sleep(interval).await;
    }
}

pub async fn handle(
    session: &Session,
    args: HmmsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        HmmsCommand::List(find) => {
            session
                .execute(Request::FindHmms(util::find_query(&find)))
                .await?;
            let state = session.state();
            let documents = state.hmms.list.documents.as_deref().unwrap_or_default();
            let out = output::render_list(
                &global.output,
                documents,
                |h| HmmRow::from(h),
                |h| h.id.clone(),
            );
            output::print_output(&out, global.quiet);
            util::print_cursor(state.hmms.list.cursor, global);
            Ok(())
        }

        HmmsCommand::Get { id } => {
            session.execute(Request::GetHmm { hmm_id: id.clone() }).await?;
            let state = session.state();
            let hmm = state
                .hmms
                .list
                .detail
                .as_ref()
                .ok_or(CliError::NotFound { message: id })?;
            let out = output::render_single(&global.output, hmm, detail, |h| h.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        HmmsCommand::Status => {
            let Some(status) = fetch_status(session).await? else {
                output::print_output("No HMM status reported", global.quiet);
                return Ok(());
            };
            let out = output::render_single(&global.output, &status, status_detail, |s| {
                s.process
                    .as_ref()
                    .map_or_else(|| "idle".into(), |p| p.step.clone())
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        HmmsCommand::Install { no_wait, interval } => {
            session.execute(Request::InstallHmms).await?;
            if no_wait {
                output::done(global, "HMM install started");
                return Ok(());
            }
            watch_install(session, global, Duration::from_secs(interval.max(1))).await?;
            output::done(global, "HMMs installed");
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn status(value: serde_json::Value) -> HmmStatus {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn install_runs_until_last_step_completes() {
        let running = status(json!({
            "process": { "step": "decompress", "progress": 0.5 },
            "release": { "name": "v0.2.1", "size": 85_158_765 }
        }));
        assert!(!install_finished(&running));
        assert_eq!(bar_position(running.install_percent().unwrap()), 50);

        let last = status(json!({
            "process": { "step": "import_annotations", "progress": 1.0 }
        }));
        assert!(install_finished(&last));

        let idle = status(json!({ "installed": { "name": "v0.2.1" } }));
        assert!(install_finished(&idle));
    }

    #[test]
    fn failed_process_never_finishes() {
        let failed = status(json!({
            "process": { "step": "import_annotations", "progress": 1.0, "error": "disk full" }
        }));
        assert!(!install_finished(&failed));
    }

    #[test]
    fn size_is_human_readable() {
        let s = status(json!({ "release": { "name": "v0.2.1", "size": 2_000_000 } }));
        let size = release_size(&s).unwrap();
        assert!(size.starts_with("2.0"), "{size}");
        assert!(size.ends_with("MB"), "{size}");
    }
}
