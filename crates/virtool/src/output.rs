//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use chrono::{DateTime, NaiveDateTime};
use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Render a tri-state flag (`ready`, `verified`, ...) as yes / no / -.
pub fn flag(value: Option<bool>, color: bool) -> String {
    match (value, color) {
        (Some(true), true) => "yes".green().to_string(),
        (Some(false), true) => "no".yellow().to_string(),
        (Some(true), false) => "yes".into(),
        (Some(false), false) => "no".into(),
        (None, _) => "-".into(),
    }
}

/// Color a job state by outcome.
pub fn job_state(state: Option<&str>, color: bool) -> String {
    let Some(state) = state else {
        return "-".into();
    };
    if !color {
        return state.into();
    }
    match state {
        "complete" => state.green().to_string(),
        "error" | "cancelled" => state.red().to_string(),
        "running" => state.cyan().to_string(),
        _ => state.into(),
    }
}

/// Format a server timestamp as `YYYY-MM-DD HH:MM`.
///
/// Accepts RFC 3339 and naive ISO timestamps; anything else is shown as is.
pub fn date(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return "-".into();
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    raw.into()
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted string,
/// since single-item detail views don't use `Tabled` derive.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize + ?Sized,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => id_fn(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Report a completed mutation on stderr.
pub fn done(global: &GlobalOpts, message: &str) {
    if global.quiet {
        return;
    }
    if should_color(&global.color) {
        eprintln!("{} {message}", "✓".green());
    } else {
        eprintln!("✓ {message}");
    }
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let result = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    result.unwrap_or_else(|e| format!("<serialization failed: {e}>"))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_else(|e| format!("<serialization failed: {e}>"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Serialize)]
    struct Item {
        id: &'static str,
        name: &'static str,
    }

    #[derive(Tabled)]
    struct ItemRow {
        #[tabled(rename = "Name")]
        name: String,
    }

    fn items() -> Vec<Item> {
        vec![
            Item {
                id: "a1",
                name: "Tobacco mosaic virus",
            },
            Item {
                id: "b2",
                name: "Potato virus Y",
            },
        ]
    }

    fn row(item: &Item) -> ItemRow {
        ItemRow {
            name: item.name.into(),
        }
    }

    #[test]
    fn plain_emits_one_id_per_line() {
        let out = render_list(&OutputFormat::Plain, &items(), row, |i| i.id.into());
        assert_eq!(out, "a1\nb2");
    }

    #[test]
    fn compact_json_is_single_line() {
        let out = render_list(&OutputFormat::JsonCompact, &items(), row, |i| i.id.into());
        assert_eq!(
            out,
            r#"[{"id":"a1","name":"Tobacco mosaic virus"},{"id":"b2","name":"Potato virus Y"}]"#
        );
    }

    #[test]
    fn table_uses_row_headers() {
        let out = render_list(&OutputFormat::Table, &items(), row, |i| i.id.into());
        assert!(out.contains("Name"));
        assert!(out.contains("Potato virus Y"));
        assert!(!out.contains("a1"));
    }

    #[test]
    fn dates_are_shortened() {
        assert_eq!(date(Some("2024-03-05T14:07:09.123Z")), "2024-03-05 14:07");
        assert_eq!(date(Some("2024-03-05T14:07:09.123000")), "2024-03-05 14:07");
        assert_eq!(date(Some("yesterday")), "yesterday");
        assert_eq!(date(None), "-");
    }

    #[test]
    fn flags_without_color() {
        assert_eq!(flag(Some(true), false), "yes");
        assert_eq!(flag(Some(false), false), "no");
        assert_eq!(flag(None, true), "-");
    }
}
