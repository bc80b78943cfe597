//! Shared helpers for command handlers.

use std::io::IsTerminal;

use serde_json::Value;

use virtool_core::model::{FindQuery, Pagination};

use crate::cli::{FindArgs, GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Build the find query for a list command.
pub fn find_query(args: &FindArgs) -> FindQuery {
    FindQuery::new(args.find.as_deref(), args.page)
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, global: &GlobalOpts) -> Result<bool, CliError> {
    if global.yes {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Print "page X of Y" under a table. Structured formats carry no footer.
pub fn print_cursor(cursor: Option<Pagination>, global: &GlobalOpts) {
    let Some(cursor) = cursor else {
        return;
    };
    if global.quiet || !matches!(global.output, OutputFormat::Table) {
        return;
    }
    eprintln!(
        "Page {} of {} ({} found, {} total)",
        cursor.page,
        cursor.page_count.max(1),
        cursor.found_count,
        cursor.total_count
    );
}

/// Parse a setting value: JSON when it parses, a plain string otherwise.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.into()))
}

/// Show a JSON value compactly in a table cell.
pub fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".into(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn values_parse_as_json_first() {
        assert_eq!(parse_value("true"), json!(true));
        assert_eq!(parse_value("8"), json!(8));
        assert_eq!(parse_value("[\"a\"]"), json!(["a"]));
        assert_eq!(parse_value("hello world"), json!("hello world"));
    }

    #[test]
    fn cells_drop_string_quotes() {
        assert_eq!(cell(&json!("x")), "x");
        assert_eq!(cell(&json!(null)), "-");
        assert_eq!(cell(&json!({"a": 1})), r#"{"a":1}"#);
    }
}
