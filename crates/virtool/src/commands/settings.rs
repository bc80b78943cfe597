//! Server settings handlers.

use serde_json::{Map, Value};
use tabled::Tabled;

use virtool_core::model::Settings;
use virtool_core::{Request, Session};

use crate::cli::{GlobalOpts, OutputFormat, SettingsArgs, SettingsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct SettingRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
}

fn rows(settings: &Settings) -> Vec<(String, Value)> {
    let mut entries: Vec<_> = settings
        .values
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries
}

fn render(global: &GlobalOpts, settings: &Settings) {
    let out = match global.output {
        OutputFormat::Table | OutputFormat::Plain => {
            output::render_list(
                &global.output,
                &rows(settings),
                |(k, v)| SettingRow {
                    key: k.clone(),
                    value: util::cell(v),
                },
                |(k, v)| format!("{k}={}", util::cell(v)),
            )
        }
        _ => output::render_single(&global.output, settings, |_| String::new(), |_| String::new()),
    };
    output::print_output(&out, global.quiet);
}

pub async fn handle(
    session: &Session,
    args: SettingsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SettingsCommand::Show => {
            session.execute(Request::GetSettings).await?;
            let state = session.state();
            if let Some(settings) = &*state.settings {
                render(global, settings);
            }
            Ok(())
        }

        SettingsCommand::Set { key, value } => {
            let mut update = Map::new();
            update.insert(key.clone(), util::parse_value(&value));
            session.execute(Request::UpdateSettings(update)).await?;
            let state = session.state();
            if let Some(current) = (*state.settings).as_ref().and_then(|s| s.get(&key)) {
                output::done(global, &format!("{key} = {}", util::cell(current)));
            }
            Ok(())
        }
    }
}
