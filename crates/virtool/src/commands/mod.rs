//! Command dispatch: bridges CLI args -> session requests -> output formatting.

pub mod analyses;
pub mod config_cmd;
pub mod groups;
pub mod hmms;
pub mod isolates;
pub mod jobs;
pub mod otus;
pub mod references;
pub mod samples;
pub mod sequences;
pub mod settings;
pub mod util;

use virtool_core::Session;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    session: &Session,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Refs(args) => references::handle(session, args, global).await,
        Command::Otus(args) => otus::handle(session, args, global).await,
        Command::Isolates(args) => isolates::handle(session, args, global).await,
        Command::Sequences(args) => sequences::handle(session, args, global).await,
        Command::Groups(args) => groups::handle(session, args, global).await,
        Command::Samples(args) => samples::handle(session, args, global).await,
        Command::Analyses(args) => analyses::handle(session, args, global).await,
        Command::Jobs(args) => jobs::handle(session, args, global).await,
        Command::Hmms(args) => hmms::handle(session, args, global).await,
        Command::Settings(args) => settings::handle(session, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
