//! exists command - Check objects
//!
//! Prints one row per name. Exits with the not-found code when any of the
//! names is missing.

use clap::Args;
use ell_core::ObjectStoreClient;
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Check whether objects exist
#[derive(Args, Debug)]
pub struct ExistsArgs {
    /// Object names
    #[arg(required = true, num_args = 1..)]
    pub names: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ExistsEntry {
    name: String,
    exists: bool,
}

#[derive(Debug, Serialize)]
struct ExistsOutput {
    results: Vec<ExistsEntry>,
    missing: usize,
}

/// Execute the exists command
pub async fn execute(args: ExistsArgs, client: &ObjectStoreClient, formatter: &Formatter) -> ExitCode {
    let mut results = Vec::with_capacity(args.names.len());
    for name in args.names {
        let exists = client.exists(&name).await;
        results.push(ExistsEntry { name, exists });
    }

    let missing = results.iter().filter(|r| !r.exists).count();

    if formatter.is_json() {
        formatter.json(&ExistsOutput { results, missing });
    } else {
        formatter.line(&formatter.exists_table(results.iter().map(|r| (r.name.as_str(), r.exists))));
        if missing > 0 {
            formatter.notice(&format!("{missing} of {} objects not found", results.len()));
        }
    }

    if missing > 0 {
        ExitCode::NotFound
    } else {
        ExitCode::Success
    }
}
