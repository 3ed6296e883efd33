//! rm command - Delete an object
//!
//! The store's answer is not checked, so a missing object is not an error.

use clap::Args;
use ell_core::ObjectStoreClient;
use serde::Serialize;

use super::fail;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Delete an object
#[derive(Args, Debug)]
pub struct RmArgs {
    /// Object name
    pub name: String,
}

#[derive(Debug, Serialize)]
struct RmOutput {
    name: String,
    requested: bool,
}

/// Execute the rm command
pub async fn execute(args: RmArgs, client: &ObjectStoreClient, formatter: &Formatter) -> ExitCode {
    if let Err(e) = client.delete(&args.name).await {
        return fail(formatter, &format!("Failed to delete '{}'", args.name), &e);
    }

    if formatter.is_json() {
        formatter.json(&RmOutput {
            name: args.name,
            requested: true,
        });
    } else {
        formatter.done(&format!("Removed {}", formatter.object(&args.name)));
    }

    ExitCode::Success
}
