//! url command - Print the public URL of an object

use clap::Args;
use ell_core::ObjectStoreClient;
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Print an object's public URL
#[derive(Args, Debug)]
pub struct UrlArgs {
    /// Object name
    pub name: String,
}

#[derive(Debug, Serialize)]
struct UrlOutput {
    name: String,
    url: String,
}

/// Execute the url command
pub fn execute(args: UrlArgs, client: &ObjectStoreClient, formatter: &Formatter) -> ExitCode {
    let url = client.url(&args.name);

    if formatter.is_json() {
        formatter.json(&UrlOutput {
            name: args.name,
            url,
        });
    } else {
        formatter.line(&formatter.url(&url));
    }

    ExitCode::Success
}
