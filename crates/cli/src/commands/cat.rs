//! cat command - Print object content
//!
//! Reads the whole object through a read handle and copies it to stdout.

use clap::Args;
use ell_core::ObjectStoreClient;
use tokio::io::AsyncWriteExt;

use super::fail;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

/// Print an object's content to stdout
#[derive(Args, Debug)]
pub struct CatArgs {
    /// Object name
    pub name: String,
}

/// Execute the cat command
pub async fn execute(args: CatArgs, client: &ObjectStoreClient, formatter: &Formatter) -> ExitCode {
    let mut file = match client.open(&args.name, "r") {
        Ok(f) => f,
        Err(e) => return fail(formatter, "Failed to open object", &e),
    };

    let content = match file.read(None).await {
        Ok(c) => c,
        Err(e) => return fail(formatter, &format!("Failed to read '{}'", args.name), &e),
    };

    if let Err(e) = file.close().await {
        return fail(formatter, "Failed to close object", &e);
    }

    let mut stdout = tokio::io::stdout();
    if let Err(e) = stdout.write_all(&content).await {
        formatter.fail(&format!("Failed to write to stdout: {e}"));
        return ExitCode::GeneralError;
    }
    if let Err(e) = stdout.flush().await {
        formatter.fail(&format!("Failed to write to stdout: {e}"));
        return ExitCode::GeneralError;
    }

    ExitCode::Success
}
