//! put command - Upload content
//!
//! Streams a local file (or stdin) into a write handle; the object is
//! stored in one request when the handle is closed.

use std::path::PathBuf;

use clap::Args;
use ell_core::{ObjectStoreClient, RemoteFile};
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::fail;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

const CHUNK_SIZE: usize = 64 * 1024;

/// Upload a local file or stdin
#[derive(Args, Debug)]
pub struct PutArgs {
    /// Object name
    pub name: String,

    /// Local file to upload; `-` or omitted reads stdin
    pub source: Option<PathBuf>,

    /// Append to the object instead of replacing it
    #[arg(short, long)]
    pub append: bool,
}

#[derive(Debug, Serialize)]
struct PutOutput {
    name: String,
    bytes: u64,
    append: bool,
    url: String,
}

/// Where the content comes from
#[derive(Debug, PartialEq)]
enum Source {
    Stdin,
    File(PathBuf),
}

impl Source {
    fn from_arg(arg: Option<PathBuf>) -> Self {
        match arg {
            Some(path) if path.as_os_str() != "-" => Source::File(path),
            _ => Source::Stdin,
        }
    }
}

/// Execute the put command
pub async fn execute(args: PutArgs, client: &ObjectStoreClient, formatter: &Formatter) -> ExitCode {
    let mode = if args.append { "a" } else { "w" };
    let mut file = match client.open(&args.name, mode) {
        Ok(f) => f,
        Err(e) => return fail(formatter, "Failed to open object", &e),
    };

    let copied = match Source::from_arg(args.source) {
        Source::Stdin => copy_into(&mut tokio::io::stdin(), &mut file).await,
        Source::File(path) => match tokio::fs::File::open(&path).await {
            Ok(mut local) => copy_into(&mut local, &mut file).await,
            Err(e) => {
                formatter.fail(&format!("Failed to open {}: {e}", path.display()));
                return ExitCode::GeneralError;
            }
        },
    };

    let bytes = match copied {
        Ok(n) => n,
        Err(e) => return fail(formatter, "Failed to read input", &e),
    };

    if let Err(e) = file.close().await {
        return fail(formatter, &format!("Failed to store '{}'", args.name), &e);
    }

    if formatter.is_json() {
        formatter.json(&PutOutput {
            url: client.url(&args.name),
            name: args.name,
            bytes,
            append: args.append,
        });
    } else {
        let verb = if args.append { "Appended" } else { "Stored" };
        formatter.done(&format!(
            "{verb} {} to {}",
            formatter.size(bytes),
            formatter.object(&args.name)
        ));
    }

    ExitCode::Success
}

/// Copy everything from `reader` into the handle's buffer
async fn copy_into<R>(reader: &mut R, file: &mut RemoteFile) -> ell_core::Result<u64>
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut total = 0u64;

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        file.write(&buf[..n]).await?;
        total += n as u64;
    }

    Ok(total)
}
