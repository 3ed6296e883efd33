//! ell - command-line client for an Elliptics HTTP object store
//!
//! ```bash
//! # Upload, read back, and remove an object
//! ell put notes.txt ./notes.txt
//! ell cat notes.txt
//! ell rm notes.txt
//!
//! # Point at another cluster for one call
//! ell --private-url http://storage:9000/ --prefix media exists a.png b.png
//! ```

mod commands;
mod exit_code;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

use commands::{Commands, GlobalArgs};
use exit_code::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "ell", version, about = "Elliptics HTTP object store client")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: TopLevel,
}

#[derive(Subcommand, Debug)]
enum TopLevel {
    #[command(flatten)]
    Store(Commands),

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

/// Logs go to stderr so `cat` output stays clean
fn init_tracing(quiet: bool, debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.quiet, cli.global.debug);

    let code = match cli.command {
        TopLevel::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "ell", &mut std::io::stdout());
            ExitCode::Success
        }
        TopLevel::Store(cmd) => commands::execute(cmd, cli.global).await,
    };

    std::process::exit(code.as_i32());
}
