//! Command implementations
//!
//! Every command resolves the configuration the same way: settings file,
//! then `ELLIPTICS_*` environment variables, then command-line flags.

mod cat;
mod config;
mod exists;
mod put;
mod rm;
mod url;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Subcommand};
use ell_core::{Config, ConfigBuilder, ConfigFile, ObjectStoreClient};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Options shared by all commands
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Output JSON instead of human-readable text
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Settings file (default: $ELL_CONFIG_DIR/config.toml or the user config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Prefix prepended to object names
    #[arg(long, global = true)]
    pub prefix: Option<String>,

    /// Base URL for public reads
    #[arg(long, global = true, value_name = "URL")]
    pub public_url: Option<String>,

    /// Base URL for mutating calls
    #[arg(long, global = true, value_name = "URL")]
    pub private_url: Option<String>,

    /// Per-attempt timeout for GET/HEAD, in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub get_timeout: Option<f64>,

    /// Attempts for GET/HEAD
    #[arg(long, global = true, value_name = "N")]
    pub get_retries: Option<u32>,

    /// Per-attempt timeout for POST, in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub post_timeout: Option<f64>,

    /// Attempts for POST
    #[arg(long, global = true, value_name = "N")]
    pub post_retries: Option<u32>,
}

impl GlobalArgs {
    pub fn output_config(&self) -> OutputConfig {
        OutputConfig {
            json: self.json,
            no_color: self.no_color,
            quiet: self.quiet,
        }
    }

    /// Flags as the highest-precedence settings layer
    fn overrides(&self) -> ConfigFile {
        ConfigFile {
            prefix: self.prefix.clone(),
            public_url: self.public_url.clone(),
            private_url: self.private_url.clone(),
            get_timeout: self.get_timeout,
            get_retries: self.get_retries,
            post_timeout: self.post_timeout,
            post_retries: self.post_retries,
        }
    }

    /// Resolve the configuration from file, environment and flags
    pub fn resolve_config(&self) -> anyhow::Result<Config> {
        let file = match &self.config {
            Some(path) => Some(
                ConfigFile::load(path)
                    .with_context(|| format!("Failed to read settings file {}", path.display()))?,
            ),
            None => ConfigFile::load_default().context("Failed to read settings file")?,
        };

        let mut builder = ConfigBuilder::new().with_env().overrides(self.overrides());
        if let Some(file) = file {
            builder = builder.file(file);
        }

        builder.build().context("Invalid configuration")
    }

    fn client(&self) -> anyhow::Result<ObjectStoreClient> {
        let config = self.resolve_config()?;
        tracing::debug!(
            private_url = %config.private_url,
            public_url = %config.public_url,
            prefix = %config.prefix,
            "resolved configuration"
        );
        ell_http::connect(config).context("Failed to create HTTP client")
    }
}

/// Object store commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print an object's content to stdout
    Cat(cat::CatArgs),

    /// Upload a local file or stdin
    Put(put::PutArgs),

    /// Delete an object (best effort)
    Rm(rm::RmArgs),

    /// Check whether objects exist
    Exists(exists::ExistsArgs),

    /// Print an object's public URL
    Url(url::UrlArgs),

    /// Show the resolved configuration
    Config,
}

/// Execute a command
pub async fn execute(cmd: Commands, global: GlobalArgs) -> ExitCode {
    let formatter = Formatter::new(global.output_config());

    let cmd = match cmd {
        Commands::Config => return config::execute(&global, &formatter),
        Commands::Cat(args) => ClientCommand::Cat(args),
        Commands::Put(args) => ClientCommand::Put(args),
        Commands::Rm(args) => ClientCommand::Rm(args),
        Commands::Exists(args) => ClientCommand::Exists(args),
        Commands::Url(args) => ClientCommand::Url(args),
    };

    let client = match global.client() {
        Ok(client) => client,
        Err(e) => {
            formatter.fail(&format!("{e:#}"));
            return ExitCode::ConfigError;
        }
    };

    match cmd {
        ClientCommand::Cat(args) => cat::execute(args, &client, &formatter).await,
        ClientCommand::Put(args) => put::execute(args, &client, &formatter).await,
        ClientCommand::Rm(args) => rm::execute(args, &client, &formatter).await,
        ClientCommand::Exists(args) => exists::execute(args, &client, &formatter).await,
        ClientCommand::Url(args) => url::execute(args, &client, &formatter),
    }
}

/// Commands that talk to the store
enum ClientCommand {
    Cat(cat::CatArgs),
    Put(put::PutArgs),
    Rm(rm::RmArgs),
    Exists(exists::ExistsArgs),
    Url(url::UrlArgs),
}

/// Report a library error and pick the matching exit code
fn fail(formatter: &Formatter, context: &str, error: &ell_core::Error) -> ExitCode {
    formatter.fail(&format!("{context}: {error}"));
    ExitCode::from_error(error)
}
