//! config command - Show the resolved configuration

use ell_core::Config;
use serde::Serialize;

use super::GlobalArgs;
use crate::exit_code::ExitCode;
use crate::output::Formatter;

#[derive(Debug, Serialize, PartialEq)]
struct ConfigOutput {
    prefix: String,
    public_url: String,
    private_url: String,
    get_timeout: f64,
    get_retries: u32,
    post_timeout: f64,
    post_retries: u32,
}

impl From<&Config> for ConfigOutput {
    fn from(config: &Config) -> Self {
        Self {
            prefix: config.prefix.clone(),
            public_url: config.public_url.clone(),
            private_url: config.private_url.clone(),
            get_timeout: config.get_timeout.as_secs_f64(),
            get_retries: config.get_retries,
            post_timeout: config.post_timeout.as_secs_f64(),
            post_retries: config.post_retries,
        }
    }
}

/// Execute the config command
pub fn execute(global: &GlobalArgs, formatter: &Formatter) -> ExitCode {
    let config = match global.resolve_config() {
        Ok(c) => c,
        Err(e) => {
            formatter.fail(&format!("{e:#}"));
            return ExitCode::ConfigError;
        }
    };

    let output = ConfigOutput::from(&config);
    if formatter.is_json() {
        formatter.json(&output);
        return ExitCode::Success;
    }

    let rows = [
        ("prefix", output.prefix.clone()),
        ("public_url", formatter.url(&output.public_url)),
        ("private_url", formatter.url(&output.private_url)),
        ("get_timeout", format!("{}s", output.get_timeout)),
        ("get_retries", output.get_retries.to_string()),
        ("post_timeout", format!("{}s", output.post_timeout)),
        ("post_retries", output.post_retries.to_string()),
    ];
    let width = rows.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    for (key, value) in rows {
        formatter.line(&format!("{}: {value}", formatter.key(key, width)));
    }

    ExitCode::Success
}
