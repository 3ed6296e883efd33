//! Client configuration
//!
//! A [`Config`] is resolved once, before a client is built, from up to four
//! layers (highest precedence first):
//!
//! 1. explicit overrides set on a [`ConfigBuilder`]
//! 2. `ELLIPTICS_*` environment variables
//! 3. a TOML settings file
//! 4. built-in defaults
//!
//! The result is immutable and validated.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::retry::RetryPolicy;

/// Default base URL serving public reads
pub const DEFAULT_PUBLIC_URL: &str = "http://localhost:8080/";
/// Default base URL for mutating and administrative calls
pub const DEFAULT_PRIVATE_URL: &str = "http://localhost:9000/";
/// Default per-attempt timeout for GET/HEAD, in seconds
pub const DEFAULT_GET_TIMEOUT_SECS: f64 = 3.0;
/// Default attempt budget for GET/HEAD
pub const DEFAULT_GET_RETRIES: u32 = 3;
/// Default per-attempt timeout for POST, in seconds
pub const DEFAULT_POST_TIMEOUT_SECS: f64 = 5.0;
/// Default attempt budget for POST
pub const DEFAULT_POST_RETRIES: u32 = 9;

/// Environment variable overriding the settings directory
pub const CONFIG_DIR_ENV: &str = "ELL_CONFIG_DIR";

const ENV_PREFIX: &str = "ELLIPTICS_PREFIX";
const ENV_PUBLIC_URL: &str = "ELLIPTICS_PUBLIC_URL";
const ENV_PRIVATE_URL: &str = "ELLIPTICS_PRIVATE_URL";
const ENV_GET_TIMEOUT: &str = "ELLIPTICS_GET_CONNECTION_TIMEOUT";
const ENV_GET_RETRIES: &str = "ELLIPTICS_GET_CONNECTION_RETRIES";
const ENV_POST_TIMEOUT: &str = "ELLIPTICS_POST_CONNECTION_TIMEOUT";
const ENV_POST_RETRIES: &str = "ELLIPTICS_POST_CONNECTION_RETRIES";

/// Resolved, validated client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Prepended to every object name on the remote side
    pub prefix: String,
    /// Base URL handed out by `url()`
    pub public_url: String,
    /// Base URL for exists/fetch/save/delete
    pub private_url: String,
    pub get_timeout: Duration,
    pub get_retries: u32,
    pub post_timeout: Duration,
    pub post_retries: u32,
}

impl Config {
    /// Start building a configuration
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Budget for read-class requests (GET, HEAD)
    pub fn read_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.get_timeout, self.get_retries)
    }

    /// Budget for write-class requests (POST)
    pub fn write_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.post_timeout, self.post_retries)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            public_url: DEFAULT_PUBLIC_URL.to_string(),
            private_url: DEFAULT_PRIVATE_URL.to_string(),
            get_timeout: Duration::from_secs_f64(DEFAULT_GET_TIMEOUT_SECS),
            get_retries: DEFAULT_GET_RETRIES,
            post_timeout: Duration::from_secs_f64(DEFAULT_POST_TIMEOUT_SECS),
            post_retries: DEFAULT_POST_RETRIES,
        }
    }
}

/// One layer of settings; every field is optional
///
/// This is the on-disk format of `config.toml`, and also the shape used for
/// environment and explicit overrides. Timeouts are in seconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get_timeout: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get_retries: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_timeout: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_retries: Option<u32>,
}

impl ConfigFile {
    /// Read a settings file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Read the settings file from its default location, if one exists
    pub fn load_default() -> Result<Option<Self>> {
        match Self::default_path() {
            Some(path) if path.is_file() => {
                tracing::debug!(path = %path.display(), "Loading settings file");
                Self::load(&path).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// `$ELL_CONFIG_DIR/config.toml`, else `<config dir>/ell/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        let dir = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::config_dir()?.join("ell"),
        };
        Some(dir.join("config.toml"))
    }

    /// Collect settings from `ELLIPTICS_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Collect settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            prefix: lookup(ENV_PREFIX),
            public_url: lookup(ENV_PUBLIC_URL),
            private_url: lookup(ENV_PRIVATE_URL),
            get_timeout: parse_var(&lookup, ENV_GET_TIMEOUT)?,
            get_retries: parse_var(&lookup, ENV_GET_RETRIES)?,
            post_timeout: parse_var(&lookup, ENV_POST_TIMEOUT)?,
            post_retries: parse_var(&lookup, ENV_POST_RETRIES)?,
        })
    }

    /// Fill unset fields from a lower-precedence layer
    pub fn or(self, lower: ConfigFile) -> ConfigFile {
        ConfigFile {
            prefix: self.prefix.or(lower.prefix),
            public_url: self.public_url.or(lower.public_url),
            private_url: self.private_url.or(lower.private_url),
            get_timeout: self.get_timeout.or(lower.get_timeout),
            get_retries: self.get_retries.or(lower.get_retries),
            post_timeout: self.post_timeout.or(lower.post_timeout),
            post_retries: self.post_retries.or(lower.post_retries),
        }
    }

    /// Apply defaults and validate
    pub fn resolve(self) -> Result<Config> {
        let config = Config {
            prefix: self.prefix.unwrap_or_default(),
            public_url: validate_base_url("public_url", self.public_url, DEFAULT_PUBLIC_URL)?,
            private_url: validate_base_url("private_url", self.private_url, DEFAULT_PRIVATE_URL)?,
            get_timeout: validate_timeout("get_timeout", self.get_timeout, DEFAULT_GET_TIMEOUT_SECS)?,
            get_retries: validate_retries("get_retries", self.get_retries, DEFAULT_GET_RETRIES)?,
            post_timeout: validate_timeout("post_timeout", self.post_timeout, DEFAULT_POST_TIMEOUT_SECS)?,
            post_retries: validate_retries("post_retries", self.post_retries, DEFAULT_POST_RETRIES)?,
        };
        Ok(config)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("{key}: cannot parse '{raw}'"))),
    }
}

fn validate_base_url(field: &str, value: Option<String>, default: &str) -> Result<String> {
    let value = value.unwrap_or_else(|| default.to_string());
    let parsed = url::Url::parse(&value)
        .map_err(|e| Error::Config(format!("{field}: invalid URL '{value}': {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(Error::Config(format!(
            "{field}: '{value}' is not an absolute http(s) URL"
        )));
    }

    Ok(value)
}

fn validate_timeout(field: &str, value: Option<f64>, default: f64) -> Result<Duration> {
    let secs = value.unwrap_or(default);
    if !secs.is_finite() || secs <= 0.0 {
        return Err(Error::Config(format!(
            "{field}: timeout must be a positive number of seconds, got {secs}"
        )));
    }
    Ok(Duration::from_secs_f64(secs))
}

fn validate_retries(field: &str, value: Option<u32>, default: u32) -> Result<u32> {
    match value.unwrap_or(default) {
        0 => Err(Error::Config(format!("{field}: at least one attempt is required"))),
        n => Ok(n),
    }
}

/// Builder layering explicit overrides on top of environment and file settings
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    overrides: ConfigFile,
    file: Option<ConfigFile>,
    env: bool,
}

impl ConfigBuilder {
    /// Defaults only; call [`ConfigBuilder::with_env`] to honour `ELLIPTICS_*`
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.overrides.prefix = Some(prefix.into());
        self
    }

    pub fn public_url(mut self, url: impl Into<String>) -> Self {
        self.overrides.public_url = Some(url.into());
        self
    }

    pub fn private_url(mut self, url: impl Into<String>) -> Self {
        self.overrides.private_url = Some(url.into());
        self
    }

    pub fn get_timeout(mut self, timeout: Duration) -> Self {
        self.overrides.get_timeout = Some(timeout.as_secs_f64());
        self
    }

    pub fn get_retries(mut self, n: u32) -> Self {
        self.overrides.get_retries = Some(n);
        self
    }

    pub fn post_timeout(mut self, timeout: Duration) -> Self {
        self.overrides.post_timeout = Some(timeout.as_secs_f64());
        self
    }

    pub fn post_retries(mut self, n: u32) -> Self {
        self.overrides.post_retries = Some(n);
        self
    }

    /// Merge a whole layer of overrides; fields already set win
    pub fn overrides(mut self, layer: ConfigFile) -> Self {
        self.overrides = self.overrides.or(layer);
        self
    }

    /// Use a settings file as the lowest non-default layer
    pub fn file(mut self, file: ConfigFile) -> Self {
        self.file = Some(file);
        self
    }

    /// Read `ELLIPTICS_*` variables from the process environment
    pub fn with_env(mut self) -> Self {
        self.env = true;
        self
    }

    pub fn build(self) -> Result<Config> {
        let env = if self.env {
            ConfigFile::from_env()?
        } else {
            ConfigFile::default()
        };
        self.build_with(env)
    }

    /// Build with an explicit environment layer
    pub fn build_with(self, env: ConfigFile) -> Result<Config> {
        self.overrides
            .or(env)
            .or(self.file.unwrap_or_default())
            .resolve()
    }
}
