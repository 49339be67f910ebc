//! Config file parsing and validation.
//!
//! Settings come from a TOML file, then environment variables, then command
//! line flags, each layer overriding the previous one.

use crate::api_defaults::{self, ACCESS_TOKEN_ENV_VAR, USERNAME_ENV_VAR};
use crate::error::{self, AddContext};
use crate::Result;
use serde::Deserialize;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

pub trait ConfigProperties {
    fn username(&self) -> &str;
    fn access_token(&self) -> &str;
    fn base_url(&self) -> &str {
        api_defaults::GITHUB_API_URL
    }
    /// Page size requested on list calls. Remote default when `None`.
    fn per_page(&self) -> Option<u32> {
        None
    }
    /// Global request timeout. `None` disables it.
    fn timeout_seconds(&self) -> Option<u64> {
        Some(api_defaults::DEFAULT_TIMEOUT_SECONDS)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    username: Option<String>,
    access_token: Option<String>,
    base_url: Option<String>,
    per_page: Option<u32>,
    timeout_seconds: Option<u64>,
}

#[derive(Clone, Debug, Default)]
pub struct Config {
    username: String,
    access_token: String,
    base_url: Option<String>,
    per_page: Option<u32>,
    timeout_seconds: Option<u64>,
}

impl Config {
    /// Parses a TOML config. The username is mandatory, an empty access token
    /// is accepted.
    pub fn new<T: Read>(reader: T) -> Result<Self> {
        let file = Config::parse(reader)?;
        let config = Config::from_file(file);
        config.validate()?;
        Ok(config)
    }

    fn parse<T: Read>(mut reader: T) -> Result<ConfigFile> {
        let mut config_data = String::new();
        reader.read_to_string(&mut config_data)?;
        toml::from_str(&config_data)
            .map_err(|err| error::configuration(format!("invalid config file: {}", err)))
    }

    fn from_file(file: ConfigFile) -> Self {
        Config {
            username: file.username.unwrap_or_default(),
            access_token: file.access_token.unwrap_or_default(),
            base_url: file.base_url,
            per_page: file.per_page,
            timeout_seconds: file.timeout_seconds,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.username.is_empty() {
            return Err(error::configuration(format!(
                "No username found. Set it in the config file or with {}",
                USERNAME_ENV_VAR
            )));
        }
        if self.per_page == Some(0) {
            return Err(error::configuration("per_page must be greater than 0"));
        }
        if let Some(base_url) = &self.base_url {
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                return Err(error::configuration(format!(
                    "base_url {} must be an http(s) URL",
                    base_url
                )));
            }
        }
        Ok(())
    }

    /// Environment values win over the ones read from file.
    fn apply_env<F: Fn(&str) -> Option<String>>(mut self, env: F) -> Self {
        if let Some(username) = env(USERNAME_ENV_VAR) {
            self.username = username;
        }
        if let Some(access_token) = env(ACCESS_TOKEN_ENV_VAR) {
            self.access_token = access_token;
        }
        self
    }

    pub fn with_username<U: Into<String>>(mut self, username: U) -> Self {
        self.username = username.into();
        self
    }

    pub fn with_base_url<U: Into<String>>(mut self, base_url: U) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

impl ConfigProperties for Config {
    fn username(&self) -> &str {
        &self.username
    }

    fn access_token(&self) -> &str {
        &self.access_token
    }

    fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(api_defaults::GITHUB_API_URL)
    }

    fn per_page(&self) -> Option<u32> {
        self.per_page
    }

    /// `timeout_seconds = 0` turns the timeout off.
    fn timeout_seconds(&self) -> Option<u64> {
        match self.timeout_seconds {
            Some(0) => None,
            Some(seconds) => Some(seconds),
            None => Some(api_defaults::DEFAULT_TIMEOUT_SECONDS),
        }
    }
}

/// Command line values that take precedence over file and environment.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub username: Option<String>,
    pub base_url: Option<String>,
}

/// Reads the config file at `path`, if there is one, and layers the
/// process environment and `overrides` on top.
pub fn read_config(path: &Path, overrides: &Overrides) -> Result<Config> {
    read_config_with(path, overrides, |key| std::env::var(key).ok())
}

/// Same as `read_config` with a custom environment lookup.
pub fn read_config_with<F>(path: &Path, overrides: &Overrides, env: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let file = match File::open(path) {
        Ok(f) => Config::parse(f).err_context(format!("reading config {}", path.display()))?,
        // Environment and flags may provide everything.
        Err(err) if err.kind() == ErrorKind::NotFound => ConfigFile::default(),
        Err(err) => {
            return Err(err).err_context(format!("opening config {}", path.display()));
        }
    };
    let mut config = Config::from_file(file).apply_env(env);
    if let Some(username) = &overrides.username {
        config = config.with_username(username.as_str());
    }
    if let Some(base_url) = &overrides.base_url {
        config = config.with_base_url(base_url.as_str());
    }
    config.validate()?;
    Ok(config)
}
