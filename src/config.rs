use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Credentials and target of a single run. Immutable once loaded.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub username: String,
    pub password: String,
    /// Base URL of the Jira instance, without trailing slash
    pub base_url: String,
    pub number_of_periods: u32,
}

// Keep the password out of debug output and logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("username", &self.username)
            .field("password", &"***")
            .field("base_url", &self.base_url)
            .field("number_of_periods", &self.number_of_periods)
            .finish()
    }
}

impl Config {
    pub fn with_periods(mut self, number_of_periods: u32) -> Self {
        self.number_of_periods = number_of_periods;
        self
    }
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    username: String,
    password: String,
    url: String,
    #[serde(rename = "numberOfPeriods")]
    number_of_periods: RawPeriods,
}

/// Upstream config files quote the period count; plain integers are accepted too.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum RawPeriods {
    Text(String),
    Number(i64),
}

impl RawPeriods {
    fn to_count(&self) -> Result<u32> {
        let parsed = match self {
            RawPeriods::Text(s) => s.trim().parse::<u32>().ok(),
            RawPeriods::Number(n) => u32::try_from(*n).ok(),
        };
        parsed.ok_or_else(|| {
            Error::ConfigInvalid(format!(
                "numberOfPeriods must be a non-negative integer, got {}",
                self
            ))
        })
    }
}

impl fmt::Display for RawPeriods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawPeriods::Text(s) => write!(f, "{s:?}"),
            RawPeriods::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Parse config from TOML text.
pub fn parse(text: &str) -> Result<Config> {
    let raw: RawConfig = toml::from_str(text)?;
    let number_of_periods = raw.number_of_periods.to_count()?;

    let base_url = raw.url.trim().trim_end_matches('/').to_string();
    if base_url.is_empty() {
        return Err(Error::ConfigInvalid("url must not be empty".to_string()));
    }

    Ok(Config {
        username: raw.username,
        password: raw.password,
        base_url,
        number_of_periods,
    })
}

/// Read and parse the config file at `path`.
pub fn load(path: &Path) -> Result<Config> {
    let text = fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::ConfigNotFound(path.to_path_buf())
        } else {
            Error::ConfigRead {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    parse(&text)
}

/// Per-user fallback location, e.g. ~/.config/tempo-balance/config.toml on Linux.
pub fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "tempo-balance")
        .map(|dirs| dirs.config_dir().join(DEFAULT_CONFIG_FILE))
}

/// Decide which config file to read. An explicit path always wins; otherwise the
/// working directory copy is preferred over the per-user one. When neither exists
/// the working directory path is returned so the error names the expected file.
pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
    pick_path(
        explicit,
        Path::new(DEFAULT_CONFIG_FILE),
        user_config_path().as_deref(),
    )
}

fn pick_path(explicit: Option<&Path>, local: &Path, user: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    if local.is_file() {
        return local.to_path_buf();
    }
    match user {
        Some(u) if u.is_file() => u.to_path_buf(),
        _ => local.to_path_buf(),
    }
}
