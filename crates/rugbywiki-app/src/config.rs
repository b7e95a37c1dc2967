// Configuration loading and parsing (rugbywiki.toml).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use rugbywiki_api::{ClientOptions, RangeEndpoint, DEFAULT_BASE_URL};

use crate::pages::fixtures::FixtureStrategy;

pub const CONFIG_FILE: &str = "rugbywiki.toml";

/// Overrides `api.base_url` when set.
pub const API_URL_ENV: &str = "RUGBYWIKI_API_URL";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub fixtures: FixturesConfig,
    pub teams: TeamsConfig,
    pub years: YearsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Whole-request timeout in seconds. Unset keeps the transport default.
    pub timeout_secs: Option<u64>,
    pub range_endpoint: RangeEndpoint,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
            range_endpoint: RangeEndpoint::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FixturesConfig {
    pub strategy: FixtureStrategy,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TeamsConfig {
    /// League preselected on the teams page.
    pub default_league_id: i64,
}

impl Default for TeamsConfig {
    fn default() -> Self {
        TeamsConfig {
            default_league_id: 1,
        }
    }
}

/// Year selector window around the current year.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct YearsConfig {
    pub back: u32,
    pub forward: u32,
}

impl Default for YearsConfig {
    fn default() -> Self {
        YearsConfig {
            back: 2,
            forward: 2,
        }
    }
}

impl Config {
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            timeout: self.api.timeout_secs.map(Duration::from_secs),
            range_endpoint: self.api.range_endpoint,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Parse a single config file without validating it.
fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load and validate `config/rugbywiki.toml` relative to `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy
/// defaults or look at the environment.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config = read_config(&base_dir.join("config").join(CONFIG_FILE))?;
    validate(&config)?;
    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Platform config file, e.g. `~/.config/rugbywiki/rugbywiki.toml`.
fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "rugbywiki")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Load the configuration for the current working directory.
///
/// Looks for `config/` (seeded from `defaults/`) in the working directory,
/// then the platform config directory, and otherwise falls back to the
/// built-in defaults. Environment overrides are applied before validation.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;

    let mut config = if cwd.join("defaults").exists() || cwd.join("config").exists() {
        ensure_config_files(&cwd)?;
        let path = cwd.join("config").join(CONFIG_FILE);
        info!("Loading config from {}", path.display());
        read_config(&path)?
    } else if let Some(path) = user_config_path().filter(|p| p.exists()) {
        info!("Loading config from {}", path.display());
        read_config(&path)?
    } else {
        info!("No config file found, using built-in defaults");
        Config::default()
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate(&config)?;
    Ok(config)
}

/// Apply environment overrides through `lookup` (normally `std::env::var`).
pub fn apply_env_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(url) = lookup(API_URL_ENV).filter(|u| !u.trim().is_empty()) {
        config.api.base_url = url.trim().to_string();
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    match reqwest::Url::parse(&config.api.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => {
            return Err(ConfigError::ValidationError {
                field: "api.base_url".into(),
                message: format!("scheme must be http or https, got `{}`", url.scheme()),
            });
        }
        Err(e) => {
            return Err(ConfigError::ValidationError {
                field: "api.base_url".into(),
                message: format!("not an absolute URL: {e}"),
            });
        }
    }

    if config.api.timeout_secs == Some(0) {
        return Err(ConfigError::ValidationError {
            field: "api.timeout_secs".into(),
            message: "must be > 0 when set".into(),
        });
    }

    if config.teams.default_league_id <= 0 {
        return Err(ConfigError::ValidationError {
            field: "teams.default_league_id".into(),
            message: format!("must be > 0, got {}", config.teams.default_league_id),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
