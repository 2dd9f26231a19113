//! Configuration loading.
//!
//! Sources, lowest to highest precedence:
//!
//! 1. built-in defaults
//! 2. the user file, `config.{toml,yaml,yml,json}` in the platform config
//!    directory (`~/.config/longcast/` on Linux)
//! 3. project files, `.longcast.<ext>` then `longcast.<ext>`, from the
//!    nearest directory that has any, searching upward from the working
//!    directory and stopping at the repository root (a directory holding
//!    `.git`)
//! 4. files passed with `--config`, in order
//! 5. `LONGCAST_TIER`, `LONGCAST_MAX_INPUT_BYTES`,
//!    `LONGCAST_DISABLE_INPUT_LIMIT`, `LONGCAST_LOG_LEVEL`, `LONGCAST_LOG_DIR`
//!
//! ```no_run
//! use longcast_core::config::ConfigLoader;
//!
//! let (config, _sources) = ConfigLoader::new().search_from(".").load()?;
//! println!("quota tier: {}", config.tier.unwrap_or_default());
//! # Ok::<(), longcast_core::error::ConfigError>(())
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::limits::DEFAULT_MAX_INPUT_BYTES;
use crate::plans::Tier;

const APP_NAME: &str = "longcast";
const EXTENSIONS: [&str; 4] = ["toml", "yaml", "yml", "json"];
const REPO_MARKER: &str = ".git";
const ENV_PREFIX: &str = "LONGCAST_";
const ENV_KEYS: [&str; 5] = [
    "tier",
    "max_input_bytes",
    "disable_input_limit",
    "log_level",
    "log_dir",
];

/// Settings read from config files and `LONGCAST_*` variables.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Level for the JSONL log file and, with `-v`, stderr.
    pub log_level: LogLevel,
    /// Directory for the JSONL log file.
    pub log_dir: Option<Utf8PathBuf>,
    /// Plan assumed by `quota` and the MCP server when none is named.
    pub tier: Option<Tier>,
    /// Largest input, in bytes, that `classify`, `migrate` and the MCP
    /// tools accept. Defaults to 1 MiB.
    pub max_input_bytes: Option<usize>,
    /// Accept input of any size. Wins over `max_input_bytes`.
    pub disable_input_limit: bool,
}

impl Config {
    /// Effective input size limit, or `None` when disabled.
    pub fn input_limit(&self) -> Option<usize> {
        if self.disable_input_limit {
            return None;
        }
        Some(self.max_input_bytes.unwrap_or(DEFAULT_MAX_INPUT_BYTES))
    }

    fn validate(self) -> ConfigResult<Self> {
        if self.max_input_bytes == Some(0) && !self.disable_input_limit {
            return Err(ConfigError::Invalid {
                field: "max_input_bytes",
                reason: "must be greater than zero; set disable_input_limit to lift the cap"
                    .to_string(),
            });
        }
        Ok(self)
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Everything.
    Debug,
    /// Commands, tool calls, and migrations.
    #[default]
    Info,
    /// Only problems.
    Warn,
    /// Only failures.
    Error,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Config files that contributed to a loaded [`Config`], in merge order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigSources {
    /// Every file merged, lowest precedence first.
    pub files: Vec<Utf8PathBuf>,
}

impl ConfigSources {
    /// The file whose values win, if any file was read.
    pub fn primary_file(&self) -> Option<&Utf8Path> {
        self.files.last().map(Utf8PathBuf::as_path)
    }
}

/// Builder that gathers config sources and merges them.
#[derive(Debug)]
pub struct ConfigLoader {
    search_root: Option<Utf8PathBuf>,
    user_config: bool,
    explicit: Vec<Utf8PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Loader that reads the user config and nothing else yet.
    pub const fn new() -> Self {
        Self {
            search_root: None,
            user_config: true,
            explicit: Vec::new(),
        }
    }

    /// Look for project files from `dir` upward.
    pub fn search_from(mut self, dir: impl AsRef<Utf8Path>) -> Self {
        self.search_root = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Include or skip the user config file.
    pub const fn with_user_config(mut self, include: bool) -> Self {
        self.user_config = include;
        self
    }

    /// Merge `path` over the discovered files.
    pub fn with_file(mut self, path: impl AsRef<Utf8Path>) -> Self {
        self.explicit.push(path.as_ref().to_path_buf());
        self
    }

    /// Merge every source and validate the result.
    #[tracing::instrument(skip(self), fields(search_root = ?self.search_root))]
    pub fn load(self) -> ConfigResult<(Config, ConfigSources)> {
        let mut files = Vec::new();
        if self.user_config {
            files.extend(user_file());
        }
        if let Some(root) = &self.search_root {
            files.extend(project_files(root));
        }
        files.extend(self.explicit);

        let figment = files
            .iter()
            .fold(Figment::from(Serialized::defaults(Config::default())), merge)
            .merge(Env::prefixed(ENV_PREFIX).only(&ENV_KEYS));

        let config = figment
            .extract::<Config>()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))?
            .validate()?;

        tracing::debug!(
            files = files.len(),
            tier = ?config.tier,
            input_limit = ?config.input_limit(),
            "configuration loaded"
        );
        Ok((config, ConfigSources { files }))
    }
}

fn merge(figment: Figment, path: &Utf8PathBuf) -> Figment {
    match path.extension() {
        Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path.as_str())),
        Some("json") => figment.merge(Json::file_exact(path.as_str())),
        _ => figment.merge(Toml::file_exact(path.as_str())),
    }
}

/// Config files in the nearest directory at or above `start` that has any.
///
/// Dotfiles come before plain names, so `longcast.toml` beats
/// `.longcast.toml` in the same directory. The search does not leave the
/// repository containing `start`.
pub fn project_files(start: &Utf8Path) -> Vec<Utf8PathBuf> {
    let stems = [format!(".{APP_NAME}"), APP_NAME.to_string()];
    for dir in start.ancestors() {
        let found: Vec<Utf8PathBuf> = stems
            .iter()
            .flat_map(|stem| EXTENSIONS.map(|ext| dir.join(format!("{stem}.{ext}"))))
            .filter(|path| path.is_file())
            .collect();
        if !found.is_empty() {
            return found;
        }
        if dir.join(REPO_MARKER).exists() {
            break;
        }
    }
    Vec::new()
}

fn user_file() -> Option<Utf8PathBuf> {
    let dir = user_config_dir()?;
    EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("config.{ext}")))
        .find(|path| path.is_file())
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", APP_NAME)
}

/// Platform config directory for longcast, if a home directory exists.
pub fn user_config_dir() -> Option<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(project_dirs()?.config_dir().to_path_buf()).ok()
}

/// Platform local data directory for longcast. Logs default to `logs/` here.
pub fn user_data_local_dir() -> Option<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(project_dirs()?.data_local_dir().to_path_buf()).ok()
}
