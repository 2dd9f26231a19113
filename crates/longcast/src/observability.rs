//! Logging setup for the CLI.
//!
//! Human-readable events go to stderr. Every event that passes the filter is
//! also appended as JSON lines to a log file, written on a background thread.
//!
//! Log file resolution (first match wins):
//! 1. `LONGCAST_LOG_PATH` (full file path)
//! 2. `LONGCAST_LOG_DIR` (directory; file is `longcast.jsonl`)
//! 3. `log_dir` from configuration
//! 4. `<data-local-dir>/longcast/logs`

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

const LOG_FILE_NAME: &str = "longcast.jsonl";

/// Where log output goes.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Directory holding the JSONL log file.
    pub log_dir: Option<PathBuf>,
    /// Log file name inside `log_dir`.
    pub log_file: String,
    /// Most verbose level printed to stderr.
    pub console_level: LevelFilter,
}

impl ObservabilityConfig {
    /// Resolve log locations from the environment, then `config_log_dir`,
    /// then the platform default.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        let env_path = std::env::var_os("LONGCAST_LOG_PATH").map(PathBuf::from);
        let env_dir = std::env::var_os("LONGCAST_LOG_DIR").map(PathBuf::from);
        Self::resolve(env_path, env_dir, config_log_dir)
    }

    fn resolve(
        env_path: Option<PathBuf>,
        env_dir: Option<PathBuf>,
        config_log_dir: Option<PathBuf>,
    ) -> Self {
        let (log_dir, log_file) = match env_path {
            Some(path) => {
                let file = path
                    .file_name()
                    .map_or_else(|| LOG_FILE_NAME.to_string(), |f| f.to_string_lossy().into());
                (path.parent().map(Path::to_path_buf), file)
            }
            None => {
                let dir = env_dir.or(config_log_dir).or_else(|| {
                    longcast_core::config::user_data_local_dir()
                        .map(|dir| dir.join("logs").into_std_path_buf())
                });
                (dir, LOG_FILE_NAME.to_string())
            }
        };

        Self {
            log_dir,
            log_file,
            console_level: LevelFilter::WARN,
        }
    }

    /// Set the most verbose level printed to stderr.
    #[must_use]
    pub const fn with_console_level(mut self, level: LevelFilter) -> Self {
        self.console_level = level;
        self
    }
}

/// Stderr level for the `-q`/`-v` flags.
pub const fn console_level(quiet: bool, verbose: u8) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Global event filter.
///
/// `RUST_LOG` wins when set. Otherwise `-v` raises and `-q` lowers the
/// configured level.
pub fn env_filter(quiet: bool, verbose: u8, config_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => config_level,
            1 if matches!(config_level, "warn" | "error") => "info",
            1 => config_level,
            2 => "debug",
            _ => "trace",
        }
    };
    EnvFilter::new(level)
}

/// Keeps the background log writer alive; drop it last.
pub struct ObservabilityGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Install the global subscriber.
///
/// A log directory that cannot be created disables the file layer with a
/// warning instead of failing the command.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<ObservabilityGuard> {
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(config.console_level);

    let mut file_error = None;
    let (file_layer, file_guard) = match config.log_dir.as_deref() {
        Some(dir) => match std::fs::create_dir_all(dir) {
            Ok(()) => {
                let appender = tracing_appender::rolling::never(dir, &config.log_file);
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let layer = fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_current_span(true)
                    .with_span_list(false);
                (Some(layer), Some(guard))
            }
            Err(err) => {
                file_error = Some((dir.to_path_buf(), err));
                (None, None)
            }
        },
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    if let Some((dir, err)) = file_error {
        tracing::warn!(dir = %dir.display(), error = %err, "file logging disabled");
    }

    Ok(ObservabilityGuard {
        _file_guard: file_guard,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_path_splits_into_dir_and_file() {
        let config = ObservabilityConfig::resolve(
            Some(PathBuf::from("/var/log/longcast/run.jsonl")),
            Some(PathBuf::from("/ignored")),
            None,
        );
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/longcast")));
        assert_eq!(config.log_file, "run.jsonl");
    }

    #[test]
    fn env_dir_beats_config_dir() {
        let config = ObservabilityConfig::resolve(
            None,
            Some(PathBuf::from("/from/env")),
            Some(PathBuf::from("/from/config")),
        );
        assert_eq!(config.log_dir, Some(PathBuf::from("/from/env")));
        assert_eq!(config.log_file, LOG_FILE_NAME);
    }

    #[test]
    fn config_dir_used_without_env() {
        let config =
            ObservabilityConfig::resolve(None, None, Some(PathBuf::from("/from/config")));
        assert_eq!(config.log_dir, Some(PathBuf::from("/from/config")));
    }

    #[test]
    fn console_level_follows_flags() {
        assert_eq!(console_level(true, 3), LevelFilter::ERROR);
        assert_eq!(console_level(false, 0), LevelFilter::WARN);
        assert_eq!(console_level(false, 1), LevelFilter::INFO);
        assert_eq!(console_level(false, 2), LevelFilter::DEBUG);
        assert_eq!(console_level(false, 5), LevelFilter::TRACE);
    }
}
