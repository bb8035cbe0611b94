//! Tracing subscriber setup.
//!
//! Events go to stderr, filtered by `RUST_LOG` or the verbosity flag.
//! Optionally, a daily rolling log file is written as well, by default to
//! `~/.local/share/coding-agent/logs/`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Application name used for the log directory and file name.
const APP_NAME: &str = "coding-agent";

/// Logging configuration.
///
/// # Example
///
/// ```rust
/// use coding_agent::logging::LoggingConfig;
///
/// let config = LoggingConfig::new().with_verbose(true).with_file(false);
/// assert_eq!(config.default_directive(), "info");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Raise the default stderr level from `warn` to `info`.
    pub verbose: bool,
    /// Whether the rolling log file is written.
    pub file: bool,
    /// Custom log directory. If None, uses the XDG data dir.
    pub log_dir: Option<PathBuf>,
}

impl LoggingConfig {
    /// Creates a new LoggingConfig with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets verbose mode.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Enables or disables the log file.
    #[must_use]
    pub fn with_file(mut self, file: bool) -> Self {
        self.file = file;
        self
    }

    /// Sets a custom log directory.
    #[must_use]
    pub fn with_log_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(path.into());
        self
    }

    /// The filter directive used when `RUST_LOG` is unset.
    #[must_use]
    pub fn default_directive(&self) -> &'static str {
        if self.verbose {
            "info"
        } else {
            "warn"
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            file: true,
            log_dir: None,
        }
    }
}

/// Guard that must be held to keep file logging active.
pub struct LoggingGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}

impl fmt::Debug for LoggingGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingGuard").finish_non_exhaustive()
    }
}

/// Keeps the file writer alive for the process lifetime.
static LOGGING_GUARD: std::sync::OnceLock<LoggingGuard> = std::sync::OnceLock::new();

/// Errors that can occur during logging initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingError {
    /// The specific error that occurred.
    pub kind: LoggingErrorKind,
}

/// Specific logging error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingErrorKind {
    /// Failed to determine XDG data directory.
    NoDataDir,
    /// Failed to create log directory.
    CreateDirFailed {
        /// The path that could not be created.
        path: PathBuf,
        /// The reason for failure.
        reason: String,
    },
    /// Subscriber initialization failed.
    SubscriberInitFailed {
        /// The reason for failure.
        reason: String,
    },
}

impl LoggingError {
    /// Creates a new LoggingError with the given kind.
    #[must_use]
    pub fn new(kind: LoggingErrorKind) -> Self {
        Self { kind }
    }

    /// Creates an error for failed directory creation.
    #[must_use]
    pub fn create_dir_failed(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::new(LoggingErrorKind::CreateDirFailed {
            path,
            reason: reason.into(),
        })
    }

    /// Creates an error for subscriber initialization failure.
    #[must_use]
    pub fn subscriber_init_failed(reason: impl Into<String>) -> Self {
        Self::new(LoggingErrorKind::SubscriberInitFailed {
            reason: reason.into(),
        })
    }
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LoggingErrorKind::NoDataDir => write!(
                f,
                "could not determine XDG data directory; \
                 set XDG_DATA_HOME or configure logging.log_dir"
            ),
            LoggingErrorKind::CreateDirFailed { path, reason } => write!(
                f,
                "failed to create log directory '{}': {reason}; check permissions",
                path.display()
            ),
            LoggingErrorKind::SubscriberInitFailed { reason } => write!(
                f,
                "failed to initialize tracing subscriber: {reason}; \
                 a subscriber may already be set"
            ),
        }
    }
}

impl std::error::Error for LoggingError {}

/// Resolves the log directory from configuration.
///
/// # Errors
///
/// Returns `NoDataDir` if no custom directory is set and the platform data
/// directory cannot be determined.
pub fn log_dir(config: &LoggingConfig) -> Result<PathBuf, LoggingError> {
    if let Some(ref custom_dir) = config.log_dir {
        return Ok(custom_dir.clone());
    }

    dirs::data_local_dir()
        .map(|dir| dir.join(APP_NAME).join("logs"))
        .ok_or_else(|| LoggingError::new(LoggingErrorKind::NoDataDir))
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns `LoggingError` if the log directory cannot be created or a
/// subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter =
        || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.default_directive()));

    let stderr = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter());

    let (file, guard) = if config.file {
        let dir = log_dir(config)?;
        std::fs::create_dir_all(&dir)
            .map_err(|e| LoggingError::create_dir_failed(dir.clone(), e.to_string()))?;
        let appender = tracing_appender::rolling::daily(&dir, format!("{APP_NAME}.log"));
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_filter(filter());
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(stderr)
        .with(file)
        .try_init()
        .map_err(|e| LoggingError::subscriber_init_failed(e.to_string()))?;

    if let Some(guard) = guard {
        let _ = LOGGING_GUARD.set(LoggingGuard { _guard: guard });
    }
    Ok(())
}
