//! Host configuration.
//!
//! Read from environment variables at startup:
//! - `PYTRACE_PYTHON`: interpreter executable (default: `python3`, then `python`)
//! - `PYTRACE_TIMEOUT_MS`: per-run deadline in milliseconds (default: 10000, `0` disables)

use std::path::PathBuf;
use std::time::Duration;

use crate::error::HostError;

/// Per-run deadline applied when nothing else is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Executables tried, in order, when no interpreter is configured.
pub const DEFAULT_CANDIDATES: &[&str] = &["python3", "python"];

pub const PYTHON_ENV: &str = "PYTRACE_PYTHON";
pub const TIMEOUT_ENV: &str = "PYTRACE_TIMEOUT_MS";

/// Settings for an [`InterpreterHost`](crate::host::InterpreterHost).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// Explicit interpreter path. `None` searches [`DEFAULT_CANDIDATES`] on `PATH`.
    pub python: Option<PathBuf>,
    /// Deadline for a single program run. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl Default for HostConfig {
    fn default() -> Self {
        HostConfig {
            python: None,
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

impl HostConfig {
    /// Builds a config from `PYTRACE_PYTHON` and `PYTRACE_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self, HostError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, HostError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = HostConfig::default();

        if let Some(python) = lookup(PYTHON_ENV).filter(|v| !v.trim().is_empty()) {
            config.python = Some(PathBuf::from(python.trim()));
        }

        if let Some(raw) = lookup(TIMEOUT_ENV) {
            config.timeout = parse_timeout_ms(&raw)?;
        }

        Ok(config)
    }

    pub fn with_python(mut self, python: impl Into<PathBuf>) -> Self {
        self.python = Some(python.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Executables to try, in order.
    pub fn candidates(&self) -> Vec<PathBuf> {
        match &self.python {
            Some(path) => vec![path.clone()],
            None => DEFAULT_CANDIDATES.iter().map(PathBuf::from).collect(),
        }
    }
}

/// Parses a millisecond count; `0` means no deadline.
pub fn parse_timeout_ms(raw: &str) -> Result<Option<Duration>, HostError> {
    let ms: u64 = raw.trim().parse().map_err(|_| {
        HostError::InvalidConfig(format!(
            "{} must be a whole number of milliseconds, got '{}'",
            TIMEOUT_ENV, raw
        ))
    })?;
    Ok(match ms {
        0 => None,
        ms => Some(Duration::from_millis(ms)),
    })
}
