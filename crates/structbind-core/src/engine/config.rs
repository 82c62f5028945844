use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_TIMEOUT: Duration = Duration::from_millis(10_000);
pub const DEFAULT_PER_FILE_TIMEOUT: Duration = Duration::from_millis(1_000);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);
pub const DEFAULT_MIN_FIT_COLUMNS: usize = 3;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: &'static str,
    },
}

/// Timing of the structure-load wait gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    pub base_timeout: Duration,
    pub per_file_timeout: Duration,
    pub poll_interval: Duration,
}

impl WaitConfig {
    /// Total time allowed for `file_count` structure files to load.
    pub fn deadline_for(&self, file_count: usize) -> Duration {
        self.base_timeout + self.per_file_timeout * file_count as u32
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            base_timeout: DEFAULT_BASE_TIMEOUT,
            per_file_timeout: DEFAULT_PER_FILE_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuperposeConfig {
    pub wait: WaitConfig,
    pub min_fit_columns: usize,
}

impl Default for SuperposeConfig {
    fn default() -> Self {
        Self {
            wait: WaitConfig::default(),
            min_fit_columns: DEFAULT_MIN_FIT_COLUMNS,
        }
    }
}

#[derive(Default)]
pub struct SuperposeConfigBuilder {
    base_timeout: Option<Duration>,
    per_file_timeout: Option<Duration>,
    poll_interval: Option<Duration>,
    min_fit_columns: Option<usize>,
}

impl SuperposeConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_timeout(mut self, timeout: Duration) -> Self {
        self.base_timeout = Some(timeout);
        self
    }
    pub fn per_file_timeout(mut self, timeout: Duration) -> Self {
        self.per_file_timeout = Some(timeout);
        self
    }
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }
    pub fn min_fit_columns(mut self, columns: usize) -> Self {
        self.min_fit_columns = Some(columns);
        self
    }

    pub fn build(self) -> Result<SuperposeConfig, ConfigError> {
        let poll_interval = self.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL);
        if poll_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                parameter: "poll_interval",
                reason: "must be greater than zero",
            });
        }
        let min_fit_columns = self.min_fit_columns.unwrap_or(DEFAULT_MIN_FIT_COLUMNS);
        if min_fit_columns == 0 {
            return Err(ConfigError::InvalidValue {
                parameter: "min_fit_columns",
                reason: "at least one fit column is required",
            });
        }
        Ok(SuperposeConfig {
            wait: WaitConfig {
                base_timeout: self.base_timeout.unwrap_or(DEFAULT_BASE_TIMEOUT),
                per_file_timeout: self.per_file_timeout.unwrap_or(DEFAULT_PER_FILE_TIMEOUT),
                poll_interval,
            },
            min_fit_columns,
        })
    }
}
