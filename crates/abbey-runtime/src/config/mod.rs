//! Abbey configuration
//!
//! Compile-time defaults with runtime environment overrides.
//!
//! # Configuration Priority (highest wins)
//!
//! 1. Builder calls
//! 2. Environment variables (`from_env`)
//! 3. Library defaults
//!
//! # Example
//!
//! ```rust,ignore
//! use abbey_runtime::config::AbbeyConfig;
//!
//! let config = AbbeyConfig::from_env()
//!     .num_workers(3)
//!     .cycle_budget(64);
//! ```

pub mod defaults;

use abbey_core::constants::{MAX_TASK_SLOTS, MAX_WORKERS};
use abbey_core::env::{env_get, env_get_bool};
use abbey_core::error::AbbeyError;

/// Pool, table and budget sizing for one abbey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbbeyConfig {
    /// Number of workers, fixed for the lifetime of the abbey
    pub num_workers: usize,
    /// Number of task slots, fixed for the lifetime of the abbey
    pub task_capacity: usize,
    /// Resumes performed before the scheduler terminates
    pub cycle_budget: u64,
    /// Log every control transfer at debug level
    pub debug_logging: bool,
}

impl Default for AbbeyConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl AbbeyConfig {
    /// Create config from defaults with environment overrides.
    ///
    /// Environment variables (all optional):
    /// - `ABBEY_NUM_WORKERS` - Number of workers
    /// - `ABBEY_TASK_CAPACITY` - Number of task slots
    /// - `ABBEY_CYCLE_BUDGET` - Scheduling cycles before termination
    /// - `ABBEY_DEBUG` - Enable debug logging (0/1)
    pub fn from_env() -> Self {
        Self {
            num_workers: env_get("ABBEY_NUM_WORKERS", defaults::NUM_WORKERS),
            task_capacity: env_get("ABBEY_TASK_CAPACITY", defaults::TASK_CAPACITY),
            cycle_budget: env_get("ABBEY_CYCLE_BUDGET", defaults::CYCLE_BUDGET),
            debug_logging: env_get_bool("ABBEY_DEBUG", defaults::DEBUG_LOGGING),
        }
    }

    /// Create config with explicit defaults (no env override).
    pub fn new() -> Self {
        Self {
            num_workers: defaults::NUM_WORKERS,
            task_capacity: defaults::TASK_CAPACITY,
            cycle_budget: defaults::CYCLE_BUDGET,
            debug_logging: defaults::DEBUG_LOGGING,
        }
    }

    // Builder methods

    pub fn num_workers(mut self, n: usize) -> Self {
        self.num_workers = n;
        self
    }

    pub fn task_capacity(mut self, n: usize) -> Self {
        self.task_capacity = n;
        self
    }

    pub fn cycle_budget(mut self, cycles: u64) -> Self {
        self.cycle_budget = cycles;
        self
    }

    pub fn debug_logging(mut self, enable: bool) -> Self {
        self.debug_logging = enable;
        self
    }

    /// Validate configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_workers == 0 {
            return Err(ConfigError::InvalidValue("num_workers must be > 0"));
        }
        if self.num_workers > MAX_WORKERS {
            return Err(ConfigError::InvalidValue("num_workers must be <= 256"));
        }
        if self.task_capacity == 0 {
            return Err(ConfigError::InvalidValue("task_capacity must be > 0"));
        }
        if self.task_capacity > MAX_TASK_SLOTS {
            return Err(ConfigError::InvalidValue("task_capacity must be <= 1048576"));
        }
        Ok(())
    }

    /// Print configuration (for debugging)
    pub fn print(&self) {
        eprintln!("Abbey Configuration:");
        eprintln!("  num_workers:    {}", self.num_workers);
        eprintln!("  task_capacity:  {}", self.task_capacity);
        eprintln!("  cycle_budget:   {}", self.cycle_budget);
        eprintln!("  debug_logging:  {}", self.debug_logging);
    }
}

/// Configuration error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for AbbeyError {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::InvalidValue(msg) => AbbeyError::InvalidConfig(msg),
        }
    }
}
