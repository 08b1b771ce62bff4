use std::path::PathBuf;

use thiserror::Error;

use crate::params::Family;

/// Errors returned by a single probe run.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The hashing backend for this family was not compiled in.
    #[error("{family} backend is not available in this build")]
    Unavailable {
        /// The family that was requested.
        family: Family,
    },

    /// The backend rejected the cost parameters.
    #[error("invalid {family} parameters: {reason}")]
    InvalidParameters {
        /// The family being probed.
        family: Family,
        /// Backend-provided description.
        reason: String,
    },

    /// The hash computation itself failed.
    #[error("{family} hashing failed: {reason}")]
    Hash {
        /// The family being probed.
        family: Family,
        /// Backend-provided description.
        reason: String,
    },
}

/// Errors returned while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config '{}': {source}", path.display())]
    Read {
        /// Path of the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// The file contents are not valid TOML for a tuning config.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Errors that stop a tuning run.
#[derive(Debug, Error)]
pub enum TuneError {
    /// The time budget is zero, negative, or not a finite number.
    #[error("target time must be a positive number of seconds, got {0}")]
    InvalidTarget(f64),

    /// No algorithm family was selected.
    #[error("no algorithm families selected")]
    NoFamilies,

    /// A bound table is inconsistent.
    #[error("invalid {family} bounds: {reason}")]
    InvalidBounds {
        /// The family whose bounds are inconsistent.
        family: Family,
        /// What is wrong with them.
        reason: String,
    },

    /// A probe failed; the run was aborted.
    #[error("benchmark failed for {family}: {source}")]
    ProbeFailed {
        /// The family whose probe failed.
        family: Family,
        /// The probe failure.
        source: ProbeError,
    },

    /// Loading configuration failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
