//! Tuning run configuration.
//!
//! A config can be built in code, or loaded from a TOML file:
//!
//! ```toml
//! target_secs = 0.5
//! memory_ceiling_exponent = 18
//! families = ["argon2", "pbkdf2"]
//!
//! [pbkdf2]
//! reference_iterations = 64000
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::bounds::{Argon2Bounds, Pbkdf2Bounds, ScryptBounds};
use crate::error::{ConfigError, TuneError};
use crate::params::Family;

/// Default time budget per hash, in seconds.
pub const DEFAULT_TARGET_SECS: f64 = 0.25;

/// Memory exponent used when the caller does not give one (64 MiB).
pub const DEFAULT_MEMORY_CEILING_EXPONENT: u32 = 16;

/// Everything a tuning run needs besides the probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TuneConfig {
    /// Time budget for a single hash computation, in seconds.
    pub target_secs: f64,
    /// Memory ceiling for the memory-hard families, as a KiB exponent.
    pub memory_ceiling_exponent: Option<u32>,
    /// Ceiling used when `memory_ceiling_exponent` is not set.
    pub default_memory_ceiling_exponent: u32,
    /// Families to tune. Always run in [`Family`] declaration order.
    pub families: Vec<Family>,
    pub argon2: Argon2Bounds,
    pub scrypt: ScryptBounds,
    pub pbkdf2: Pbkdf2Bounds,
}

impl Default for TuneConfig {
    fn default() -> Self {
        Self {
            target_secs: DEFAULT_TARGET_SECS,
            memory_ceiling_exponent: None,
            default_memory_ceiling_exponent: DEFAULT_MEMORY_CEILING_EXPONENT,
            families: Family::iter().collect(),
            argon2: Argon2Bounds::default(),
            scrypt: ScryptBounds::default(),
            pbkdf2: Pbkdf2Bounds::default(),
        }
    }
}

impl TuneConfig {
    /// Parses a config from TOML text.
    ///
    /// ## Errors
    ///
    /// Returns `ConfigError::Parse` on malformed TOML or unknown keys.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Reads and parses a TOML config file.
    ///
    /// ## Errors
    ///
    /// Returns `ConfigError::Read` if the file cannot be read and
    /// `ConfigError::Parse` if it is not a valid config.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// The time budget as a `Duration`.
    ///
    /// ## Errors
    ///
    /// Returns `TuneError::InvalidTarget` unless `target_secs` is finite and positive.
    pub fn target(&self) -> Result<Duration, TuneError> {
        let secs = self.target_secs;
        if !secs.is_finite() || secs <= 0.0 {
            return Err(TuneError::InvalidTarget(secs));
        }
        Duration::try_from_secs_f64(secs).map_err(|_| TuneError::InvalidTarget(secs))
    }

    /// The memory ceiling to use, and whether it was defaulted.
    pub fn memory_ceiling(&self) -> (u32, bool) {
        match self.memory_ceiling_exponent {
            Some(exponent) => (exponent, false),
            None => (self.default_memory_ceiling_exponent, true),
        }
    }

    /// Enabled families, deduplicated and in tuning order.
    pub fn ordered_families(&self) -> Vec<Family> {
        Family::iter()
            .filter(|family| self.families.contains(family))
            .collect()
    }

    /// Validates every input before any probe runs.
    ///
    /// ## Errors
    ///
    /// Returns `InvalidTarget`, `NoFamilies` or `InvalidBounds`.
    pub fn validate(&self) -> Result<(), TuneError> {
        self.target()?;
        let families = self.ordered_families();
        if families.is_empty() {
            return Err(TuneError::NoFamilies);
        }
        for family in families {
            match family {
                Family::Argon2 => self.argon2.validate()?,
                Family::Scrypt => self.scrypt.validate()?,
                Family::Pbkdf2 => self.pbkdf2.validate()?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = TuneConfig::from_toml_str("").unwrap();
        assert_eq!(config, TuneConfig::default());
    }

    #[test]
    fn toml_overrides_selected_fields() {
        let config = TuneConfig::from_toml_str(
            r#"
            target_secs = 0.5
            memory_ceiling_exponent = 18
            families = ["pbkdf2", "argon2"]

            [pbkdf2]
            reference_iterations = 64000
            "#,
        )
        .unwrap();

        assert_eq!(config.target_secs, 0.5);
        assert_eq!(config.memory_ceiling(), (18, false));
        assert_eq!(
            config.ordered_families(),
            vec![Family::Argon2, Family::Pbkdf2]
        );
        assert_eq!(config.pbkdf2.reference_iterations, 64000);
        assert_eq!(config.pbkdf2.iterations_min, 10_000);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = TuneConfig::from_toml_str("target = 1.0");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "target_secs = 2.0").unwrap();

        let config = TuneConfig::load(file.path()).unwrap();
        assert_eq!(config.target().unwrap(), Duration::from_secs(2));
    }

    #[test]
    fn load_missing_file_reports_path() {
        let err = TuneConfig::load(Path::new("/nonexistent/htune.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/htune.toml"));
    }

    #[test]
    fn missing_ceiling_falls_back_to_default() {
        let config = TuneConfig::default();
        assert_eq!(
            config.memory_ceiling(),
            (DEFAULT_MEMORY_CEILING_EXPONENT, true)
        );
    }

    #[test]
    fn non_positive_targets_are_rejected() {
        for secs in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = TuneConfig {
                target_secs: secs,
                ..TuneConfig::default()
            };
            assert!(matches!(config.validate(), Err(TuneError::InvalidTarget(_))));
        }
    }

    #[test]
    fn empty_family_list_is_rejected() {
        let config = TuneConfig {
            families: Vec::new(),
            ..TuneConfig::default()
        };
        assert!(matches!(config.validate(), Err(TuneError::NoFamilies)));
    }

    #[test]
    fn bounds_of_disabled_families_are_ignored() {
        let mut config = TuneConfig {
            families: vec![Family::Pbkdf2],
            ..TuneConfig::default()
        };
        config.argon2.memory_min = 99;
        config.validate().unwrap();
    }
}
