//! Per-family cost bounds.
//!
//! Bounds are fixed for the duration of a run. The defaults stay inside what
//! the RustCrypto backends accept.

use serde::{Deserialize, Serialize};

use crate::error::TuneError;
use crate::params::{Family, SCRYPT_OPS_PER_KIB};

/// Largest memory exponent any family accepts (2^40 KiB).
pub const MAX_MEMORY_EXPONENT: u32 = 40;

/// Default Argon2 minimum memory exponent (8 KiB).
pub const ARGON2_MEMORY_MIN: u32 = 3;
/// Default Argon2 maximum memory exponent; the argon2 crate caps `m_cost` below 2^28.
pub const ARGON2_MEMORY_MAX: u32 = 27;
/// Default Argon2 minimum time cost.
pub const ARGON2_TIME_MIN: u32 = 1;
/// Default Argon2 maximum time cost.
pub const ARGON2_TIME_MAX: u32 = 65536;

/// Default scrypt minimum memory exponent (16 MiB).
pub const SCRYPT_MEMORY_MIN: u32 = 14;
/// Default scrypt maximum memory exponent.
pub const SCRYPT_MEMORY_MAX: u32 = 30;
/// Default scrypt minimum operation limit.
pub const SCRYPT_OPERATIONS_MIN: u64 = 32768;
/// Default scrypt maximum operation limit, the derived limit at the largest memory.
pub const SCRYPT_OPERATIONS_MAX: u64 = SCRYPT_OPS_PER_KIB << SCRYPT_MEMORY_MAX;

/// Default PBKDF2 minimum iteration count.
pub const PBKDF2_ITERATIONS_MIN: u32 = 10_000;
/// Default PBKDF2 maximum iteration count.
pub const PBKDF2_ITERATIONS_MAX: u32 = 5_000_000;

/// Bounds for the Argon2 search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Argon2Bounds {
    pub memory_min: u32,
    pub memory_max: u32,
    pub time_min: u32,
    pub time_max: u32,
}

impl Default for Argon2Bounds {
    fn default() -> Self {
        Self {
            memory_min: ARGON2_MEMORY_MIN,
            memory_max: ARGON2_MEMORY_MAX,
            time_min: ARGON2_TIME_MIN,
            time_max: ARGON2_TIME_MAX,
        }
    }
}

impl Argon2Bounds {
    /// Checks that the ranges are non-empty and usable.
    pub fn validate(&self) -> Result<(), TuneError> {
        check_memory(Family::Argon2, self.memory_min, self.memory_max)?;
        if self.time_min == 0 {
            return Err(invalid(Family::Argon2, "time_min must be at least 1"));
        }
        if self.time_min > self.time_max {
            return Err(invalid(Family::Argon2, "time_min exceeds time_max"));
        }
        Ok(())
    }
}

/// Bounds for the scrypt search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScryptBounds {
    pub memory_min: u32,
    pub memory_max: u32,
    pub operations_min: u64,
    pub operations_max: u64,
}

impl Default for ScryptBounds {
    fn default() -> Self {
        Self {
            memory_min: SCRYPT_MEMORY_MIN,
            memory_max: SCRYPT_MEMORY_MAX,
            operations_min: SCRYPT_OPERATIONS_MIN,
            operations_max: SCRYPT_OPERATIONS_MAX,
        }
    }
}

impl ScryptBounds {
    /// Checks that the ranges are non-empty and usable.
    pub fn validate(&self) -> Result<(), TuneError> {
        check_memory(Family::Scrypt, self.memory_min, self.memory_max)?;
        if self.operations_min == 0 {
            return Err(invalid(Family::Scrypt, "operations_min must be at least 1"));
        }
        if self.operations_min > self.operations_max {
            return Err(invalid(Family::Scrypt, "operations_min exceeds operations_max"));
        }
        // every start and shrink step uses the operation limit derived from memory
        let lowest = SCRYPT_OPS_PER_KIB << self.memory_min;
        let highest = SCRYPT_OPS_PER_KIB << self.memory_max;
        if lowest < self.operations_min || highest > self.operations_max {
            return Err(invalid(
                Family::Scrypt,
                "memory range derives operation limits outside operations_min..=operations_max",
            ));
        }
        Ok(())
    }
}

/// Bounds for the PBKDF2 search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Pbkdf2Bounds {
    pub iterations_min: u32,
    pub iterations_max: u32,
    /// Iteration count both digests are first measured at.
    pub reference_iterations: u32,
}

impl Default for Pbkdf2Bounds {
    fn default() -> Self {
        Self {
            iterations_min: PBKDF2_ITERATIONS_MIN,
            iterations_max: PBKDF2_ITERATIONS_MAX,
            reference_iterations: PBKDF2_ITERATIONS_MAX,
        }
    }
}

impl Pbkdf2Bounds {
    /// Checks that the ranges are non-empty and the reference lies inside them.
    pub fn validate(&self) -> Result<(), TuneError> {
        if self.iterations_min == 0 {
            return Err(invalid(Family::Pbkdf2, "iterations_min must be at least 1"));
        }
        if self.iterations_min > self.iterations_max {
            return Err(invalid(Family::Pbkdf2, "iterations_min exceeds iterations_max"));
        }
        if !(self.iterations_min..=self.iterations_max).contains(&self.reference_iterations) {
            return Err(invalid(
                Family::Pbkdf2,
                "reference_iterations must lie within the iteration bounds",
            ));
        }
        Ok(())
    }
}

fn check_memory(family: Family, min: u32, max: u32) -> Result<(), TuneError> {
    if min > max {
        return Err(invalid(family, "memory_min exceeds memory_max"));
    }
    if max > MAX_MEMORY_EXPONENT {
        return Err(invalid(
            family,
            &format!("memory_max may not exceed {MAX_MEMORY_EXPONENT}"),
        ));
    }
    Ok(())
}

fn invalid(family: Family, reason: &str) -> TuneError {
    TuneError::InvalidBounds {
        family,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        Argon2Bounds::default().validate().unwrap();
        ScryptBounds::default().validate().unwrap();
        Pbkdf2Bounds::default().validate().unwrap();
    }

    #[test]
    fn inverted_memory_range_is_rejected() {
        let bounds = Argon2Bounds {
            memory_min: 20,
            memory_max: 10,
            ..Argon2Bounds::default()
        };
        let err = bounds.validate().unwrap_err();
        assert!(matches!(
            err,
            TuneError::InvalidBounds {
                family: Family::Argon2,
                ..
            }
        ));
    }

    #[test]
    fn oversized_memory_exponent_is_rejected() {
        let bounds = ScryptBounds {
            memory_max: MAX_MEMORY_EXPONENT + 1,
            ..ScryptBounds::default()
        };
        assert!(bounds.validate().is_err());
    }

    #[test]
    fn default_scrypt_operations_cover_every_derived_limit() {
        let bounds = ScryptBounds::default();
        assert_eq!(bounds.operations_max, 1u64 << 35);
        bounds.validate().unwrap();
    }

    #[test]
    fn scrypt_memory_range_outside_operation_range_is_rejected() {
        let too_small = ScryptBounds {
            memory_min: 8,
            ..ScryptBounds::default()
        };
        let err = too_small.validate().unwrap_err();
        assert!(err.to_string().contains("derives operation limits"));

        let too_large = ScryptBounds {
            operations_max: u64::from(u32::MAX),
            ..ScryptBounds::default()
        };
        assert!(too_large.validate().is_err());
    }

    #[test]
    fn zero_time_cost_is_rejected() {
        let bounds = Argon2Bounds {
            time_min: 0,
            ..Argon2Bounds::default()
        };
        assert!(bounds.validate().is_err());
    }

    #[test]
    fn reference_outside_iteration_bounds_is_rejected() {
        let bounds = Pbkdf2Bounds {
            reference_iterations: 1000,
            ..Pbkdf2Bounds::default()
        };
        let err = bounds.validate().unwrap_err();
        assert!(err.to_string().contains("reference_iterations"));
    }
}
