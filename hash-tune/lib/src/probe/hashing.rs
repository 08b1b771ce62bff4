//! Real hashing probe backed by the RustCrypto password-hash crates.
//!
//! Each backend sits behind its feature flag:
//!
//! | Feature | Family | Crate |
//! |---------|--------|-------|
//! | `argon2id` | Argon2 | `argon2` |
//! | `scrypt` | scrypt | `scrypt` |
//! | `pbkdf2` | PBKDF2 | `pbkdf2` + `sha2` |
//!
//! Requesting a family whose backend is compiled out yields
//! `ProbeError::Unavailable`.

use std::time::{Duration, Instant};

#[cfg(any(feature = "argon2id", feature = "scrypt", feature = "pbkdf2"))]
use rand::{RngCore, rngs::OsRng};

use crate::error::ProbeError;
#[cfg(any(feature = "argon2id", feature = "scrypt", feature = "pbkdf2"))]
use crate::params::Family;
use crate::params::{Argon2Cost, CostParameters, Pbkdf2Cost, ScryptCost};
use crate::probe::Probe;

/// Salt length for every probe.
pub const SALT_LEN: usize = 16;

/// Input hashed by every probe; content does not affect timing.
const BENCHMARK_PASSWORD: &[u8] = b"hash-tune benchmark password";

/// Times real hash computations with a fresh random salt per probe.
#[derive(Debug, Default, Clone, Copy)]
pub struct HashProbe;

impl HashProbe {
    pub fn new() -> Self {
        Self
    }
}

impl Probe for HashProbe {
    fn run(&mut self, params: &CostParameters) -> Result<Duration, ProbeError> {
        match params {
            CostParameters::Argon2(cost) => argon2_once(cost),
            CostParameters::Scrypt(cost) => scrypt_once(cost),
            CostParameters::Pbkdf2(cost) => pbkdf2_once(cost),
        }
    }
}

#[cfg(any(feature = "argon2id", feature = "scrypt", feature = "pbkdf2"))]
fn fresh_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}

#[cfg(feature = "argon2id")]
fn argon2_once(cost: &Argon2Cost) -> Result<Duration, ProbeError> {
    use argon2::{Algorithm, Argon2, Params, Version};

    let invalid = |reason: String| ProbeError::InvalidParameters {
        family: Family::Argon2,
        reason,
    };

    let m_cost = u32::try_from(cost.memory_kib())
        .map_err(|_| invalid(format!("m_cost overflows at 2^{}", cost.memory_exponent)))?;
    let params = Params::new(m_cost, cost.time_cost, cost.threads, Some(32))
        .map_err(|e| invalid(e.to_string()))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let salt = fresh_salt();
    let mut output = [0u8; 32];

    let start = Instant::now();
    argon2
        .hash_password_into(BENCHMARK_PASSWORD, &salt, &mut output)
        .map_err(|e| ProbeError::Hash {
            family: Family::Argon2,
            reason: e.to_string(),
        })?;
    Ok(start.elapsed())
}

#[cfg(not(feature = "argon2id"))]
fn argon2_once(_cost: &Argon2Cost) -> Result<Duration, ProbeError> {
    Err(ProbeError::Unavailable {
        family: crate::params::Family::Argon2,
    })
}

/// scrypt parameters in the crate's native form.
#[cfg(feature = "scrypt")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScryptNative {
    log_n: u8,
    r: u32,
    p: u32,
}

/// Maps (opslimit, memlimit) to (log2 N, r, p) the way libsodium does, so the
/// recommended limits mean the same thing to a libsodium consumer.
#[cfg(feature = "scrypt")]
fn pick_scrypt_params(operation_limit: u64, memory_limit_bytes: u64) -> ScryptNative {
    const R: u32 = 8;

    let ops = operation_limit.max(32768);
    let smallest_log_n_above = |max_n: u64| -> u8 {
        let mut log_n = 1u8;
        while log_n < 63 && (1u64 << log_n) <= max_n / 2 {
            log_n += 1;
        }
        log_n
    };

    if ops < memory_limit_bytes / 32 {
        let log_n = smallest_log_n_above(ops / (u64::from(R) * 4));
        ScryptNative { log_n, r: R, p: 1 }
    } else {
        let log_n = smallest_log_n_above(memory_limit_bytes / (u64::from(R) * 128));
        let max_rp = ((ops / 4) >> log_n).min(0x3fff_ffff);
        let p = (max_rp as u32 / R).max(1);
        ScryptNative { log_n, r: R, p }
    }
}

#[cfg(feature = "scrypt")]
fn scrypt_once(cost: &ScryptCost) -> Result<Duration, ProbeError> {
    let invalid = |reason: String| ProbeError::InvalidParameters {
        family: Family::Scrypt,
        reason,
    };

    let memory_bytes = cost
        .memory_kib()
        .checked_mul(1024)
        .ok_or_else(|| invalid(format!("2^{} KiB overflows", cost.memory_exponent)))?;
    let native = pick_scrypt_params(cost.operation_limit, memory_bytes);
    let params = scrypt::Params::new(native.log_n, native.r, native.p, 32)
        .map_err(|e| invalid(e.to_string()))?;

    let salt = fresh_salt();
    let mut output = [0u8; 32];

    let start = Instant::now();
    scrypt::scrypt(BENCHMARK_PASSWORD, &salt, &params, &mut output).map_err(|e| {
        ProbeError::Hash {
            family: Family::Scrypt,
            reason: e.to_string(),
        }
    })?;
    Ok(start.elapsed())
}

#[cfg(not(feature = "scrypt"))]
fn scrypt_once(_cost: &ScryptCost) -> Result<Duration, ProbeError> {
    Err(ProbeError::Unavailable {
        family: crate::params::Family::Scrypt,
    })
}

#[cfg(feature = "pbkdf2")]
fn pbkdf2_once(cost: &Pbkdf2Cost) -> Result<Duration, ProbeError> {
    use crate::params::Pbkdf2Digest;
    use sha2::{Sha256, Sha512};

    if cost.iterations == 0 {
        return Err(ProbeError::InvalidParameters {
            family: Family::Pbkdf2,
            reason: "iteration count must be at least 1".to_string(),
        });
    }

    let salt = fresh_salt();
    let mut output = [0u8; 64];

    let start = Instant::now();
    match cost.digest {
        Pbkdf2Digest::Sha256 => {
            pbkdf2::pbkdf2_hmac::<Sha256>(BENCHMARK_PASSWORD, &salt, cost.iterations, &mut output)
        }
        Pbkdf2Digest::Sha512 => {
            pbkdf2::pbkdf2_hmac::<Sha512>(BENCHMARK_PASSWORD, &salt, cost.iterations, &mut output)
        }
    }
    Ok(start.elapsed())
}

#[cfg(not(feature = "pbkdf2"))]
fn pbkdf2_once(_cost: &Pbkdf2Cost) -> Result<Duration, ProbeError> {
    Err(ProbeError::Unavailable {
        family: crate::params::Family::Pbkdf2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Pbkdf2Digest;

    #[cfg(feature = "argon2id")]
    #[test]
    fn argon2_probe_measures_small_cost() {
        let params = CostParameters::Argon2(Argon2Cost {
            memory_exponent: 3,
            time_cost: 1,
            threads: 1,
        });
        let elapsed = HashProbe::new().run(&params).unwrap();
        assert!(elapsed > Duration::ZERO);
    }

    #[cfg(feature = "argon2id")]
    #[test]
    fn argon2_probe_rejects_zero_threads() {
        let params = CostParameters::Argon2(Argon2Cost {
            memory_exponent: 3,
            time_cost: 1,
            threads: 0,
        });
        let err = HashProbe::new().run(&params).unwrap_err();
        assert!(matches!(
            err,
            ProbeError::InvalidParameters {
                family: Family::Argon2,
                ..
            }
        ));
    }

    #[cfg(feature = "scrypt")]
    #[test]
    fn scrypt_derived_limits_map_to_single_lane() {
        // opslimit = 32 * memlimit_kib lands exactly on the memory-bound branch
        let cost = ScryptCost::for_memory(14);
        let native = pick_scrypt_params(cost.operation_limit, cost.memory_kib() * 1024);
        assert_eq!((native.log_n, native.r, native.p), (14, 8, 1));
    }

    #[cfg(feature = "scrypt")]
    #[test]
    fn scrypt_doubled_operations_double_lanes() {
        let cost = ScryptCost::for_memory(14);
        let native = pick_scrypt_params(cost.operation_limit * 2, cost.memory_kib() * 1024);
        assert_eq!((native.log_n, native.r, native.p), (14, 8, 2));
    }

    #[cfg(feature = "scrypt")]
    #[test]
    fn scrypt_low_operations_shrink_n() {
        let native = pick_scrypt_params(32768, 1 << 30);
        assert_eq!(native.p, 1);
        assert_eq!(native.log_n, 10);
    }

    #[cfg(feature = "scrypt")]
    #[test]
    fn scrypt_probe_measures_small_cost() {
        let params = CostParameters::Scrypt(ScryptCost::for_memory(8));
        let elapsed = HashProbe::new().run(&params).unwrap();
        assert!(elapsed > Duration::ZERO);
    }

    #[cfg(feature = "pbkdf2")]
    #[test]
    fn pbkdf2_probe_measures_both_digests() {
        for digest in [Pbkdf2Digest::Sha256, Pbkdf2Digest::Sha512] {
            let params = CostParameters::Pbkdf2(Pbkdf2Cost {
                digest,
                iterations: 1000,
            });
            let elapsed = HashProbe::new().run(&params).unwrap();
            assert!(elapsed > Duration::ZERO);
        }
    }

    #[cfg(feature = "pbkdf2")]
    #[test]
    fn pbkdf2_probe_rejects_zero_iterations() {
        let params = CostParameters::Pbkdf2(Pbkdf2Cost {
            digest: Pbkdf2Digest::Sha256,
            iterations: 0,
        });
        assert!(HashProbe::new().run(&params).is_err());
    }

    #[cfg(not(feature = "pbkdf2"))]
    #[test]
    fn pbkdf2_probe_is_unavailable_without_backend() {
        let params = CostParameters::Pbkdf2(Pbkdf2Cost {
            digest: Pbkdf2Digest::Sha256,
            iterations: 1000,
        });
        assert!(matches!(
            HashProbe::new().run(&params),
            Err(ProbeError::Unavailable { .. })
        ));
    }
}
