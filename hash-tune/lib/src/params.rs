//! Cost parameter encodings for each supported algorithm family.
//!
//! Memory-hard families express memory as a power-of-two exponent of KiB, so
//! `memory_exponent = 20` means 2^20 KiB (1 GiB).

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Ratio between scrypt's operation limit and its memory in KiB.
pub const SCRYPT_OPS_PER_KIB: u64 = 32;

/// Step applied to PBKDF2 iteration counts.
pub const PBKDF2_ITERATION_STEP: u32 = 1000;

/// A password-hashing algorithm family.
///
/// Variants are declared in tuning order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    /// Argon2id: memory exponent and time cost.
    Argon2,
    /// scrypt: memory exponent and operation limit.
    Scrypt,
    /// PBKDF2-HMAC: digest and iteration count.
    Pbkdf2,
}

impl Family {
    /// Whether the family's cost includes a memory exponent.
    pub fn is_memory_hard(self) -> bool {
        matches!(self, Family::Argon2 | Family::Scrypt)
    }
}

/// Digest primitive used inside PBKDF2's HMAC.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum Pbkdf2Digest {
    Sha256,
    Sha512,
}

/// Argon2id cost: `2^memory_exponent` KiB, `time_cost` passes, `threads` lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argon2Cost {
    pub memory_exponent: u32,
    pub time_cost: u32,
    pub threads: u32,
}

impl Argon2Cost {
    /// Memory usage in KiB.
    pub fn memory_kib(&self) -> u64 {
        1u64 << self.memory_exponent
    }
}

/// scrypt cost in libsodium's (memlimit, opslimit) form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScryptCost {
    pub memory_exponent: u32,
    pub operation_limit: u64,
}

impl ScryptCost {
    /// Builds a cost whose operation limit is derived from the memory size.
    pub fn for_memory(memory_exponent: u32) -> Self {
        Self {
            memory_exponent,
            operation_limit: SCRYPT_OPS_PER_KIB << memory_exponent,
        }
    }

    /// Memory limit in KiB.
    pub fn memory_kib(&self) -> u64 {
        1u64 << self.memory_exponent
    }
}

/// PBKDF2 cost: digest and iteration count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pbkdf2Cost {
    pub digest: Pbkdf2Digest,
    pub iterations: u32,
}

/// A fully specified parameter set for one family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "lowercase")]
pub enum CostParameters {
    Argon2(Argon2Cost),
    Scrypt(ScryptCost),
    Pbkdf2(Pbkdf2Cost),
}

impl CostParameters {
    /// The family these parameters belong to.
    pub fn family(&self) -> Family {
        match self {
            CostParameters::Argon2(_) => Family::Argon2,
            CostParameters::Scrypt(_) => Family::Scrypt,
            CostParameters::Pbkdf2(_) => Family::Pbkdf2,
        }
    }
}

impl From<Argon2Cost> for CostParameters {
    fn from(cost: Argon2Cost) -> Self {
        CostParameters::Argon2(cost)
    }
}

impl From<ScryptCost> for CostParameters {
    fn from(cost: ScryptCost) -> Self {
        CostParameters::Scrypt(cost)
    }
}

impl From<Pbkdf2Cost> for CostParameters {
    fn from(cost: Pbkdf2Cost) -> Self {
        CostParameters::Pbkdf2(cost)
    }
}
