//! Adaptive cost-parameter tuning for password hashing.
//!
//! Given a time budget per hash and a memory ceiling, this crate searches each
//! algorithm family's parameter space for the most expensive configuration
//! that still completes within budget on this machine:
//!
//! - **Argon2id**: largest memory first, then more passes
//! - **scrypt**: largest memory first, then more operations
//! - **PBKDF2**: faster digest, then as many iterations as fit
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `argon2id` | Yes | Argon2id backend for [`HashProbe`] |
//! | `scrypt` | Yes | scrypt backend for [`HashProbe`] |
//! | `pbkdf2` | Yes | PBKDF2-HMAC-SHA2 backend for [`HashProbe`] |
//!
//! The search itself needs no backend: any [`Probe`] works, including a
//! closure, which is how the searches are tested against synthetic cost models.
//!
//! ## Examples
//!
//! ```rust
//! use std::time::Duration;
//! use hash_tune::{CostParameters, Family, ProbeError, TuneConfig, Tuner};
//!
//! let config = TuneConfig {
//!     target_secs: 0.5,
//!     memory_ceiling_exponent: Some(16),
//!     families: vec![Family::Argon2],
//!     ..TuneConfig::default()
//! };
//!
//! // Each Argon2 pass over 2^16 KiB takes 100ms
//! let mut probe = |params: &CostParameters| -> Result<Duration, ProbeError> {
//!     match params {
//!         CostParameters::Argon2(cost) => Ok(Duration::from_millis(100) * cost.time_cost),
//!         _ => unreachable!(),
//!     }
//! };
//!
//! let report = Tuner::new(config).run(&mut probe).unwrap();
//! let argon2 = report.recommendation(Family::Argon2).unwrap();
//! assert_eq!(argon2.elapsed, Duration::from_millis(500));
//! ```

pub mod bounds;
pub mod config;
pub mod error;
pub mod params;
pub mod probe;
pub mod report;
pub mod search;
pub mod strategy;
pub mod tuner;

pub use bounds::{Argon2Bounds, Pbkdf2Bounds, ScryptBounds};
pub use config::TuneConfig;
pub use error::{ConfigError, ProbeError, TuneError};
pub use params::{Argon2Cost, CostParameters, Family, Pbkdf2Cost, Pbkdf2Digest, ScryptCost};
pub use probe::{HashProbe, Probe};
pub use tuner::{Recommendation, TuneReport, Tuner, Warning};
