//! The timing primitive the searches are driven by.
//!
//! A [`Probe`] runs exactly one hash computation for a fully specified
//! parameter set and reports how long it took. The searches assume elapsed
//! time grows with cost and never re-check that assumption.

use std::time::Duration;

use crate::error::ProbeError;
use crate::params::CostParameters;

pub mod hashing;

pub use hashing::HashProbe;

/// Runs one timed hash computation.
pub trait Probe {
    /// Hashes once with `params` and returns the elapsed wall-clock time.
    ///
    /// ## Errors
    ///
    /// Any error is treated as a misconfigured environment and aborts the run.
    fn run(&mut self, params: &CostParameters) -> Result<Duration, ProbeError>;
}

/// Closures make convenient synthetic probes.
impl<F> Probe for F
where
    F: FnMut(&CostParameters) -> Result<Duration, ProbeError>,
{
    fn run(&mut self, params: &CostParameters) -> Result<Duration, ProbeError> {
        self(params)
    }
}
