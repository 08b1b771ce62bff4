//! PBKDF2: pick the faster digest, extrapolate linearly, then step down.
//!
//! Iteration count scales almost perfectly linearly with runtime, so a single
//! measurement at the reference count predicts the target count closely. The
//! search only ever steps down from the estimate; there is no grow phase.

use std::time::Duration;

use tracing::{info, instrument};

use crate::bounds::Pbkdf2Bounds;
use crate::error::TuneError;
use crate::params::{Family, PBKDF2_ITERATION_STEP, Pbkdf2Cost, Pbkdf2Digest};
use crate::probe::Probe;
use crate::search::{CostSurface, Found, Shrunk, measure, shrink_until_within};

/// Iterations step down by [`PBKDF2_ITERATION_STEP`], stopping exactly on the
/// minimum, and never grow.
#[derive(Debug, Clone, Copy)]
pub struct Pbkdf2Surface {
    bounds: Pbkdf2Bounds,
}

impl Pbkdf2Surface {
    pub fn new(bounds: Pbkdf2Bounds) -> Self {
        Self { bounds }
    }
}

impl CostSurface for Pbkdf2Surface {
    type Cost = Pbkdf2Cost;

    fn family(&self) -> Family {
        Family::Pbkdf2
    }

    fn shrink(&self, cost: &Pbkdf2Cost) -> Option<Pbkdf2Cost> {
        let floor = self.bounds.iterations_min;
        if cost.iterations <= floor {
            return None;
        }
        let stepped = cost.iterations.saturating_sub(PBKDF2_ITERATION_STEP);
        Some(Pbkdf2Cost {
            iterations: stepped.max(floor),
            ..*cost
        })
    }

    fn grow(&self, _cost: &Pbkdf2Cost) -> Option<Pbkdf2Cost> {
        None
    }

    fn in_bounds(&self, cost: &Pbkdf2Cost) -> bool {
        (self.bounds.iterations_min..=self.bounds.iterations_max).contains(&cost.iterations)
    }
}

/// Extrapolates the iteration count that should take `target`, given that
/// `reference` iterations took `baseline`.
///
/// The estimate is rounded down to a multiple of [`PBKDF2_ITERATION_STEP`],
/// never exceeds `reference`, and never drops below `iterations_min`.
pub fn estimate_iterations(bounds: &Pbkdf2Bounds, baseline: Duration, target: Duration) -> u32 {
    let reference = bounds.reference_iterations;
    if baseline.is_zero() {
        return reference;
    }

    let scaled = f64::from(reference) * (target.as_secs_f64() / baseline.as_secs_f64());
    // float-to-int casts saturate, so huge ratios land on u32::MAX
    let raw = scaled as u32;
    let rounded = raw - raw % PBKDF2_ITERATION_STEP;

    rounded.min(reference).max(bounds.iterations_min)
}

/// Picks the faster digest at the reference iteration count.
///
/// SHA-512 is measured first and kept on a tie.
///
/// ## Errors
///
/// Returns `TuneError::ProbeFailed` if either probe fails.
pub fn select_digest<P>(
    probe: &mut P,
    bounds: &Pbkdf2Bounds,
) -> Result<(Pbkdf2Digest, Duration), TuneError>
where
    P: Probe + ?Sized,
{
    let surface = Pbkdf2Surface::new(*bounds);
    let at_reference = |digest| Pbkdf2Cost {
        digest,
        iterations: bounds.reference_iterations,
    };

    let sha512 = measure(&surface, probe, at_reference(Pbkdf2Digest::Sha512))?;
    let sha256 = measure(&surface, probe, at_reference(Pbkdf2Digest::Sha256))?;

    if sha256.elapsed < sha512.elapsed {
        Ok((Pbkdf2Digest::Sha256, sha256.elapsed))
    } else {
        Ok((Pbkdf2Digest::Sha512, sha512.elapsed))
    }
}

/// Tunes PBKDF2: digest selection, linear estimate, then a decrement loop.
///
/// ## Errors
///
/// Returns `TuneError::ProbeFailed` if any probe fails.
#[instrument(skip(probe, bounds))]
pub fn tune<P>(
    probe: &mut P,
    bounds: &Pbkdf2Bounds,
    target: Duration,
) -> Result<Found<Pbkdf2Cost>, TuneError>
where
    P: Probe + ?Sized,
{
    info!(
        "beginning PBKDF2 search; if SASL SCRAM logins are offered, SCRAM parameter advice takes precedence"
    );

    let (digest, baseline) = select_digest(probe, bounds)?;
    let iterations = estimate_iterations(bounds, baseline, target);
    info!(
        %digest,
        baseline_ms = baseline.as_secs_f64() * 1000.0,
        iterations,
        "selected digest"
    );

    let surface = Pbkdf2Surface::new(*bounds);
    let first = measure(&surface, probe, Pbkdf2Cost { digest, iterations })?;

    Ok(match shrink_until_within(&surface, probe, first, target)? {
        Shrunk::Within(sample) => Found {
            sample,
            met_target: true,
        },
        Shrunk::Exhausted(sample) => Found {
            sample,
            met_target: false,
        },
    })
}
