//! Bounded shrink/grow search over a family's cost surface.
//!
//! Every family is tuned by the same routine:
//!
//! 1. probe the starting cost;
//! 2. **shrink** while the probe is slower than the target, giving up (a
//!    soft-stop) once the next step would leave the bounds;
//! 3. **grow** while the probe is faster than the target;
//! 4. **roll back** to the previous sample if the last grow step overshot.
//!
//! Only the current sample and, during growth, the one before it are held.

use std::fmt::Debug;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::TuneError;
use crate::params::{CostParameters, Family};
use crate::probe::Probe;

/// The step policy and bounds of one family's parameter space.
pub trait CostSurface {
    /// The family-specific cost encoding.
    type Cost: Copy + Debug + Into<CostParameters>;

    /// The family being searched.
    fn family(&self) -> Family;

    /// The next cheaper cost, or `None` if no cheaper encoding exists.
    fn shrink(&self, cost: &Self::Cost) -> Option<Self::Cost>;

    /// The next more expensive cost, or `None` if the family never grows.
    fn grow(&self, cost: &Self::Cost) -> Option<Self::Cost>;

    /// Whether `cost` lies inside the configured bounds.
    fn in_bounds(&self, cost: &Self::Cost) -> bool;

    /// Whether a shrunk `cost` may still be probed.
    ///
    /// Defaults to [`in_bounds`](Self::in_bounds). Surfaces whose shrink step
    /// re-derives some components only need to check the rest.
    fn in_shrink_bounds(&self, cost: &Self::Cost) -> bool {
        self.in_bounds(cost)
    }
}

/// A cost together with the time it was measured at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample<C> {
    pub cost: C,
    pub elapsed: Duration,
}

/// Result of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Found<C> {
    pub sample: Sample<C>,
    /// `false` when the search soft-stopped at the bound floor.
    pub met_target: bool,
}

/// Probes `cost` once, tagging failures with the surface's family.
pub fn measure<S, P>(
    surface: &S,
    probe: &mut P,
    cost: S::Cost,
) -> Result<Sample<S::Cost>, TuneError>
where
    S: CostSurface + ?Sized,
    P: Probe + ?Sized,
{
    let family = surface.family();
    let elapsed = probe
        .run(&cost.into())
        .map_err(|source| TuneError::ProbeFailed { family, source })?;

    info!(
        %family,
        cost = ?cost,
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        "probe"
    );
    Ok(Sample { cost, elapsed })
}

/// Outcome of the shrink phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shrunk<C> {
    /// First sample at or under the target.
    Within(Sample<C>),
    /// Bounds ran out; the last measured sample is still too slow.
    Exhausted(Sample<C>),
}

/// Runs the shrink phase from an already measured sample.
pub fn shrink_until_within<S, P>(
    surface: &S,
    probe: &mut P,
    mut current: Sample<S::Cost>,
    target: Duration,
) -> Result<Shrunk<S::Cost>, TuneError>
where
    S: CostSurface + ?Sized,
    P: Probe + ?Sized,
{
    while current.elapsed > target {
        let next = surface
            .shrink(&current.cost)
            .filter(|cost| surface.in_shrink_bounds(cost));
        let Some(next) = next else {
            warn!(
                family = %surface.family(),
                cost = ?current.cost,
                "reached minimum cost and still too slow; giving up"
            );
            return Ok(Shrunk::Exhausted(current));
        };
        current = measure(surface, probe, next)?;
    }
    Ok(Shrunk::Within(current))
}

/// Runs the full search from `start`.
///
/// ## Errors
///
/// Returns `TuneError::ProbeFailed` on the first probe failure; no retry is
/// attempted.
pub fn search<S, P>(
    surface: &S,
    probe: &mut P,
    start: S::Cost,
    target: Duration,
) -> Result<Found<S::Cost>, TuneError>
where
    S: CostSurface + ?Sized,
    P: Probe + ?Sized,
{
    let first = measure(surface, probe, start)?;
    let mut current = match shrink_until_within(surface, probe, first, target)? {
        Shrunk::Within(sample) => sample,
        Shrunk::Exhausted(sample) => {
            return Ok(Found {
                sample,
                met_target: false,
            });
        }
    };

    let mut previous = None;
    while current.elapsed < target {
        let next = surface
            .grow(&current.cost)
            .filter(|cost| surface.in_bounds(cost));
        let Some(next) = next else {
            break;
        };
        let sample = measure(surface, probe, next)?;
        previous = Some(std::mem::replace(&mut current, sample));
    }

    if current.elapsed > target {
        if let Some(prev) = previous {
            debug!(
                family = %surface.family(),
                overshoot = ?current.cost,
                restored = ?prev.cost,
                "rolling back overshooting grow step"
            );
            current = prev;
        }
    }

    Ok(Found {
        sample: current,
        met_target: true,
    })
}
