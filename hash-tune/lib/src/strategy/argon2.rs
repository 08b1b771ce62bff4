//! Argon2id: shrink the memory exponent, then grow the time cost.

use std::time::Duration;

use tracing::{info, instrument};

use crate::bounds::Argon2Bounds;
use crate::error::TuneError;
use crate::params::{Argon2Cost, Family};
use crate::probe::Probe;
use crate::search::{CostSurface, Found, search};

/// Lanes used for every probe; multi-threaded timing is out of scope.
pub const THREADS: u32 = 1;

/// Memory shrinks by one exponent step, time grows by one pass.
#[derive(Debug, Clone, Copy)]
pub struct Argon2Surface {
    bounds: Argon2Bounds,
}

impl Argon2Surface {
    pub fn new(bounds: Argon2Bounds) -> Self {
        Self { bounds }
    }
}

impl CostSurface for Argon2Surface {
    type Cost = Argon2Cost;

    fn family(&self) -> Family {
        Family::Argon2
    }

    fn shrink(&self, cost: &Argon2Cost) -> Option<Argon2Cost> {
        let memory_exponent = cost.memory_exponent.checked_sub(1)?;
        Some(Argon2Cost {
            memory_exponent,
            ..*cost
        })
    }

    fn grow(&self, cost: &Argon2Cost) -> Option<Argon2Cost> {
        let time_cost = cost.time_cost.checked_add(1)?;
        Some(Argon2Cost { time_cost, ..*cost })
    }

    fn in_bounds(&self, cost: &Argon2Cost) -> bool {
        (self.bounds.memory_min..=self.bounds.memory_max).contains(&cost.memory_exponent)
            && (self.bounds.time_min..=self.bounds.time_max).contains(&cost.time_cost)
    }
}

/// Tunes Argon2id starting at `memory_exponent` and the minimum time cost.
///
/// `memory_exponent` must already lie within `bounds`.
///
/// ## Errors
///
/// Returns `TuneError::ProbeFailed` if any probe fails.
#[instrument(skip(probe, bounds))]
pub fn tune<P>(
    probe: &mut P,
    bounds: &Argon2Bounds,
    memory_exponent: u32,
    target: Duration,
) -> Result<Found<Argon2Cost>, TuneError>
where
    P: Probe + ?Sized,
{
    info!("beginning Argon2 search; multithreading is not tested");

    let start = Argon2Cost {
        memory_exponent,
        time_cost: bounds.time_min,
        threads: THREADS,
    };
    search(&Argon2Surface::new(*bounds), probe, start, target)
}
