//! scrypt: shrink the memory exponent, then double the operation limit.

use std::time::Duration;

use tracing::{info, instrument};

use crate::bounds::ScryptBounds;
use crate::error::TuneError;
use crate::params::{Family, ScryptCost};
use crate::probe::Probe;
use crate::search::{CostSurface, Found, search};

/// Shrinking recomputes the operation limit from memory; growing doubles it.
#[derive(Debug, Clone, Copy)]
pub struct ScryptSurface {
    bounds: ScryptBounds,
}

impl ScryptSurface {
    pub fn new(bounds: ScryptBounds) -> Self {
        Self { bounds }
    }

    fn memory_in_bounds(&self, cost: &ScryptCost) -> bool {
        (self.bounds.memory_min..=self.bounds.memory_max).contains(&cost.memory_exponent)
    }
}

impl CostSurface for ScryptSurface {
    type Cost = ScryptCost;

    fn family(&self) -> Family {
        Family::Scrypt
    }

    fn shrink(&self, cost: &ScryptCost) -> Option<ScryptCost> {
        let memory_exponent = cost.memory_exponent.checked_sub(1)?;
        Some(ScryptCost::for_memory(memory_exponent))
    }

    fn grow(&self, cost: &ScryptCost) -> Option<ScryptCost> {
        let operation_limit = cost.operation_limit.checked_mul(2)?;
        Some(ScryptCost {
            operation_limit,
            ..*cost
        })
    }

    fn in_bounds(&self, cost: &ScryptCost) -> bool {
        let operations = self.bounds.operations_min..=self.bounds.operations_max;
        self.memory_in_bounds(cost) && operations.contains(&cost.operation_limit)
    }

    /// The operation limit of a shrunk cost is derived from its memory.
    fn in_shrink_bounds(&self, cost: &ScryptCost) -> bool {
        self.memory_in_bounds(cost)
    }
}

/// Tunes scrypt starting at `memory_exponent` and its derived operation limit.
///
/// `memory_exponent` must already lie within `bounds`.
///
/// ## Errors
///
/// Returns `TuneError::ProbeFailed` if any probe fails.
#[instrument(skip(probe, bounds))]
pub fn tune<P>(
    probe: &mut P,
    bounds: &ScryptBounds,
    memory_exponent: u32,
    target: Duration,
) -> Result<Found<ScryptCost>, TuneError>
where
    P: Probe + ?Sized,
{
    info!("beginning scrypt search");

    let start = ScryptCost::for_memory(memory_exponent);
    search(&ScryptSurface::new(*bounds), probe, start, target)
}
