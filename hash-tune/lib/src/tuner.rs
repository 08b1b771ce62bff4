//! Runs the per-family strategies in order and collects their recommendations.

use std::fmt;
use std::time::Duration;

use serde::{Serialize, Serializer};
use tracing::{info, instrument, warn};

use crate::config::TuneConfig;
use crate::error::TuneError;
use crate::params::{CostParameters, Family};
use crate::probe::Probe;
use crate::search::Found;
use crate::strategy;

/// The tuned parameters for one family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub family: Family,
    pub parameters: CostParameters,
    /// Time the recommended parameters took when probed.
    #[serde(serialize_with = "as_secs")]
    pub elapsed: Duration,
    #[serde(serialize_with = "as_secs")]
    pub target: Duration,
    /// `false` when even the minimum permitted cost was slower than the target.
    pub met_target: bool,
}

impl Recommendation {
    fn from_found<C: Into<CostParameters>>(
        family: Family,
        found: Found<C>,
        target: Duration,
    ) -> Self {
        Self {
            family,
            parameters: found.sample.cost.into(),
            elapsed: found.sample.elapsed,
            target,
            met_target: found.met_target,
        }
    }
}

/// Something the caller should know about that did not stop the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// No memory ceiling was given; the configured default was used.
    MemoryCeilingDefaulted { exponent: u32 },
    /// The memory ceiling was outside a family's bounds and was clamped.
    MemoryCeilingClamped {
        family: Family,
        requested: u32,
        used: u32,
    },
    /// The family could not meet the target even at its minimum cost.
    TargetNotMet { family: Family },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MemoryCeilingDefaulted { exponent } => write!(
                f,
                "no memory limit given; using 2^{exponent} KiB. Set one appropriate for this machine"
            ),
            Warning::MemoryCeilingClamped {
                family,
                requested,
                used,
            } => write!(
                f,
                "{family}: memory limit 2^{requested} KiB is outside the permitted range; using 2^{used} KiB"
            ),
            Warning::TargetNotMet { family } => write!(
                f,
                "{family}: reached minimum cost and still too slow for the target"
            ),
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TuneReport {
    #[serde(serialize_with = "as_secs")]
    pub target: Duration,
    pub recommendations: Vec<Recommendation>,
    pub warnings: Vec<Warning>,
}

impl TuneReport {
    /// Whether every tuned family met the target.
    pub fn all_met(&self) -> bool {
        self.recommendations.iter().all(|r| r.met_target)
    }

    /// The recommendation for `family`, if it was tuned.
    pub fn recommendation(&self, family: Family) -> Option<&Recommendation> {
        self.recommendations.iter().find(|r| r.family == family)
    }
}

/// Drives a full tuning run from a validated config.
#[derive(Debug, Clone)]
pub struct Tuner {
    config: TuneConfig,
}

impl Tuner {
    pub fn new(config: TuneConfig) -> Self {
        Self { config }
    }

    /// Tunes every enabled family, in order, against `probe`.
    ///
    /// Inputs are validated before the first probe. A family that cannot meet
    /// the target is reported with `met_target = false` and the run continues.
    ///
    /// ## Errors
    ///
    /// - `InvalidTarget`, `NoFamilies`, `InvalidBounds` for bad input
    /// - `ProbeFailed` on the first probe failure; later families are not run
    #[instrument(skip_all, fields(target_secs = self.config.target_secs))]
    pub fn run<P>(&self, probe: &mut P) -> Result<TuneReport, TuneError>
    where
        P: Probe + ?Sized,
    {
        self.config.validate()?;
        let target = self.config.target()?;
        let families = self.config.ordered_families();
        let mut warnings = Vec::new();

        let (ceiling, defaulted) = self.config.memory_ceiling();
        if defaulted && families.iter().any(|f| f.is_memory_hard()) {
            let warning = Warning::MemoryCeilingDefaulted { exponent: ceiling };
            warn!("{warning}");
            warnings.push(warning);
        }

        let mut recommendations = Vec::with_capacity(families.len());
        for family in families {
            let recommendation = match family {
                Family::Argon2 => {
                    let bounds = &self.config.argon2;
                    let memory = clamp_ceiling(
                        family,
                        ceiling,
                        bounds.memory_min,
                        bounds.memory_max,
                        &mut warnings,
                    );
                    let found = strategy::argon2::tune(probe, bounds, memory, target)?;
                    Recommendation::from_found(family, found, target)
                }
                Family::Scrypt => {
                    let bounds = &self.config.scrypt;
                    let memory = clamp_ceiling(
                        family,
                        ceiling,
                        bounds.memory_min,
                        bounds.memory_max,
                        &mut warnings,
                    );
                    let found = strategy::scrypt::tune(probe, bounds, memory, target)?;
                    Recommendation::from_found(family, found, target)
                }
                Family::Pbkdf2 => {
                    let found = strategy::pbkdf2::tune(probe, &self.config.pbkdf2, target)?;
                    Recommendation::from_found(family, found, target)
                }
            };

            if recommendation.met_target {
                info!(
                    %family,
                    parameters = ?recommendation.parameters,
                    elapsed_ms = recommendation.elapsed.as_secs_f64() * 1000.0,
                    "recommended parameters"
                );
            } else {
                warnings.push(Warning::TargetNotMet { family });
            }
            recommendations.push(recommendation);
        }

        Ok(TuneReport {
            target,
            recommendations,
            warnings,
        })
    }
}

fn clamp_ceiling(
    family: Family,
    requested: u32,
    min: u32,
    max: u32,
    warnings: &mut Vec<Warning>,
) -> u32 {
    let used = requested.clamp(min, max);
    if used != requested {
        let warning = Warning::MemoryCeilingClamped {
            family,
            requested,
            used,
        };
        warn!("{warning}");
        warnings.push(warning);
    }
    used
}

fn as_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}
