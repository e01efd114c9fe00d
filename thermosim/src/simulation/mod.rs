//! Side-by-side simulation of PID and thermostat heating.
//!
//! [`Simulation`] steps both strategies over identical rooms and returns a
//! [`SimulationResult`]; [`Metrics`] turns that into energy totals, savings
//! and settling time.

mod metrics;
mod result;
mod runner;

use serde::Serialize;
use thiserror::Error;

use crate::config::{ConfigError, SimulationParameters};

pub use metrics::{
    JOULES_PER_KWH, Metrics, Verdict, joules_to_kwh, monthly_savings, percent_savings,
    settling_minute,
};
pub use result::{HistorySample, SimulationResult, StrandResult};
pub use runner::Simulation;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Simulation cancelled at step {step}")]
    Cancelled { step: usize },
}

/// Everything a presentation layer needs from one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub result: SimulationResult,
    pub metrics: Metrics,
}

/// Validate `params`, run both strategies and derive metrics.
pub fn simulate(params: SimulationParameters) -> Result<SimulationReport, SimulationError> {
    Simulation::new(params.validate()?).report()
}
