use serde::Serialize;

/// Room temperature at one sampled instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistorySample {
    /// Step index divided by 60. Equal to elapsed minutes only when the
    /// time step is one second.
    pub minute: u64,
    pub temperature_c: f64,
}

impl HistorySample {
    pub fn new(minute: u64, temperature_c: f64) -> Self {
        Self {
            minute,
            temperature_c,
        }
    }
}

/// Outcome for one control strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrandResult {
    pub history: Vec<HistorySample>,
    /// Heater energy delivered over the run (J).
    pub energy_j: f64,
    pub final_temperature_c: f64,
}

/// Raw outcome of a run. Both histories are sampled on the same steps, so
/// they line up by index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub pid: StrandResult,
    pub thermostat: StrandResult,
    pub steps: usize,
}
