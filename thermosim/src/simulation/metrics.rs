//! Figures of merit derived from a finished run.
//!
//! Quantities that cannot be computed (savings against a heater that never
//! ran, a room that never settled) come back as `None` instead of `NaN` or
//! infinity.

use serde::Serialize;

use super::result::{HistorySample, SimulationResult};
use crate::config::SimulationParameters;

pub const JOULES_PER_KWH: f64 = 3_600_000.0;

const HOURS_PER_MONTH: f64 = 30.0 * 24.0;

pub fn joules_to_kwh(energy_j: f64) -> f64 {
    energy_j / JOULES_PER_KWH
}

/// Energy saved relative to `baseline_kwh`, in percent. `None` when the
/// baseline used no energy.
pub fn percent_savings(baseline_kwh: f64, candidate_kwh: f64) -> Option<f64> {
    if baseline_kwh == 0.0 {
        return None;
    }
    let savings = (baseline_kwh - candidate_kwh) / baseline_kwh * 100.0;
    savings.is_finite().then_some(savings)
}

/// Savings over the simulated period scaled linearly to a 30-day month.
/// `None` for a zero-length run.
pub fn monthly_savings(
    baseline_kwh: f64,
    candidate_kwh: f64,
    cost_per_kwh: f64,
    duration_hours: f64,
) -> Option<f64> {
    if duration_hours == 0.0 {
        return None;
    }
    let savings = (baseline_kwh - candidate_kwh) * cost_per_kwh * (HOURS_PER_MONTH / duration_hours);
    savings.is_finite().then_some(savings)
}

/// Minute after which the temperature stays within `tolerance_c` of
/// `target_c` for the rest of the history.
///
/// Scans backward for the last sample outside the band and returns its
/// minute. This is the last excursion, not the first entry into the band,
/// so a room that overshoots and comes back settles at its final
/// excursion. A history that never leaves the band settles at its first
/// sample. Returns `None` if the final sample is outside the band, is not
/// a number, or the history is empty.
pub fn settling_minute(history: &[HistorySample], target_c: f64, tolerance_c: f64) -> Option<u64> {
    // NaN compares false, so a diverged sample counts as outside.
    let outside =
        |sample: &&HistorySample| !((sample.temperature_c - target_c).abs() <= tolerance_c);

    let last = history.last()?;
    if outside(&last) {
        return None;
    }

    history
        .iter()
        .rev()
        .find(outside)
        .or_else(|| history.first())
        .map(|sample| sample.minute)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    /// PID used less energy than the thermostat.
    PidSaves,
    /// PID used as much or more energy, typically because the thermostat
    /// was set too low to keep the room comfortable.
    NoSavings,
    /// Savings could not be computed: the thermostat used no energy, or
    /// an energy total is not a finite number.
    Undefined,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub pid_kwh: f64,
    pub thermostat_kwh: f64,
    pub percent_savings: Option<f64>,
    pub settling_minute: Option<u64>,
    pub monthly_savings: Option<f64>,
    pub verdict: Verdict,
}

impl Metrics {
    pub fn calculate(result: &SimulationResult, params: &SimulationParameters) -> Self {
        let pid_kwh = joules_to_kwh(result.pid.energy_j);
        let thermostat_kwh = joules_to_kwh(result.thermostat.energy_j);
        let percent_savings = percent_savings(thermostat_kwh, pid_kwh);

        let verdict = match percent_savings {
            Some(savings) if savings > 0.0 => Verdict::PidSaves,
            Some(_) => Verdict::NoSavings,
            None => Verdict::Undefined,
        };

        Self {
            pid_kwh,
            thermostat_kwh,
            percent_savings,
            settling_minute: settling_minute(
                &result.pid.history,
                params.pid_target_c,
                params.settling_tolerance_c,
            ),
            monthly_savings: monthly_savings(
                thermostat_kwh,
                pid_kwh,
                params.cost_per_kwh,
                params.duration_hours,
            ),
            verdict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::result::StrandResult;

    fn history(temperatures: &[f64]) -> Vec<HistorySample> {
        temperatures
            .iter()
            .enumerate()
            .map(|(minute, &t)| HistorySample::new(minute as u64, t))
            .collect()
    }

    fn strand(energy_j: f64, temperatures: &[f64]) -> StrandResult {
        StrandResult {
            history: history(temperatures),
            energy_j,
            final_temperature_c: temperatures.last().copied().unwrap_or_default(),
        }
    }

    #[test]
    fn should_convert_joules_to_kwh() {
        assert_eq!(joules_to_kwh(7_200_000.0), 2.0);
    }

    #[test]
    fn should_compute_percent_savings() {
        assert_eq!(percent_savings(2.0, 1.5), Some(25.0));
        assert_eq!(percent_savings(2.0, 3.0), Some(-50.0));
    }

    #[test]
    fn should_report_undefined_savings_for_zero_baseline() {
        assert_eq!(percent_savings(0.0, 0.0), None);
        assert_eq!(percent_savings(0.0, 1.0), None);
    }

    #[test]
    fn should_extrapolate_savings_to_a_month() {
        // 0.5 kWh saved in 6 h at 2.0 per kWh -> 120 periods per month
        assert_eq!(monthly_savings(2.0, 1.5, 2.0, 6.0), Some(120.0));
        assert_eq!(monthly_savings(2.0, 1.5, 2.0, 0.0), None);
    }

    #[test]
    fn should_settle_at_last_excursion() {
        let history = history(&[26.0, 25.8, 25.3, 25.05, 25.02, 25.01]);
        assert_eq!(settling_minute(&history, 25.0, 0.5), Some(1));
    }

    #[test]
    fn should_settle_at_last_excursion_after_overshoot() {
        let history = history(&[20.0, 24.8, 25.6, 25.2, 25.0]);
        assert_eq!(settling_minute(&history, 25.0, 0.5), Some(2));
    }

    #[test]
    fn should_not_settle_when_final_sample_is_outside_tolerance() {
        let history = history(&[25.0, 25.1, 25.2, 25.7]);
        assert_eq!(settling_minute(&history, 25.0, 0.5), None);
    }

    #[test]
    fn should_settle_at_start_when_always_within_tolerance() {
        let history = history(&[25.4, 24.6, 25.0]);
        assert_eq!(settling_minute(&history, 25.0, 0.5), Some(0));
    }

    #[test]
    fn should_not_settle_when_final_sample_is_nan() {
        let history = history(&[20.0, 25.0, 25.1, f64::NAN]);
        assert_eq!(settling_minute(&history, 25.0, 0.5), None);
    }

    #[test]
    fn should_count_nan_sample_as_excursion() {
        let history = history(&[20.0, f64::NAN, 25.1, 25.0]);
        assert_eq!(settling_minute(&history, 25.0, 0.5), Some(1));
    }

    #[test]
    fn should_report_diverged_run_as_unsettled_and_undefined() {
        let result = SimulationResult {
            pid: strand(f64::NAN, &[10.0, 1e300, f64::NAN]),
            thermostat: strand(7_200_000.0, &[10.0, 27.0, 29.0]),
            steps: 180,
        };

        let metrics = Metrics::calculate(&result, &SimulationParameters::default());

        assert_eq!(metrics.settling_minute, None);
        assert_eq!(metrics.percent_savings, None);
        assert_eq!(metrics.monthly_savings, None);
        assert_eq!(metrics.verdict, Verdict::Undefined);
    }

    #[test]
    fn should_not_settle_empty_history() {
        assert_eq!(settling_minute(&[], 25.0, 0.5), None);
    }

    #[test]
    fn should_calculate_metrics_for_run() {
        let result = SimulationResult {
            pid: strand(5_400_000.0, &[10.0, 24.0, 25.1]),
            thermostat: strand(7_200_000.0, &[10.0, 27.0, 29.0]),
            steps: 180,
        };
        let params = SimulationParameters::default();

        let metrics = Metrics::calculate(&result, &params);

        assert_eq!(metrics.pid_kwh, 1.5);
        assert_eq!(metrics.thermostat_kwh, 2.0);
        assert_eq!(metrics.percent_savings, Some(25.0));
        assert_eq!(metrics.settling_minute, Some(1));
        assert_eq!(metrics.monthly_savings, Some(120.0));
        assert_eq!(metrics.verdict, Verdict::PidSaves);
    }

    #[test]
    fn should_flag_when_pid_uses_more_energy() {
        let result = SimulationResult {
            pid: strand(7_200_000.0, &[25.0]),
            thermostat: strand(3_600_000.0, &[22.0]),
            steps: 60,
        };

        let metrics = Metrics::calculate(&result, &SimulationParameters::default());

        assert_eq!(metrics.verdict, Verdict::NoSavings);
        assert_eq!(metrics.percent_savings, Some(-100.0));
    }

    #[test]
    fn should_flag_undefined_when_thermostat_never_heats() {
        let result = SimulationResult {
            pid: strand(0.0, &[]),
            thermostat: strand(0.0, &[]),
            steps: 0,
        };

        let metrics = Metrics::calculate(&result, &SimulationParameters::default());

        assert_eq!(metrics.verdict, Verdict::Undefined);
        assert_eq!(metrics.percent_savings, None);
        assert_eq!(metrics.settling_minute, None);
    }
}
