use tokio_util::sync::CancellationToken;

use super::metrics::Metrics;
use super::result::{HistorySample, SimulationResult, StrandResult};
use super::{SimulationError, SimulationReport};
use crate::config::ValidatedParameters;
use crate::control::{Controller, PidController, SetpointPid, Thermostat};
use crate::thermal::{Envelope, IntegrationMethod};
use crate::tracing::prelude::*;

/// A history sample is taken every this many steps.
const STEPS_PER_SAMPLE: usize = 60;

/// Progress is reported this many times over a run, plus once at the end.
const PROGRESS_REPORTS: usize = 10;

/// Upper bound on history slots reserved before the run, a week of
/// one-minute samples. Longer histories grow on demand.
const MAX_RESERVED_SAMPLES: usize = 7 * 24 * 60;

/// Physical constants shared by both strands for one step.
struct StepContext<'a> {
    envelope: &'a Envelope,
    method: IntegrationMethod,
    max_power_w: f64,
    dt_s: f64,
}

/// One controlled room evolving under a single strategy.
struct Strand<C: Controller> {
    controller: C,
    state: C::State,
    temperature_c: f64,
    energy_j: f64,
    history: Vec<HistorySample>,
}

impl<C: Controller> Strand<C> {
    fn new(controller: C, start_c: f64, capacity: usize) -> Self {
        let state = controller.initial_state();
        Self {
            controller,
            state,
            temperature_c: start_c,
            energy_j: 0.0,
            history: Vec::with_capacity(capacity),
        }
    }

    /// Command, saturate, integrate and meter one step. Returns the power
    /// actually delivered.
    fn advance(&mut self, ctx: &StepContext<'_>) -> f64 {
        let (command, next) = self.controller.command(self.state, self.temperature_c);
        self.state = next;

        let power_w = command.clamp(0.0, ctx.max_power_w);
        self.temperature_c = ctx
            .method
            .step(ctx.envelope, self.temperature_c, power_w, ctx.dt_s);
        self.energy_j += power_w * ctx.dt_s;

        power_w
    }

    fn record(&mut self, minute: u64) {
        self.history
            .push(HistorySample::new(minute, self.temperature_c));
    }

    fn finish(self) -> StrandResult {
        StrandResult {
            history: self.history,
            energy_j: self.energy_j,
            final_temperature_c: self.temperature_c,
        }
    }
}

/// Runs the PID controller and the thermostat side by side over identical
/// rooms.
///
/// Both rooms start at ambient temperature and are stepped in lockstep, so
/// their histories are aligned by index.
#[derive(Debug, Clone)]
pub struct Simulation {
    params: ValidatedParameters,
    cancellation: CancellationToken,
}

impl Simulation {
    pub fn new(params: ValidatedParameters) -> Self {
        Self {
            params,
            cancellation: CancellationToken::new(),
        }
    }

    /// Abort the run at the next step once `cancellation` fires.
    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub fn run(&self) -> Result<SimulationResult, SimulationError> {
        self.run_with_progress(|_| {})
    }

    /// Run to completion, calling `progress` with the fraction complete
    /// every tenth of the run and with `1.0` at the end.
    pub fn run_with_progress<P>(&self, mut progress: P) -> Result<SimulationResult, SimulationError>
    where
        P: FnMut(f64),
    {
        let params = &self.params;
        let total_steps = params.total_steps();
        let envelope = params.envelope();
        let ctx = StepContext {
            envelope: &envelope,
            method: params.method,
            max_power_w: params.max_power_w,
            dt_s: params.time_step_s,
        };

        info!(
            total_steps,
            dt_s = %params.time_step_s,
            duration_h = %params.duration_hours,
            method = %params.method,
            pid_target_c = %params.pid_target_c,
            thermostat_target_c = %params.thermostat_target_c,
            "Starting simulation"
        );

        let samples = total_steps
            .div_ceil(STEPS_PER_SAMPLE)
            .min(MAX_RESERVED_SAMPLES);
        let pid = PidController::new(params.gains, params.time_step_s, params.max_power_w);
        let mut pid = Strand::new(
            SetpointPid::new(pid, params.pid_target_c),
            params.ambient_c,
            samples,
        );
        let mut thermostat = Strand::new(
            Thermostat::new(
                params.thermostat_target_c,
                params.hysteresis_c,
                params.max_power_w,
            ),
            params.ambient_c,
            samples,
        );

        let report_every = (total_steps / PROGRESS_REPORTS).max(1);

        for step in 0..total_steps {
            if self.cancellation.is_cancelled() {
                warn!(step, total_steps, "Simulation cancelled");
                return Err(SimulationError::Cancelled { step });
            }

            pid.advance(&ctx);

            let was_heating = thermostat.state;
            thermostat.advance(&ctx);
            if thermostat.state != was_heating {
                trace!(
                    step,
                    temp_c = %thermostat.temperature_c,
                    state = ?thermostat.state,
                    "Thermostat switched"
                );
            }

            if step % STEPS_PER_SAMPLE == 0 {
                let minute = (step / STEPS_PER_SAMPLE) as u64;
                pid.record(minute);
                thermostat.record(minute);
            }

            if step % report_every == 0 {
                let fraction = step as f64 / total_steps as f64;
                debug!(
                    step,
                    fraction = %fraction,
                    pid_c = %pid.temperature_c,
                    integral_sum = %pid.state.integral_sum,
                    thermostat_c = %thermostat.temperature_c,
                    "Simulation progress"
                );
                progress(fraction);
            }
        }
        progress(1.0);

        let result = SimulationResult {
            pid: pid.finish(),
            thermostat: thermostat.finish(),
            steps: total_steps,
        };

        info!(
            pid_final_c = %result.pid.final_temperature_c,
            thermostat_final_c = %result.thermostat.final_temperature_c,
            pid_energy_j = %result.pid.energy_j,
            thermostat_energy_j = %result.thermostat.energy_j,
            "Simulation complete"
        );

        Ok(result)
    }

    /// Run and derive the comparison metrics.
    pub fn report(&self) -> Result<SimulationReport, SimulationError> {
        self.report_with_progress(|_| {})
    }

    pub fn report_with_progress<P>(&self, progress: P) -> Result<SimulationReport, SimulationError>
    where
        P: FnMut(f64),
    {
        let result = self.run_with_progress(progress)?;
        let metrics = Metrics::calculate(&result, &self.params);
        Ok(SimulationReport { result, metrics })
    }
}
