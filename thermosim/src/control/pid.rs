use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidGains {
    #[serde(rename = "kp")]
    pub proportional: f64,
    #[serde(rename = "ki")]
    pub integral: f64,
    #[serde(rename = "kd")]
    pub derivative: f64,
}

impl PidGains {
    pub fn new(proportional: f64, integral: f64, derivative: f64) -> Self {
        Self {
            proportional,
            integral,
            derivative,
        }
    }
}

impl Default for PidGains {
    /// Tuned for a small bedroom behind 20 cm of clay brick with a 2 kW
    /// heater.
    fn default() -> Self {
        Self::new(100.0, 0.001, 35_000.0)
    }
}

/// Memory carried between controller updates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PidState {
    /// Accumulated error·time (K·s), bounded by the anti-windup limit.
    pub integral_sum: f64,
    pub last_error: f64,
}

/// The three terms of one controller update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidOutput {
    pub proportional: f64,
    pub integral: f64,
    pub derivative: f64,
}

impl PidOutput {
    /// Requested heater power (W), before actuator saturation.
    pub fn power_w(&self) -> f64 {
        self.proportional + self.integral + self.derivative
    }
}

/// PID controller producing a heater power command.
///
/// The integral is clamped to `±max_power / Ki` so the I term alone can
/// never ask for more than the heater delivers. With `Ki == 0` that limit
/// is zero and the integral never accumulates at all.
///
/// Output is not saturated here; clamping to the heater's range is the
/// caller's job.
#[derive(Debug, Clone)]
pub struct PidController {
    gains: PidGains,
    dt_s: f64,
    integral_limit: f64,
    state: PidState,
}

impl PidController {
    /// `dt_s` must be positive and `max_power_w` finite.
    pub fn new(gains: PidGains, dt_s: f64, max_power_w: f64) -> Self {
        debug_assert!(dt_s > 0.0, "PID time step must be positive, got {dt_s}");
        debug_assert!(
            max_power_w.is_finite(),
            "PID power limit must be finite, got {max_power_w}"
        );

        let integral_limit = if gains.integral != 0.0 {
            (max_power_w / gains.integral).abs()
        } else {
            0.0
        };

        Self {
            gains,
            dt_s,
            integral_limit,
            state: PidState::default(),
        }
    }

    pub fn integral_limit(&self) -> f64 {
        self.integral_limit
    }

    pub fn state(&self) -> PidState {
        self.state
    }

    /// One control update from an explicit state, returning the terms and
    /// the state to carry into the next update.
    ///
    /// The first update from a fresh state sees `last_error == 0`, so a
    /// non-zero starting error produces a derivative kick of `error / dt`.
    pub fn step(&self, state: PidState, target_c: f64, current_c: f64) -> (PidOutput, PidState) {
        let error = target_c - current_c;

        // min/max rather than clamp: clamp panics on a NaN bound.
        let integral_sum = (state.integral_sum + error * self.dt_s)
            .max(-self.integral_limit)
            .min(self.integral_limit);

        let derivative = (error - state.last_error) / self.dt_s;

        let output = PidOutput {
            proportional: self.gains.proportional * error,
            integral: self.gains.integral * integral_sum,
            derivative: self.gains.derivative * derivative,
        };

        let next = PidState {
            integral_sum,
            last_error: error,
        };

        (output, next)
    }

    /// Advance the controller's own state and return the requested power.
    pub fn update(&mut self, target_c: f64, current_c: f64) -> f64 {
        let (output, next) = self.step(self.state, target_c, current_c);
        self.state = next;
        output.power_w()
    }
}
