//! Time stepping of the room temperature.
//!
//! The heater command is computed once per full step, so power is held
//! constant across the Runge-Kutta sub-steps.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::model::Envelope;

/// Numerical scheme used to advance the room temperature.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum IntegrationMethod {
    /// Classical fourth-order Runge-Kutta.
    #[default]
    Rk4,

    /// Forward Euler. Cheaper, but drifts at large time steps.
    Euler,
}

impl IntegrationMethod {
    /// Advance `temperature_c` by `dt_s` seconds with `power_w` applied.
    pub fn step(self, envelope: &Envelope, temperature_c: f64, power_w: f64, dt_s: f64) -> f64 {
        match self {
            IntegrationMethod::Rk4 => rk4_step(envelope, temperature_c, power_w, dt_s),
            IntegrationMethod::Euler => euler_step(envelope, temperature_c, power_w, dt_s),
        }
    }

    /// Largest time step (s) for which the scheme stays stable on
    /// `envelope`. Beyond it the temperature oscillates with growing
    /// amplitude until it overflows to NaN.
    ///
    /// The bound is where the scheme's amplification factor for
    /// `dT/dt = -T / (R·C)` reaches magnitude one: `2·R·C` for Euler and
    /// about `2.785·R·C` for RK4, rounded down here.
    pub fn max_stable_step_s(self, envelope: &Envelope) -> f64 {
        let time_constant_s = envelope.resistance_k_per_w * envelope.thermal_mass_j_per_k;
        match self {
            IntegrationMethod::Rk4 => 2.78 * time_constant_s,
            IntegrationMethod::Euler => 2.0 * time_constant_s,
        }
    }
}

pub fn rk4_step(envelope: &Envelope, temperature_c: f64, power_w: f64, dt_s: f64) -> f64 {
    let k1 = envelope.rate(temperature_c, power_w);
    let k2 = envelope.rate(temperature_c + dt_s / 2.0 * k1, power_w);
    let k3 = envelope.rate(temperature_c + dt_s / 2.0 * k2, power_w);
    let k4 = envelope.rate(temperature_c + dt_s * k3, power_w);

    temperature_c + dt_s / 6.0 * (k1 + 2.0 * k2 + 2.0 * k3 + k4)
}

pub fn euler_step(envelope: &Envelope, temperature_c: f64, power_w: f64, dt_s: f64) -> f64 {
    temperature_c + envelope.rate(temperature_c, power_w) * dt_s
}
