//! Simulation parameters and their validation.
//!
//! A [`SimulationParameters`] is an untrusted record straight from a user or
//! a JSON file. [`SimulationParameters::validate`] turns it into
//! [`ValidatedParameters`], the only form the simulation accepts, so bad
//! input is rejected before the first step rather than surfacing as a
//! division fault mid-run.

use std::ops::Deref;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::control::PidGains;
use crate::thermal::{DEFAULT_WALL_THICKNESS_CM, Envelope, IntegrationMethod, Room, Wall};

/// Band around the PID target counted as "settled" (°C).
pub const DEFAULT_SETTLING_TOLERANCE_C: f64 = 0.5;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("Time step must be positive, got {0} s")]
    NonPositiveTimeStep(f64),

    #[error("Thermal mass must be positive, got {0} J/K")]
    NonPositiveThermalMass(f64),

    #[error("Thermal resistance must be positive, got {0} K/W")]
    NonPositiveResistance(f64),

    #[error("Time step {dt} s is unstable for {method}, must be at most {limit} s")]
    UnstableTimeStep {
        dt: f64,
        limit: f64,
        method: IntegrationMethod,
    },

    #[error("Duration must not be negative, got {0} h")]
    NegativeDuration(f64),

    #[error("Heater power must not be negative, got {0} W")]
    NegativeMaxPower(f64),

    #[error("Hysteresis must not be negative, got {0} °C")]
    NegativeHysteresis(f64),

    #[error("Gain {name} must not be negative, got {value}")]
    NegativeGain { name: &'static str, value: f64 },

    #[error("Settling tolerance must not be negative, got {0} °C")]
    NegativeTolerance(f64),

    #[error("Electricity cost must not be negative, got {0} per kWh")]
    NegativeCost(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    /// Heat capacity of the room (J/K).
    pub thermal_mass_j_per_k: f64,

    /// Resistance of the walls to heat flow (K/W).
    pub thermal_resistance_k_per_w: f64,

    /// Outside temperature (°C). Both rooms start here.
    pub ambient_c: f64,

    /// Temperature the PID controller regulates to (°C).
    pub pid_target_c: f64,

    /// Thermostat setting (°C). Usually set above the comfort temperature
    /// to compensate for swings.
    pub thermostat_target_c: f64,

    /// Half-width of the thermostat's dead band (°C).
    pub hysteresis_c: f64,

    /// Rating of the heater both strategies drive (W).
    pub max_power_w: f64,

    pub gains: PidGains,

    /// Integration time step (s).
    pub time_step_s: f64,

    pub duration_hours: f64,

    pub cost_per_kwh: f64,

    pub settling_tolerance_c: f64,

    pub method: IntegrationMethod,
}

impl Default for SimulationParameters {
    /// A small bedroom behind 20 cm of clay brick on a 10 °C day, heated
    /// for six hours by a 2 kW heater.
    fn default() -> Self {
        Self {
            thermal_mass_j_per_k: Room::SmallBedroom.thermal_mass_j_per_k(),
            thermal_resistance_k_per_w: Wall::BurntClayBricks
                .resistance_k_per_w(DEFAULT_WALL_THICKNESS_CM),
            ambient_c: 10.0,
            pid_target_c: 25.0,
            thermostat_target_c: 28.0,
            hysteresis_c: 1.5,
            max_power_w: 2000.0,
            gains: PidGains::default(),
            time_step_s: 1.0,
            duration_hours: 6.0,
            cost_per_kwh: 2.0,
            settling_tolerance_c: DEFAULT_SETTLING_TOLERANCE_C,
            method: IntegrationMethod::default(),
        }
    }
}

impl SimulationParameters {
    pub fn with_room(mut self, room: Room) -> Self {
        self.thermal_mass_j_per_k = room.thermal_mass_j_per_k();
        self
    }

    pub fn with_wall(mut self, wall: Wall, thickness_cm: f64) -> Self {
        self.thermal_resistance_k_per_w = wall.resistance_k_per_w(thickness_cm);
        self
    }

    pub fn envelope(&self) -> Envelope {
        Envelope::new(
            self.thermal_mass_j_per_k,
            self.thermal_resistance_k_per_w,
            self.ambient_c,
        )
    }

    pub fn validate(self) -> Result<ValidatedParameters, ConfigError> {
        let fields = [
            ("thermal_mass_j_per_k", self.thermal_mass_j_per_k),
            ("thermal_resistance_k_per_w", self.thermal_resistance_k_per_w),
            ("ambient_c", self.ambient_c),
            ("pid_target_c", self.pid_target_c),
            ("thermostat_target_c", self.thermostat_target_c),
            ("hysteresis_c", self.hysteresis_c),
            ("max_power_w", self.max_power_w),
            ("kp", self.gains.proportional),
            ("ki", self.gains.integral),
            ("kd", self.gains.derivative),
            ("time_step_s", self.time_step_s),
            ("duration_hours", self.duration_hours),
            ("cost_per_kwh", self.cost_per_kwh),
            ("settling_tolerance_c", self.settling_tolerance_c),
        ];
        if let Some(&(field, value)) = fields.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigError::NotFinite { field, value });
        }

        if self.time_step_s <= 0.0 {
            return Err(ConfigError::NonPositiveTimeStep(self.time_step_s));
        }
        if self.thermal_mass_j_per_k <= 0.0 {
            return Err(ConfigError::NonPositiveThermalMass(
                self.thermal_mass_j_per_k,
            ));
        }
        if self.thermal_resistance_k_per_w <= 0.0 {
            return Err(ConfigError::NonPositiveResistance(
                self.thermal_resistance_k_per_w,
            ));
        }

        let limit = self.method.max_stable_step_s(&self.envelope());
        if self.time_step_s > limit {
            return Err(ConfigError::UnstableTimeStep {
                dt: self.time_step_s,
                limit,
                method: self.method,
            });
        }

        if self.duration_hours < 0.0 {
            return Err(ConfigError::NegativeDuration(self.duration_hours));
        }
        if self.max_power_w < 0.0 {
            return Err(ConfigError::NegativeMaxPower(self.max_power_w));
        }
        if self.hysteresis_c < 0.0 {
            return Err(ConfigError::NegativeHysteresis(self.hysteresis_c));
        }

        let gains = [
            ("kp", self.gains.proportional),
            ("ki", self.gains.integral),
            ("kd", self.gains.derivative),
        ];
        if let Some(&(name, value)) = gains.iter().find(|(_, value)| *value < 0.0) {
            return Err(ConfigError::NegativeGain { name, value });
        }

        if self.settling_tolerance_c < 0.0 {
            return Err(ConfigError::NegativeTolerance(self.settling_tolerance_c));
        }
        if self.cost_per_kwh < 0.0 {
            return Err(ConfigError::NegativeCost(self.cost_per_kwh));
        }

        Ok(ValidatedParameters(self))
    }
}

/// Parameters that passed [`SimulationParameters::validate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidatedParameters(SimulationParameters);

impl ValidatedParameters {
    /// Number of integration steps: `floor(3600 · hours / dt)`.
    pub fn total_steps(&self) -> usize {
        (3600.0 * self.0.duration_hours / self.0.time_step_s).floor() as usize
    }
}

impl Deref for ValidatedParameters {
    type Target = SimulationParameters;

    fn deref(&self) -> &SimulationParameters {
        &self.0
    }
}
