use serde::{Deserialize, Serialize};

/// Lumped thermal model of a room: one heat capacity and one linear loss
/// path to the outside air.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Heat capacity of the room (J/K).
    pub thermal_mass_j_per_k: f64,

    /// Resistance of the walls to heat flow (K/W).
    pub resistance_k_per_w: f64,

    /// Outside temperature (°C).
    pub ambient_c: f64,
}

impl Envelope {
    pub fn new(thermal_mass_j_per_k: f64, resistance_k_per_w: f64, ambient_c: f64) -> Self {
        Self {
            thermal_mass_j_per_k,
            resistance_k_per_w,
            ambient_c,
        }
    }

    /// Heat escaping through the walls at `temperature_c` (W). Negative when
    /// the room is colder than outside.
    pub fn heat_loss_w(&self, temperature_c: f64) -> f64 {
        (temperature_c - self.ambient_c) / self.resistance_k_per_w
    }

    /// Temperature derivative (K/s) with `power_w` of heating applied.
    pub fn rate(&self, temperature_c: f64, power_w: f64) -> f64 {
        rate_of_change(
            temperature_c,
            power_w,
            self.ambient_c,
            self.resistance_k_per_w,
            self.thermal_mass_j_per_k,
        )
    }

    /// Temperature the room converges to under constant `power_w`.
    pub fn equilibrium_c(&self, power_w: f64) -> f64 {
        self.ambient_c + power_w * self.resistance_k_per_w
    }
}

/// Newton's law of cooling balanced against heater input:
///
/// ```text
/// dT/dt = (P - (T - T_ambient) / R) / C
/// ```
///
/// Callers guarantee `resistance_k_per_w` and `thermal_mass_j_per_k` are
/// non-zero.
pub fn rate_of_change(
    temperature_c: f64,
    power_w: f64,
    ambient_c: f64,
    resistance_k_per_w: f64,
    thermal_mass_j_per_k: f64,
) -> f64 {
    (power_w - (temperature_c - ambient_c) / resistance_k_per_w) / thermal_mass_j_per_k
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bedroom() -> Envelope {
        Envelope::new(40_000.0, 10.0, 10.0)
    }

    #[test]
    fn should_be_zero_at_ambient_without_power() {
        assert_eq!(bedroom().rate(10.0, 0.0), 0.0);
    }

    #[test]
    fn should_heat_when_power_exceeds_loss() {
        // 2000 W in, 1.5 W out at 25 °C
        let rate = bedroom().rate(25.0, 2000.0);
        assert_eq!(rate, (2000.0 - 1.5) / 40_000.0);
    }

    #[test]
    fn should_cool_towards_ambient_without_power() {
        assert!(bedroom().rate(25.0, 0.0) < 0.0);
        assert!(bedroom().rate(-5.0, 0.0) > 0.0);
    }

    #[test]
    fn should_match_free_function() {
        let envelope = bedroom();
        assert_eq!(
            envelope.rate(18.0, 500.0),
            rate_of_change(18.0, 500.0, 10.0, 10.0, 40_000.0)
        );
    }

    #[test]
    fn should_have_no_net_flow_at_equilibrium() {
        let envelope = bedroom();
        let equilibrium = envelope.equilibrium_c(150.0);
        assert_eq!(equilibrium, 1510.0);
        assert_eq!(envelope.heat_loss_w(equilibrium), 150.0);
        assert_eq!(envelope.rate(equilibrium, 150.0), 0.0);
    }
}
