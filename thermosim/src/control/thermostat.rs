use serde::Serialize;

/// Switching state of an on/off heater.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeaterState {
    #[default]
    Off,
    Heating,
}

impl HeaterState {
    /// Next state given a temperature reading.
    ///
    /// Switches on below `setpoint - hysteresis`, off above
    /// `setpoint + hysteresis`, and holds `previous` anywhere inside the
    /// band so the heater does not chatter around the setpoint.
    pub fn from_temperature(temp: f64, previous: HeaterState, thermostat: &Thermostat) -> Self {
        if temp < thermostat.setpoint_c - thermostat.hysteresis_c {
            HeaterState::Heating
        } else if temp > thermostat.setpoint_c + thermostat.hysteresis_c {
            HeaterState::Off
        } else {
            previous
        }
    }

    pub fn is_heating(self) -> bool {
        matches!(self, HeaterState::Heating)
    }
}

/// Conventional on/off thermostat driving a fixed-power heater.
#[derive(Debug, Clone)]
pub struct Thermostat {
    pub setpoint_c: f64,
    pub hysteresis_c: f64,
    pub max_power_w: f64,
    state: HeaterState,
}

impl Thermostat {
    pub fn new(setpoint_c: f64, hysteresis_c: f64, max_power_w: f64) -> Self {
        Self {
            setpoint_c,
            hysteresis_c,
            max_power_w,
            state: HeaterState::Off,
        }
    }

    pub fn state(&self) -> HeaterState {
        self.state
    }

    /// One switching decision from an explicit state. Returns the heater
    /// power and the state to carry forward.
    pub fn step(&self, state: HeaterState, temperature_c: f64) -> (f64, HeaterState) {
        let next = HeaterState::from_temperature(temperature_c, state, self);
        let power_w = if next.is_heating() {
            self.max_power_w
        } else {
            0.0
        };
        (power_w, next)
    }

    pub fn update(&mut self, temperature_c: f64) -> f64 {
        let (power_w, next) = self.step(self.state, temperature_c);
        self.state = next;
        power_w
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn thermostat() -> Thermostat {
        Thermostat::new(28.0, 1.5, 2000.0)
    }

    #[test_case(HeaterState::Off, 26.4, HeaterState::Heating; "off below band turns on")]
    #[test_case(HeaterState::Off, 26.5, HeaterState::Off; "off at lower edge holds")]
    #[test_case(HeaterState::Off, 28.0, HeaterState::Off; "off inside band holds")]
    #[test_case(HeaterState::Off, 29.6, HeaterState::Off; "off above band stays off")]
    #[test_case(HeaterState::Heating, 26.0, HeaterState::Heating; "on below band stays on")]
    #[test_case(HeaterState::Heating, 28.0, HeaterState::Heating; "on inside band holds")]
    #[test_case(HeaterState::Heating, 29.5, HeaterState::Heating; "on at upper edge holds")]
    #[test_case(HeaterState::Heating, 29.6, HeaterState::Off; "on above band turns off")]
    fn should_follow_hysteresis(previous: HeaterState, temp: f64, expected: HeaterState) {
        assert_eq!(
            HeaterState::from_temperature(temp, previous, &thermostat()),
            expected
        );
    }

    #[test]
    fn should_start_off() {
        let mut thermostat = thermostat();
        assert_eq!(thermostat.state(), HeaterState::Off);
        assert_eq!(thermostat.update(28.0), 0.0);
    }

    #[test]
    fn should_not_chatter_inside_band() {
        let mut thermostat = thermostat();

        assert_eq!(thermostat.update(26.0), 2000.0);

        // Rising through the band keeps heating
        for temp in [26.6, 27.5, 28.0, 28.9, 29.5] {
            assert_eq!(thermostat.update(temp), 2000.0);
        }

        assert_eq!(thermostat.update(29.51), 0.0);

        // Falling back through the band stays off
        for temp in [29.4, 28.0, 27.0, 26.5] {
            assert_eq!(thermostat.update(temp), 0.0);
        }

        assert_eq!(thermostat.update(26.49), 2000.0);
    }

    #[test]
    fn should_switch_on_immediately_from_cold_room() {
        let (power, state) = thermostat().step(HeaterState::Off, 10.0);
        assert_eq!(power, 2000.0);
        assert_eq!(state, HeaterState::Heating);
    }
}
