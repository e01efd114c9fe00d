//! Heating control strategies.
//!
//! Both strategies expose a pure `step` from an explicit state value so the
//! simulation can fold them through identical loop code. The [`Controller`]
//! trait is that seam.

mod pid;
mod thermostat;

pub use pid::{PidController, PidGains, PidOutput, PidState};
pub use thermostat::{HeaterState, Thermostat};

/// A strategy that turns a room temperature into a heater power request.
pub trait Controller {
    /// Memory carried between updates.
    type State: Copy + std::fmt::Debug + PartialEq;

    /// State before the first update.
    fn initial_state(&self) -> Self::State;

    /// Requested heater power (W) for `temperature_c`, and the next state.
    fn command(&self, state: Self::State, temperature_c: f64) -> (f64, Self::State);
}

/// A PID controller regulating toward a fixed setpoint.
#[derive(Debug, Clone)]
pub struct SetpointPid {
    pub controller: PidController,
    pub target_c: f64,
}

impl SetpointPid {
    pub fn new(controller: PidController, target_c: f64) -> Self {
        Self {
            controller,
            target_c,
        }
    }
}

impl Controller for SetpointPid {
    type State = PidState;

    fn initial_state(&self) -> PidState {
        self.controller.state()
    }

    fn command(&self, state: PidState, temperature_c: f64) -> (f64, PidState) {
        let (output, next) = self.controller.step(state, self.target_c, temperature_c);
        (output.power_w(), next)
    }
}

impl Controller for Thermostat {
    type State = HeaterState;

    fn initial_state(&self) -> HeaterState {
        self.state()
    }

    fn command(&self, state: HeaterState, temperature_c: f64) -> (f64, HeaterState) {
        self.step(state, temperature_c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fold<C: Controller>(controller: &C, temperatures: &[f64]) -> Vec<f64> {
        let mut state = controller.initial_state();
        temperatures
            .iter()
            .map(|&t| {
                let (power, next) = controller.command(state, t);
                state = next;
                power
            })
            .collect()
    }

    #[test]
    fn should_fold_pid_like_repeated_updates() {
        let strategy = SetpointPid::new(PidController::new(PidGains::default(), 1.0, 2000.0), 25.0);
        let temperatures = [10.0, 10.05, 10.2, 11.0];

        let folded = fold(&strategy, &temperatures);

        let mut controller = strategy.controller.clone();
        let updated: Vec<f64> = temperatures
            .iter()
            .map(|&t| controller.update(25.0, t))
            .collect();
        assert_eq!(folded, updated);
    }

    #[test]
    fn should_fold_thermostat_like_repeated_updates() {
        let thermostat = Thermostat::new(28.0, 1.5, 2000.0);
        let temperatures = [10.0, 27.0, 29.6, 28.0, 26.4];

        assert_eq!(
            fold(&thermostat, &temperatures),
            vec![2000.0, 2000.0, 0.0, 0.0, 2000.0]
        );
    }
}
