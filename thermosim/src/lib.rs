//! Room heating simulator comparing a PID controller against a conventional
//! on/off thermostat.
//!
//! A room is a single thermal mass losing heat through its walls. Both
//! strategies drive the same heater over identical copies of the room, and
//! the run reports how much energy each used, how quickly the PID room
//! settled, and what the difference would cost over a month.
//!
//! ```no_run
//! use thermosim::config::SimulationParameters;
//! use thermosim::simulation::simulate;
//!
//! let report = simulate(SimulationParameters::default())?;
//! println!("PID used {:.2} kWh", report.metrics.pid_kwh);
//! # Ok::<(), thermosim::simulation::SimulationError>(())
//! ```

pub mod config;
pub mod control;
pub mod simulation;
pub mod thermal;
pub mod tracing;
