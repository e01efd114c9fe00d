//! Command-line front end for the heating simulator.
//!
//! Builds parameters from an optional JSON file plus flags, runs the
//! simulation off the async runtime so Ctrl-C can cancel it, and prints a
//! summary or the full report as JSON.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use thermosim::config::SimulationParameters;
use thermosim::simulation::{Metrics, Simulation, SimulationReport, Verdict};
use thermosim::thermal::{DEFAULT_WALL_THICKNESS_CM, IntegrationMethod, Room, Wall};
use thermosim::tracing::prelude::*;

#[derive(Debug, Parser)]
#[command(name = "thermosim", version, about = "Compare PID heating against an on/off thermostat")]
struct Args {
    /// JSON file with simulation parameters; flags override its values.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Room preset: small-bedroom, large-hall or custom (with --volume-m3).
    #[arg(long)]
    room: Option<Room>,

    /// Air volume for a custom room (m³).
    #[arg(long)]
    volume_m3: Option<f64>,

    /// Wall preset: burnt-clay-bricks, cement-bricks or custom (with
    /// --resistance-per-cm).
    #[arg(long)]
    wall: Option<Wall>,

    /// Thermal resistance per centimetre for a custom wall.
    #[arg(long)]
    resistance_per_cm: Option<f64>,

    /// Wall thickness (cm), assumed uniform across the room.
    #[arg(long)]
    wall_thickness_cm: Option<f64>,

    /// Outside temperature (°C).
    #[arg(long, allow_hyphen_values = true)]
    ambient_c: Option<f64>,

    /// Hours the heater runs.
    #[arg(long)]
    hours: Option<f64>,

    /// Electricity price per kWh.
    #[arg(long)]
    cost_per_kwh: Option<f64>,

    /// Desired temperature for the PID controller (°C).
    #[arg(long)]
    target_c: Option<f64>,

    /// Thermostat setting (°C).
    #[arg(long)]
    thermostat_target_c: Option<f64>,

    #[arg(long)]
    hysteresis_c: Option<f64>,

    /// Heater rating (W).
    #[arg(long)]
    max_power_w: Option<f64>,

    #[arg(long)]
    kp: Option<f64>,

    #[arg(long)]
    ki: Option<f64>,

    #[arg(long)]
    kd: Option<f64>,

    /// Integration time step (s).
    #[arg(long)]
    dt: Option<f64>,

    /// Settling band around the PID target (°C).
    #[arg(long)]
    tolerance_c: Option<f64>,

    /// Integration method: rk4 or euler.
    #[arg(long)]
    method: Option<IntegrationMethod>,

    /// Print the full report as JSON instead of a summary.
    #[arg(long)]
    json: bool,

    /// Write both temperature histories to a CSV file.
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,
}

impl Args {
    fn parameters(&self) -> Result<SimulationParameters> {
        let mut params = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("failed to parse {}", path.display()))?
            }
            None => SimulationParameters::default(),
        };

        if let Some(room) = self.room() {
            params = params.with_room(room);
        }
        if let Some(wall) = self.wall() {
            let thickness = self.wall_thickness_cm.unwrap_or(DEFAULT_WALL_THICKNESS_CM);
            params = params.with_wall(wall, thickness);
        }

        let overrides = [
            (&mut params.ambient_c, self.ambient_c),
            (&mut params.duration_hours, self.hours),
            (&mut params.cost_per_kwh, self.cost_per_kwh),
            (&mut params.pid_target_c, self.target_c),
            (&mut params.thermostat_target_c, self.thermostat_target_c),
            (&mut params.hysteresis_c, self.hysteresis_c),
            (&mut params.max_power_w, self.max_power_w),
            (&mut params.gains.proportional, self.kp),
            (&mut params.gains.integral, self.ki),
            (&mut params.gains.derivative, self.kd),
            (&mut params.time_step_s, self.dt),
            (&mut params.settling_tolerance_c, self.tolerance_c),
        ];
        for (field, value) in overrides {
            if let Some(value) = value {
                *field = value;
            }
        }
        if let Some(method) = self.method {
            params.method = method;
        }

        Ok(params)
    }

    /// A volume on its own implies a custom room.
    fn room(&self) -> Option<Room> {
        match (self.room, self.volume_m3) {
            (Some(Room::Custom { .. }) | None, Some(volume_m3)) => Some(Room::Custom { volume_m3 }),
            (room, _) => room,
        }
    }

    /// A per-centimetre resistance implies a custom wall; a thickness alone
    /// re-applies the default clay brick.
    fn wall(&self) -> Option<Wall> {
        match (self.wall, self.resistance_per_cm) {
            (Some(Wall::Custom { .. }) | None, Some(resistance_per_cm)) => {
                Some(Wall::Custom { resistance_per_cm })
            }
            (None, None) if self.wall_thickness_cm.is_some() => Some(Wall::BurntClayBricks),
            (wall, _) => wall,
        }
    }
}

#[derive(Serialize)]
struct HistoryRow {
    minute: u64,
    pid_c: f64,
    thermostat_c: f64,
}

fn write_csv(path: &Path, report: &SimulationReport) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    let pid = &report.result.pid.history;
    let thermostat = &report.result.thermostat.history;
    for (pid, thermostat) in pid.iter().zip(thermostat) {
        writer.serialize(HistoryRow {
            minute: pid.minute,
            pid_c: pid.temperature_c,
            thermostat_c: thermostat.temperature_c,
        })?;
    }
    writer.flush()?;

    Ok(())
}

fn verdict_message(metrics: &Metrics) -> String {
    match (metrics.verdict, metrics.percent_savings) {
        (Verdict::PidSaves, Some(savings)) => format!(
            "The PID controller maintained comfort while using {savings:.1}% less energy."
        ),
        (Verdict::NoSavings, _) => "The PID used more energy. This usually happens when the \
             thermostat target is set too low to keep the room comfortable."
            .to_string(),
        _ => "Savings are undefined for this run.".to_string(),
    }
}

fn print_summary(params: &SimulationParameters, report: &SimulationReport) {
    let metrics = &report.metrics;

    println!("Thermostat usage:   {:.2} kWh", metrics.thermostat_kwh);
    println!("PID usage:          {:.2} kWh", metrics.pid_kwh);
    match metrics.percent_savings {
        Some(savings) => println!("Energy savings:     {savings:.1} %"),
        None => println!("Energy savings:     undefined"),
    }
    match metrics.settling_minute {
        Some(minute) => println!("Settling time:      {minute} min"),
        None => println!("Settling time:      not settled"),
    }
    println!(
        "Final temperature:  PID {:.2} °C (target {}), thermostat {:.2} °C (set {})",
        report.result.pid.final_temperature_c,
        params.pid_target_c,
        report.result.thermostat.final_temperature_c,
        params.thermostat_target_c,
    );
    println!();

    println!("{}", verdict_message(metrics));
    if let Some(money) = metrics.monthly_savings.filter(|money| *money > 0.0) {
        println!("At this rate you would save {money:.2} per month.");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    thermosim::tracing::init_subscriber();

    let args = Args::parse();
    let params = args.parameters()?.validate()?;
    debug!(?params, "Parameters");

    let cancellation = CancellationToken::new();
    let ctrl_c = {
        let cancellation = cancellation.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupt received, stopping simulation");
                cancellation.cancel();
            }
        })
    };

    let simulation = Simulation::new(params.clone()).with_cancellation(cancellation);
    let show_progress = !args.json;
    let report = tokio::task::spawn_blocking(move || {
        simulation.report_with_progress(|fraction| {
            if show_progress {
                eprint!("\rSimulating... {:>3.0}%", fraction * 100.0);
                let _ = std::io::stderr().flush();
            }
        })
    })
    .await
    .context("simulation task failed")??;
    ctrl_c.abort();

    if show_progress {
        eprintln!();
    }

    if let Some(path) = &args.csv {
        write_csv(path, &report)?;
        info!(path = %path.display(), "Wrote temperature history");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&params, &report);
    }

    Ok(())
}
