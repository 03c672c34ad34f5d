use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::info;

use super::input::{InputSnapshot, InputSource};
use super::metrics::MetricsAccumulator;
use super::MetricsHandle;

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub metrics_log_interval: Duration,
    /// Tick budget for headless runs; `None` runs until the
    /// simulation asks to exit.
    pub max_sim_ticks: Option<u64>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            metrics_log_interval: Duration::from_secs(1),
            max_sim_ticks: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum LoopError {
    #[error("target_tps must be non-zero")]
    ZeroTargetTps,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimCommand {
    Continue,
    Exit,
}

/// One fixed-timestep step of the hosted simulation. The loop calls
/// this exactly once per logical tick, in real-time pacing.
pub trait Simulation {
    fn tick(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> SimCommand;
}

pub fn run_sim(
    config: LoopConfig,
    sim: &mut dyn Simulation,
    input: &mut dyn InputSource,
) -> Result<u64, LoopError> {
    let metrics_handle = MetricsHandle::default();
    run_sim_with_metrics(config, sim, input, metrics_handle)
}

/// Drives the simulation with a fixed-timestep accumulator. Returns
/// the number of ticks executed.
pub fn run_sim_with_metrics(
    config: LoopConfig,
    sim: &mut dyn Simulation,
    input: &mut dyn InputSource,
    metrics_handle: MetricsHandle,
) -> Result<u64, LoopError> {
    if config.target_tps == 0 {
        return Err(LoopError::ZeroTargetTps);
    }
    let tick_duration = Duration::from_secs_f64(1.0 / config.target_tps as f64);
    let fixed_dt_seconds = tick_duration.as_secs_f32();
    let max_ticks_per_frame = config.max_ticks_per_frame.max(1);

    let mut metrics = MetricsAccumulator::new(config.metrics_log_interval);
    let mut accumulator = Duration::ZERO;
    let mut previous = Instant::now();
    let mut total_ticks = 0u64;

    loop {
        let now = Instant::now();
        let mut frame_delta = now.saturating_duration_since(previous);
        previous = now;
        if frame_delta > config.max_frame_delta {
            frame_delta = config.max_frame_delta;
        }
        accumulator += frame_delta;

        let mut ticks_this_frame = 0u32;
        while accumulator >= tick_duration && ticks_this_frame < max_ticks_per_frame {
            accumulator -= tick_duration;
            ticks_this_frame += 1;

            let snapshot = input.next_snapshot(total_ticks);
            let tick_start = Instant::now();
            let command = sim.tick(fixed_dt_seconds, &snapshot);
            metrics.record_tick(tick_start.elapsed());
            total_ticks = total_ticks.saturating_add(1);

            if command == SimCommand::Exit {
                return Ok(total_ticks);
            }
            if let Some(budget) = config.max_sim_ticks {
                if total_ticks >= budget {
                    return Ok(total_ticks);
                }
            }
        }

        // Spiral-of-death guard: drop backlog the frame cap refused.
        if ticks_this_frame == max_ticks_per_frame && accumulator >= tick_duration {
            accumulator = Duration::ZERO;
        }

        if let Some(snapshot) = metrics.maybe_snapshot(Instant::now()) {
            metrics_handle.publish(snapshot);
            info!(
                tps = format_args!("{:.1}", snapshot.tps),
                tick_time_ms = format_args!("{:.3}", snapshot.tick_time_ms),
                "loop_metrics"
            );
        }

        if accumulator < tick_duration {
            let sleep_for = tick_duration - accumulator;
            thread::sleep(sleep_for.min(tick_duration));
        }
    }
}

/// Runs the simulation without pacing: every iteration is one tick.
/// Test and scripted-scenario entry point.
pub fn run_sim_immediate(
    ticks: u64,
    target_tps: u32,
    sim: &mut dyn Simulation,
    input: &mut dyn InputSource,
) -> Result<u64, LoopError> {
    if target_tps == 0 {
        return Err(LoopError::ZeroTargetTps);
    }
    let fixed_dt_seconds = 1.0 / target_tps as f32;
    let mut total_ticks = 0u64;
    while total_ticks < ticks {
        let snapshot = input.next_snapshot(total_ticks);
        let command = sim.tick(fixed_dt_seconds, &snapshot);
        total_ticks = total_ticks.saturating_add(1);
        if command == SimCommand::Exit {
            break;
        }
    }
    Ok(total_ticks)
}
