mod cues;
mod input;
mod loop_runner;
mod math;
mod metrics;
mod nav;
mod space;

pub use cues::{Cue, CueBus, CueCounts, CueKind};
pub use input::{InputSnapshot, InputSource, NullInput};
pub use loop_runner::{
    run_sim, run_sim_immediate, run_sim_with_metrics, LoopConfig, LoopError, SimCommand,
    Simulation,
};
pub use math::{into_frame, Vec3};
pub use metrics::{MetricsHandle, TickMetricsSnapshot};
pub use nav::{NavGrid, NavGridError, NavPath};
pub use space::{Collider, ColliderId, ColliderTag, Space};
