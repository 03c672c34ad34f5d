pub mod app;

pub use app::{
    into_frame, run_sim, run_sim_immediate, run_sim_with_metrics, Collider, ColliderId,
    ColliderTag, Cue, CueBus, CueCounts, CueKind, InputSnapshot, InputSource, LoopConfig,
    LoopError, MetricsHandle, NavGrid, NavGridError, NavPath, NullInput, SimCommand, Simulation,
    Space, TickMetricsSnapshot, Vec3,
};
