use std::collections::HashMap;

use engine::{
    ColliderId, ColliderTag, Cue, CueBus, InputSnapshot, NavGrid, SimCommand, Simulation, Space,
    Vec3,
};
use tracing::{debug, info};

use super::config::SimConfig;

// The forward probe volume is a fixed shape: a unit-half-extent box
// centered one unit ahead and one unit up of the avatar, oriented
// with the avatar. Used identically for pickup and drop-off search,
// and for the tool's hit sweep while a swing is in flight.
const PROBE_FORWARD_UNITS: f32 = 1.0;
const PROBE_UP_UNITS: f32 = 1.0;
const PROBE_HALF_EXTENT: f32 = 1.0;
const GROUND_Y: f32 = 0.0;

include!("types.rs");
include!("avatar.rs");
include!("entities.rs");
include!("follower.rs");
include!("orders.rs");
include!("world.rs");
include!("util.rs");
