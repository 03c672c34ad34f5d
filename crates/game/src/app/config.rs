use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Externally supplied tunables. Values are used as-is; there is no
/// validation layer beyond what the simulation does with them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub move_speed: f32,
    pub cart_pull_speed: f32,
    pub gravity: f32,
    pub follow_distance: f32,
    pub follow_distance_with_cart: f32,
    pub harvest_distance: f32,
    pub gather_distance: f32,
    pub deliver_distance: f32,
    pub order_range: f32,
    pub tool_damage: i32,
    pub node_health: i32,
    pub swing_forward_seconds: f32,
    pub swing_total_seconds: f32,
    pub spawn_delay_seconds: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            move_speed: 4.0,
            cart_pull_speed: 2.5,
            gravity: -9.81,
            follow_distance: 2.0,
            follow_distance_with_cart: 4.0,
            harvest_distance: 1.5,
            gather_distance: 1.5,
            deliver_distance: 2.0,
            order_range: 10.0,
            tool_damage: 1,
            node_health: 3,
            swing_forward_seconds: 0.35,
            swing_total_seconds: 0.7,
            spawn_delay_seconds: 0.5,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path} at {json_path}: {source}")]
    Parse {
        path: String,
        json_path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Loads a config file, reporting the JSON path of the offending
/// field on parse failures.
pub fn load_config(path: &Path) -> Result<SimConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let deserializer = &mut serde_json::Deserializer::from_str(&raw);
    serde_path_to_error::deserialize(deserializer).map_err(|error| ConfigError::Parse {
        path: path.display().to_string(),
        json_path: error.path().to_string(),
        source: error.into_inner(),
    })
}
