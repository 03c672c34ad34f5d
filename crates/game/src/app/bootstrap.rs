use std::path::PathBuf;

use tracing::{info, warn};

use super::config::{load_config, SimConfig};

pub const CONFIG_ENV_VAR: &str = "STEADING_CONFIG";

/// Resolves the simulation config: the file named by `STEADING_CONFIG`
/// if set, otherwise built-in defaults. A file that fails to load
/// falls back to defaults with a warning rather than aborting; the
/// tunables are not required for the sim to run.
pub fn resolve_config() -> SimConfig {
    let Some(path) = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from) else {
        info!("no {CONFIG_ENV_VAR} set; using default tunables");
        return SimConfig::default();
    };
    match load_config(&path) {
        Ok(config) => {
            info!(path = %path.display(), "loaded tunables");
            config
        }
        Err(error) => {
            warn!(error = %error, "config load failed; using default tunables");
            SimConfig::default()
        }
    }
}
