//! Configuration loading for the player.
//!
//! All user-tunable settings are centralized here and loaded from
//! `conf/config.toml` if present. Any missing or invalid entries fall back to
//! sensible defaults so the player can always start.

mod defaults;
mod models;

pub use models::{AppConfig, LogLevel};

use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Load configuration from `path`, falling back to defaults when the file is
/// missing or malformed. Out-of-range values are clamped, never rejected.
pub fn load_config(path: &Path) -> AppConfig {
    let mut config = match fs::read_to_string(path) {
        Ok(raw) => match toml::from_str::<AppConfig>(&raw) {
            Ok(config) => {
                info!(path = %path.display(), "Loaded configuration");
                config
            }
            Err(err) => {
                warn!(path = %path.display(), "Malformed config, using defaults: {err}");
                AppConfig::default()
            }
        },
        Err(_) => {
            info!(path = %path.display(), "No config file, using defaults");
            AppConfig::default()
        }
    };
    clamp_config(&mut config);
    config
}

fn clamp_config(config: &mut AppConfig) {
    config.skip_seconds = config.skip_seconds.clamp(1, 600);
    config.cover_edge = config.cover_edge.clamp(64, 1024);
    config.volume_epsilon = config.volume_epsilon.clamp(1e-6, 0.1);
}
