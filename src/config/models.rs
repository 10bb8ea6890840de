use serde::{Deserialize, Serialize};

/// High-level player configuration; deserializable from TOML.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "crate::config::defaults::default_log_level")]
    pub log_level: LogLevel,
    /// Step applied by the forward/rewind nudge buttons, in seconds.
    #[serde(default = "crate::config::defaults::default_skip_seconds")]
    pub skip_seconds: u32,
    /// Start playback as soon as a file is opened.
    #[serde(default = "crate::config::defaults::default_autoplay")]
    pub autoplay: bool,
    /// Square edge the cover art is scaled to, in pixels.
    #[serde(default = "crate::config::defaults::default_cover_edge")]
    pub cover_edge: u32,
    /// Volume differences below this are treated as float jitter and not
    /// written back into the volume control.
    #[serde(default = "crate::config::defaults::default_volume_epsilon")]
    pub volume_epsilon: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            log_level: crate::config::defaults::default_log_level(),
            skip_seconds: crate::config::defaults::default_skip_seconds(),
            autoplay: crate::config::defaults::default_autoplay(),
            cover_edge: crate::config::defaults::default_cover_edge(),
            volume_epsilon: crate::config::defaults::default_volume_epsilon(),
        }
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
