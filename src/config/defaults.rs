pub(crate) fn default_log_level() -> crate::config::LogLevel {
    crate::config::LogLevel::Info
}

pub(crate) fn default_skip_seconds() -> u32 {
    10
}

pub(crate) fn default_autoplay() -> bool {
    true
}

pub(crate) fn default_cover_edge() -> u32 {
    300
}

pub(crate) fn default_volume_epsilon() -> f64 {
    0.001
}
