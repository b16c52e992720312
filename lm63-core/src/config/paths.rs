//! Where an LM63 device configuration lives when the host gives no path

use std::path::PathBuf;

/// `lm63/config.toml` under the user's config directory, or under `/etc`
/// when the platform reports none (e.g. a daemon without `$HOME`).
///
/// Feed the result to [`DeviceConfig::load`](crate::DeviceConfig::load).
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("/etc"))
        .join("lm63")
        .join("config.toml")
}
