//! Configuration types for the LM63 driver
//!
//! A session is opened from a [`DeviceConfig`]: which bus and address the
//! chip lives at, how many tachometer pulses the fan gives per revolution,
//! and the remote diode temperature offset. The same structure can be loaded
//! from a TOML file; every key is optional and falls back to the chip's
//! usual wiring.

mod device_config;
mod paths;

pub use device_config::{DeviceConfig, TACH_PULSES_RANGE};
pub use paths::default_config_path;
