//! Per-device configuration, fixed once a session is open

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;

use crate::registers::DEFAULT_ADDRESS;
use crate::{Lm63Error, Result};

/// Accepted tachometer pulses per fan revolution
pub const TACH_PULSES_RANGE: RangeInclusive<u8> = 1..=3;

fn default_bus_number() -> u32 {
    0
}

fn default_device_address() -> u8 {
    DEFAULT_ADDRESS
}

fn default_tach_pulses() -> u8 {
    3
}

/// Configuration of one LM63 device.
///
/// ```toml
/// bus_number = 1
/// device_address = 0x98
/// tach_pulses = 2
/// remote_temp_offset = -3
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// SMBus adapter number
    #[serde(default = "default_bus_number")]
    pub bus_number: u32,

    /// SMBus device address (8-bit form, default 0x98)
    #[serde(default = "default_device_address")]
    pub device_address: u8,

    /// Fan tachometer pulses per revolution (1-3)
    #[serde(default = "default_tach_pulses")]
    pub tach_pulses: u8,

    /// Remote temperature offset in °C, written to the chip at open
    #[serde(default)]
    pub remote_temp_offset: i8,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            bus_number: default_bus_number(),
            device_address: default_device_address(),
            tach_pulses: default_tach_pulses(),
            remote_temp_offset: 0,
        }
    }
}

impl DeviceConfig {
    pub fn with_bus_number(mut self, bus_number: u32) -> Self {
        self.bus_number = bus_number;
        self
    }

    pub fn with_device_address(mut self, device_address: u8) -> Self {
        self.device_address = device_address;
        self
    }

    pub fn with_tach_pulses(mut self, tach_pulses: u8) -> Self {
        self.tach_pulses = tach_pulses;
        self
    }

    pub fn with_remote_temp_offset(mut self, offset: i8) -> Self {
        self.remote_temp_offset = offset;
        self
    }

    /// Check the configuration before any bus access.
    ///
    /// # Errors
    ///
    /// Returns [`Lm63Error::Config`] if `tach_pulses` is outside 1-3.
    pub fn validate(&self) -> Result<()> {
        if !TACH_PULSES_RANGE.contains(&self.tach_pulses) {
            return Err(Lm63Error::Config(format!(
                "tach_pulses must be {}-{}, got {}",
                TACH_PULSES_RANGE.start(),
                TACH_PULSES_RANGE.end(),
                self.tach_pulses
            )));
        }
        Ok(())
    }

    /// Parse and validate a DeviceConfig from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize DeviceConfig to TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Lm63Error::Config(e.to_string()))
    }

    /// Load a DeviceConfig from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}
