//! Core types and data structures for the LM63 driver

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Lm63Error, Result};

/// Number of channels exposed by the device
pub const CHANNEL_COUNT: usize = 3;

/// Bytes used per channel value in block reads (signed 32-bit)
pub const BYTES_PER_CHANNEL: usize = 4;

/// Channel width reported through getstat, in bits
pub const CHANNEL_LENGTH_BITS: u32 = 32;

/// A decoded channel value
///
/// Degrees Celsius for the temperature channels, RPM for the fan channel.
pub type Measurement = i32;

/// Measurement source on the chip
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelId {
    /// LM63 die temperature (-55..125 °C)
    DieTemperature = 0,
    /// Remote diode temperature (-55..125 °C)
    RemoteTemperature = 1,
    /// Fan speed (RPM)
    FanSpeed = 2,
}

impl ChannelId {
    /// All channels in index order
    pub const ALL: [ChannelId; CHANNEL_COUNT] = [
        ChannelId::DieTemperature,
        ChannelId::RemoteTemperature,
        ChannelId::FanSpeed,
    ];

    /// Channel index as seen by the host framework
    pub fn index(self) -> usize {
        self as usize
    }

    /// Unit of the values produced by this channel
    pub fn unit(self) -> Unit {
        match self {
            ChannelId::DieTemperature | ChannelId::RemoteTemperature => Unit::Celsius,
            ChannelId::FanSpeed => Unit::Rpm,
        }
    }

    /// Human-readable channel name
    pub fn name(self) -> &'static str {
        match self {
            ChannelId::DieTemperature => "die temperature",
            ChannelId::RemoteTemperature => "remote temperature",
            ChannelId::FanSpeed => "fan speed",
        }
    }

    /// Channels from `self` up to the last one, in order
    pub fn from_here(self) -> impl Iterator<Item = ChannelId> {
        Self::ALL.into_iter().skip(self.index())
    }
}

impl TryFrom<u32> for ChannelId {
    type Error = Lm63Error;

    fn try_from(index: u32) -> Result<Self> {
        match index {
            0 => Ok(ChannelId::DieTemperature),
            1 => Ok(ChannelId::RemoteTemperature),
            2 => Ok(ChannelId::FanSpeed),
            _ => Err(Lm63Error::InvalidChannel(index)),
        }
    }
}

impl std::str::FromStr for ChannelId {
    type Err = Lm63Error;

    /// Parse a channel from its short name or index
    ///
    /// # Examples
    ///
    /// ```
    /// use std::str::FromStr;
    /// use lm63_core::ChannelId;
    ///
    /// assert_eq!(ChannelId::from_str("fan").unwrap(), ChannelId::FanSpeed);
    /// assert_eq!(ChannelId::from_str("1").unwrap(), ChannelId::RemoteTemperature);
    /// assert!(ChannelId::from_str("cpu").is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "die" | "local" | "temp" | "0" => Ok(ChannelId::DieTemperature),
            "remote" | "rmt" | "1" => Ok(ChannelId::RemoteTemperature),
            "fan" | "tach" | "2" => Ok(ChannelId::FanSpeed),
            _ => Err(Lm63Error::InvalidInput(format!(
                "Unknown channel: '{}'. Valid options: die, remote, fan",
                s
            ))),
        }
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Measurement unit of a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Celsius,
    Rpm,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Celsius => f.write_str("°C"),
            Unit::Rpm => f.write_str("rpm"),
        }
    }
}

/// One decoded value together with the channel it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    pub channel: ChannelId,
    pub value: Measurement,
}

impl Reading {
    pub fn new(channel: ChannelId, value: Measurement) -> Self {
        Self { channel, value }
    }

    pub fn unit(&self) -> Unit {
        self.channel.unit()
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} {}", self.channel, self.value, self.unit())
    }
}

/// Driver debug verbosity, kept per session
///
/// The numeric debug level the host framework reads and writes through
/// getstat/setstat. Level 0 (the default) silences the per-read decode
/// trace; any other level enables it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DebugLevel(pub u32);

impl DebugLevel {
    pub const OFF: DebugLevel = DebugLevel(0);

    /// Whether decoded values should be traced
    pub fn traces_reads(self) -> bool {
        self != Self::OFF
    }
}

/// Direction of a channel
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelDirection {
    Input = 0,
    Output = 1,
    InOut = 2,
}

impl TryFrom<u32> for ChannelDirection {
    type Error = Lm63Error;

    fn try_from(raw: u32) -> Result<Self> {
        match raw {
            0 => Ok(ChannelDirection::Input),
            1 => Ok(ChannelDirection::Output),
            2 => Ok(ChannelDirection::InOut),
            _ => Err(Lm63Error::IllegalDirection),
        }
    }
}

/// Kind of values a channel produces
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelType {
    Binary = 0,
    Analog = 1,
}

/// Codes understood by getstat/setstat
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCode {
    /// G,S: session debug level
    DebugLevel = 0x0001,
    /// G: number of channels
    ChannelCount = 0x0002,
    /// G,S: channel direction (only input is accepted)
    ChannelDirection = 0x0003,
    /// G: channel length in bits
    ChannelLength = 0x0004,
    /// G: channel type
    ChannelType = 0x0005,
    /// G: driver ident string
    Ident = 0x0006,
}

impl TryFrom<u32> for StatusCode {
    type Error = Lm63Error;

    fn try_from(raw: u32) -> Result<Self> {
        match raw {
            0x0001 => Ok(StatusCode::DebugLevel),
            0x0002 => Ok(StatusCode::ChannelCount),
            0x0003 => Ok(StatusCode::ChannelDirection),
            0x0004 => Ok(StatusCode::ChannelLength),
            0x0005 => Ok(StatusCode::ChannelType),
            0x0006 => Ok(StatusCode::Ident),
            _ => Err(Lm63Error::UnknownStatusCode(raw)),
        }
    }
}

/// Value returned by getstat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusValue {
    DebugLevel(DebugLevel),
    ChannelCount(usize),
    ChannelDirection(ChannelDirection),
    ChannelLength(u32),
    ChannelType(ChannelType),
    Ident(&'static str),
}

/// Result of the interrupt entry point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrqStatus {
    /// Interrupt was raised by this device and handled
    Mine,
    /// Interrupt was not caused by this device
    NotMine,
}

/// Queries accepted by the info entry point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoType {
    /// Supported address and data access modes
    HardwareCharacteristics,
    /// Number of address spaces the driver needs
    AddressSpaceCount,
    /// Type of a specific address space
    AddressSpace(u32),
    /// Whether the driver uses an interrupt
    Irq,
    /// Process locking mode
    LockMode,
}

/// Address access modes (bit flags)
pub mod addr_mode {
    pub const A08: u32 = 0x01;
    pub const A16: u32 = 0x02;
    pub const A24: u32 = 0x04;
    pub const A32: u32 = 0x08;
}

/// Data access modes (bit flags)
pub mod data_mode {
    pub const D08: u32 = 0x01;
    pub const D16: u32 = 0x02;
    pub const D32: u32 = 0x04;
}

/// Locking the host framework must apply around driver calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockMode {
    None,
    /// Lock around each call
    Call,
    /// Lock per channel
    Channel,
}

/// Answer to an info query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverInfo {
    HardwareCharacteristics { addr_modes: u32, data_modes: u32 },
    AddressSpaceCount(u32),
    Irq { used: bool },
    LockMode(LockMode),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_debug_level_gates_read_trace() {
        assert_eq!(DebugLevel::default(), DebugLevel::OFF);
        assert!(!DebugLevel::OFF.traces_reads());
        assert!(DebugLevel(1).traces_reads());
        assert!(DebugLevel(0xC000_0007).traces_reads());
    }

    #[test]
    fn test_channel_indices() {
        assert_eq!(ChannelId::DieTemperature.index(), 0);
        assert_eq!(ChannelId::RemoteTemperature.index(), 1);
        assert_eq!(ChannelId::FanSpeed.index(), 2);
        assert_eq!(ChannelId::ALL.len(), CHANNEL_COUNT);
    }

    #[test]
    fn test_channel_try_from() {
        for ch in ChannelId::ALL {
            assert_eq!(ChannelId::try_from(ch as u32).unwrap(), ch);
        }
        assert!(matches!(
            ChannelId::try_from(3),
            Err(Lm63Error::InvalidChannel(3))
        ));
    }

    #[test]
    fn test_channel_from_str() {
        assert_eq!(ChannelId::from_str("DIE").unwrap(), ChannelId::DieTemperature);
        assert_eq!(
            ChannelId::from_str("remote").unwrap(),
            ChannelId::RemoteTemperature
        );
        assert_eq!(ChannelId::from_str("2").unwrap(), ChannelId::FanSpeed);
        assert!(matches!(
            ChannelId::from_str("pwm"),
            Err(Lm63Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_channel_from_here() {
        let rest: Vec<_> = ChannelId::RemoteTemperature.from_here().collect();
        assert_eq!(rest, vec![ChannelId::RemoteTemperature, ChannelId::FanSpeed]);

        assert_eq!(ChannelId::DieTemperature.from_here().count(), 3);
        assert_eq!(ChannelId::FanSpeed.from_here().count(), 1);
    }

    #[test]
    fn test_channel_units() {
        assert_eq!(ChannelId::DieTemperature.unit(), Unit::Celsius);
        assert_eq!(ChannelId::RemoteTemperature.unit(), Unit::Celsius);
        assert_eq!(ChannelId::FanSpeed.unit(), Unit::Rpm);
    }

    #[test]
    fn test_reading_display() {
        let r = Reading::new(ChannelId::DieTemperature, -30);
        assert_eq!(r.to_string(), "die temperature: -30 °C");

        let r = Reading::new(ChannelId::FanSpeed, 1042);
        assert_eq!(r.to_string(), "fan speed: 1042 rpm");
    }

    #[test]
    fn test_reading_serialization() {
        let r = Reading::new(ChannelId::RemoteTemperature, 31);
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, r#"{"channel":"remote_temperature","value":31}"#);

        let back: Reading = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn test_status_code_parsing() {
        assert_eq!(StatusCode::try_from(0x0002).unwrap(), StatusCode::ChannelCount);
        assert_eq!(StatusCode::try_from(StatusCode::Ident as u32).unwrap(), StatusCode::Ident);
        assert!(matches!(
            StatusCode::try_from(0x7777),
            Err(Lm63Error::UnknownStatusCode(0x7777))
        ));
    }

    #[test]
    fn test_channel_direction_parsing() {
        assert_eq!(ChannelDirection::try_from(0).unwrap(), ChannelDirection::Input);
        assert_eq!(ChannelDirection::try_from(1).unwrap(), ChannelDirection::Output);
        assert!(matches!(
            ChannelDirection::try_from(9),
            Err(Lm63Error::IllegalDirection)
        ));
    }
}
