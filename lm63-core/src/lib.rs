//! LM63 Core Library
//!
//! Shared types, register map, decode logic and configuration for the LM63
//! temperature / fan-speed sensor. Bus access lives in `lm63-hardware`.

pub mod config;
pub mod decode;
pub mod error;
pub mod registers;
pub mod types;

// Re-export commonly used types
pub use config::{default_config_path, DeviceConfig, TACH_PULSES_RANGE};
pub use decode::{
    decode_die_temperature, decode_fan_speed, decode_remote_temperature, RawRegisterPair,
};
pub use error::*;
pub use types::*;
