//! Error types for the LM63 driver

use thiserror::Error;

/// Failure of a single SMBus byte transaction
///
/// Produced by a bus backend and carried through the driver unchanged.
#[derive(Error, Debug)]
pub enum BusError {
    /// OS-level failure from the bus adapter (open, ioctl, ...)
    #[error("SMBus I/O error on bus {bus}: {source}")]
    Io {
        bus: u32,
        #[source]
        source: std::io::Error,
    },

    /// The addressed device did not acknowledge the transaction
    #[error("No acknowledge from device 0x{address:02X} on bus {bus} (register 0x{register:02X})")]
    Nack { bus: u32, address: u8, register: u8 },

    /// Any other adapter-specific failure
    #[error("SMBus error: {0}")]
    Other(String),
}

/// Core error type for LM63 operations
#[derive(Error, Debug)]
pub enum Lm63Error {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Bus transaction failed
    #[error("Bus error: {0}")]
    Bus(#[from] BusError),

    /// The driver does not implement the requested operation
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Status code not handled by getstat/setstat
    #[error("Unknown status code: 0x{0:04X}")]
    UnknownStatusCode(u32),

    /// All channels are inputs
    #[error("Illegal channel direction: channels are input-only")]
    IllegalDirection,

    /// Invalid input or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Channel index out of range
    #[error("Channel out of range: {0} (must be 0-2)")]
    InvalidChannel(u32),

    /// A block read stopped partway through
    #[error("Block read failed after {bytes_read} bytes: {source}")]
    BlockRead {
        bytes_read: usize,
        #[source]
        source: Box<Lm63Error>,
    },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Lm63Error {
    /// Whether this error belongs to the "unsupported operation" class
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            Lm63Error::UnsupportedOperation(_) | Lm63Error::UnknownStatusCode(_)
        )
    }
}

/// Result type alias for LM63 operations
pub type Result<T> = std::result::Result<T, Lm63Error>;

impl From<toml::de::Error> for Lm63Error {
    fn from(err: toml::de::Error) -> Self {
        Lm63Error::Config(err.to_string())
    }
}
