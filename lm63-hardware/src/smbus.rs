//! SMBus driver for low-level hardware communication
//!
//! Provides blocking byte-data transactions against an SMBus adapter.

use i2cdev::core::I2CDevice;
use i2cdev::linux::{LinuxI2CDevice, LinuxI2CError};
use lm63_core::BusError;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, error, trace};

const DEV_DIR: &str = "/dev";

/// Trait for SMBus transport abstraction
///
/// Every call is one complete, blocking bus transaction. Implementations do
/// not retry. The device address is given in 8-bit form (e.g. 0x98).
///
/// This trait enables testing of `Lm63` without real hardware by allowing
/// mock implementations.
pub trait SmbusTransport: Send {
    /// Read one byte from `register` of the device at `address`
    fn read_byte_data(&mut self, bus: u32, address: u8, register: u8) -> Result<u8, BusError>;

    /// Write one byte to `register` of the device at `address`
    fn write_byte_data(
        &mut self,
        bus: u32,
        address: u8,
        register: u8,
        value: u8,
    ) -> Result<(), BusError>;
}

impl<T: SmbusTransport + ?Sized> SmbusTransport for Box<T> {
    fn read_byte_data(&mut self, bus: u32, address: u8, register: u8) -> Result<u8, BusError> {
        (**self).read_byte_data(bus, address, register)
    }

    fn write_byte_data(
        &mut self,
        bus: u32,
        address: u8,
        register: u8,
        value: u8,
    ) -> Result<(), BusError> {
        (**self).write_byte_data(bus, address, register, value)
    }
}

/// SMBus transport backed by the Linux i2c-dev interface
///
/// One `/dev/i2c-N` handle is opened per (bus, address) on first use and
/// kept open until the transport is dropped.
pub struct LinuxSmbus {
    dev_dir: PathBuf,
    devices: HashMap<(u32, u8), LinuxI2CDevice>,
}

impl Default for LinuxSmbus {
    fn default() -> Self {
        Self::new()
    }
}

impl LinuxSmbus {
    /// Create a transport using adapters under `/dev`
    pub fn new() -> Self {
        Self::with_dev_dir(DEV_DIR)
    }

    /// Create a transport using adapters under a custom directory
    pub fn with_dev_dir(dev_dir: impl Into<PathBuf>) -> Self {
        Self {
            dev_dir: dev_dir.into(),
            devices: HashMap::new(),
        }
    }

    /// Path of the character device for adapter `bus`
    pub fn adapter_path(&self, bus: u32) -> PathBuf {
        self.dev_dir.join(format!("i2c-{}", bus))
    }

    fn device(&mut self, bus: u32, address: u8) -> Result<&mut LinuxI2CDevice, BusError> {
        let path = self.adapter_path(bus);

        match self.devices.entry((bus, address)) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                // i2c-dev wants the 7-bit address
                let slave = u16::from(address >> 1);
                debug!("Opening SMBus device {} @ 0x{:02X}", path.display(), slave);

                let device = LinuxI2CDevice::new(&path, slave).map_err(|e| {
                    error!("Failed to open SMBus device {}: {}", path.display(), e);
                    io_error(bus, e)
                })?;
                Ok(entry.insert(device))
            }
        }
    }
}

fn io_error(bus: u32, e: LinuxI2CError) -> BusError {
    BusError::Io {
        bus,
        source: std::io::Error::from(e),
    }
}

impl SmbusTransport for LinuxSmbus {
    fn read_byte_data(&mut self, bus: u32, address: u8, register: u8) -> Result<u8, BusError> {
        let value = self
            .device(bus, address)?
            .smbus_read_byte_data(register)
            .map_err(|e| io_error(bus, e))?;

        trace!("RX: bus={} addr=0x{:02X} reg=0x{:02X} -> 0x{:02X}", bus, address, register, value);
        Ok(value)
    }

    fn write_byte_data(
        &mut self,
        bus: u32,
        address: u8,
        register: u8,
        value: u8,
    ) -> Result<(), BusError> {
        trace!("TX: bus={} addr=0x{:02X} reg=0x{:02X} <- 0x{:02X}", bus, address, register, value);
        self.device(bus, address)?
            .smbus_write_byte_data(register, value)
            .map_err(|e| io_error(bus, e))
    }
}

/// List the SMBus adapter numbers present under `/dev`
pub fn available_buses() -> std::io::Result<Vec<u32>> {
    available_buses_in(DEV_DIR)
}

/// List the SMBus adapter numbers present under `dev_dir`, sorted
pub fn available_buses_in(dev_dir: impl AsRef<Path>) -> std::io::Result<Vec<u32>> {
    let mut buses: Vec<u32> = std::fs::read_dir(dev_dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            entry
                .file_name()
                .to_str()
                .and_then(|name| name.strip_prefix("i2c-"))
                .and_then(|n| n.parse().ok())
        })
        .collect();
    buses.sort_unstable();
    Ok(buses)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_path() {
        let bus = LinuxSmbus::with_dev_dir("/tmp/fake-dev");
        assert_eq!(bus.adapter_path(3), PathBuf::from("/tmp/fake-dev/i2c-3"));
        assert_eq!(LinuxSmbus::new().adapter_path(0), PathBuf::from("/dev/i2c-0"));
    }

    #[test]
    fn test_missing_adapter_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut bus = LinuxSmbus::with_dev_dir(dir.path());

        let result = bus.read_byte_data(7, 0x98, 0x00);
        match result {
            Err(BusError::Io { bus, source }) => {
                assert_eq!(bus, 7);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("Expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_adapter_file_is_io_error() {
        // A regular file opens fine but is not an i2c adapter
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("i2c-0"), b"").unwrap();
        let mut bus = LinuxSmbus::with_dev_dir(dir.path());

        let result = bus.write_byte_data(0, 0x98, 0x4A, 0x2A);
        assert!(matches!(result, Err(BusError::Io { bus: 0, .. })));
    }

    #[test]
    fn test_available_buses_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["i2c-10", "i2c-3", "i2c-dev", "tty0"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }

        assert_eq!(available_buses_in(dir.path()).unwrap(), vec![3, 10]);
    }

    #[test]
    fn test_available_buses_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(available_buses_in(dir.path().join("nope")).is_err());
    }

    #[test]
    fn test_failed_open_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let mut bus = LinuxSmbus::with_dev_dir(dir.path());

        assert!(bus.read_byte_data(1, 0x98, 0x00).is_err());
        assert!(bus.devices.is_empty());
    }
}
