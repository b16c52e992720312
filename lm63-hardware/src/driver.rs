//! Host framework entry points
//!
//! The hosting framework drives a low-level driver through a fixed set of
//! operations. [`LowLevelDriver`] names that set; [`Lm63`] is its one
//! implementation.

use crate::session::Lm63;
use crate::smbus::SmbusTransport;
use lm63_core::types::{addr_mode, data_mode};
use lm63_core::{
    ChannelDirection, ChannelId, ChannelType, DebugLevel, DeviceConfig, DriverInfo, InfoType,
    IrqStatus, Lm63Error, LockMode, Measurement, Result, StatusCode, StatusValue,
    CHANNEL_COUNT, CHANNEL_LENGTH_BITS,
};
use tracing::debug;

/// Driver identification string
pub const IDENT: &str = concat!("LM63 - LM63 low-level driver v", env!("CARGO_PKG_VERSION"));

/// Operations the hosting framework invokes on a driver instance.
///
/// Channels are addressed by raw index as the framework passes them.
pub trait LowLevelDriver: Sized {
    /// Transport the driver talks through
    type Bus: ?Sized;

    /// Bring up the device and return a ready instance
    fn init(config: DeviceConfig, bus: Box<Self::Bus>) -> Result<Self>;

    /// Release the instance; returns the transport
    fn exit(self) -> Box<Self::Bus>;

    /// Read one channel
    fn read(&mut self, ch: u32) -> Result<Measurement>;

    /// Write one channel
    fn write(&mut self, ch: u32, value: Measurement) -> Result<()>;

    /// Query a status value
    fn get_stat(&self, ch: u32, code: u32) -> Result<StatusValue>;

    /// Change a status value
    fn set_stat(&mut self, ch: u32, code: u32, value: u32) -> Result<()>;

    /// Read consecutive channels into `buf`; returns bytes written
    fn block_read(&mut self, ch: u32, buf: &mut [u8]) -> Result<usize>;

    /// Write a block of data; returns bytes written
    fn block_write(&mut self, ch: u32, buf: &[u8]) -> Result<usize>;

    /// Interrupt service routine
    fn irq(&mut self) -> IrqStatus;

    /// Static driver requirements
    fn info(info: InfoType) -> Result<DriverInfo>;

    /// Identification string
    fn ident() -> &'static str;
}

impl<T: SmbusTransport + ?Sized> LowLevelDriver for Lm63<T> {
    type Bus = T;

    fn init(config: DeviceConfig, bus: Box<T>) -> Result<Self> {
        Lm63::open(config, bus)
    }

    fn exit(self) -> Box<T> {
        self.close()
    }

    fn read(&mut self, ch: u32) -> Result<Measurement> {
        let channel = ChannelId::try_from(ch)?;
        self.read_channel(channel)
    }

    fn write(&mut self, ch: u32, _value: Measurement) -> Result<()> {
        debug!("LM63 write: ch={}", ch);
        Err(Lm63Error::UnsupportedOperation(format!(
            "channel {} is read-only",
            ch
        )))
    }

    fn get_stat(&self, ch: u32, code: u32) -> Result<StatusValue> {
        debug!("LM63 getstat: ch={} code=0x{:04X}", ch, code);

        let value = match StatusCode::try_from(code)? {
            StatusCode::DebugLevel => StatusValue::DebugLevel(self.debug_level()),
            StatusCode::ChannelCount => StatusValue::ChannelCount(CHANNEL_COUNT),
            StatusCode::ChannelDirection => StatusValue::ChannelDirection(ChannelDirection::Input),
            StatusCode::ChannelLength => StatusValue::ChannelLength(CHANNEL_LENGTH_BITS),
            StatusCode::ChannelType => StatusValue::ChannelType(ChannelType::Analog),
            StatusCode::Ident => StatusValue::Ident(Self::ident()),
        };
        Ok(value)
    }

    fn set_stat(&mut self, ch: u32, code: u32, value: u32) -> Result<()> {
        debug!(
            "LM63 setstat: ch={} code=0x{:04X} value=0x{:X}",
            ch, code, value
        );

        match StatusCode::try_from(code)? {
            StatusCode::DebugLevel => {
                self.set_debug_level(DebugLevel(value));
                Ok(())
            }
            StatusCode::ChannelDirection => match ChannelDirection::try_from(value)? {
                ChannelDirection::Input => Ok(()),
                _ => Err(Lm63Error::IllegalDirection),
            },
            // Read-only codes
            _ => Err(Lm63Error::UnknownStatusCode(code)),
        }
    }

    fn block_read(&mut self, ch: u32, buf: &mut [u8]) -> Result<usize> {
        let start = ChannelId::try_from(ch)?;
        self.read_block(start, buf)
    }

    fn block_write(&mut self, ch: u32, buf: &[u8]) -> Result<usize> {
        debug!("LM63 block write: ch={}, size={}", ch, buf.len());
        Err(Lm63Error::UnsupportedOperation(
            "block write is not supported".to_string(),
        ))
    }

    fn irq(&mut self) -> IrqStatus {
        // The chip's ALERT output is not wired to the driver
        IrqStatus::NotMine
    }

    fn info(info: InfoType) -> Result<DriverInfo> {
        match info {
            InfoType::HardwareCharacteristics => Ok(DriverInfo::HardwareCharacteristics {
                addr_modes: addr_mode::A08,
                data_modes: data_mode::D08 | data_mode::D16,
            }),
            InfoType::AddressSpaceCount => Ok(DriverInfo::AddressSpaceCount(0)),
            InfoType::Irq => Ok(DriverInfo::Irq { used: false }),
            InfoType::LockMode => Ok(DriverInfo::LockMode(LockMode::Call)),
            InfoType::AddressSpace(n) => Err(Lm63Error::UnsupportedOperation(format!(
                "driver uses no address space (asked for {})",
                n
            ))),
        }
    }

    fn ident() -> &'static str {
        IDENT
    }
}
