//! LM63 session - bring-up and channel reads
//!
//! A session is created by [`Lm63::open`], which programs the chip once and
//! then serves channel reads until it is closed. The chip is not reset on
//! close; it keeps the last programmed state for the next session.

use crate::smbus::{LinuxSmbus, SmbusTransport};
use lm63_core::registers::*;
use lm63_core::{
    decode_die_temperature, decode_fan_speed, decode_remote_temperature, ChannelId, DebugLevel,
    DeviceConfig, Lm63Error, Measurement, RawRegisterPair, Reading, Result, BYTES_PER_CHANNEL,
};
use tracing::{debug, error, trace};

/// Register writes performed at open, in order
///
/// The remote temperature offset pair is appended from the configuration.
const BRINGUP_SEQUENCE: [(u8, u8); 5] = [
    // Unlock PWM value + lookup table, 1.4 kHz PWM clock, accurate tach mode
    (PWM_RPM, PWM_RPM_BRINGUP),
    (FAN_SPINUP_CFG, FAN_SPINUP_DEFAULT),
    (PWM_FREQ, PWM_FREQ_DEFAULT),
    (PWM_VALUE, PWM_VALUE_DEFAULT),
    // Lock PWM value + lookup table again
    (PWM_RPM, PWM_RPM_LOCKED),
];

/// Open session to one LM63
///
/// Generic over the transport type, allowing real hardware (`LinuxSmbus`)
/// or mock transports for testing. Calls must be serialized by the owner;
/// `&mut self` on every bus operation enforces that.
pub struct Lm63<T: SmbusTransport + ?Sized = dyn SmbusTransport> {
    bus: Box<T>,
    config: DeviceConfig,
    debug_level: DebugLevel,
}

impl Lm63<LinuxSmbus> {
    /// Open the device through the Linux i2c-dev interface
    pub fn open_linux(config: DeviceConfig) -> Result<Self> {
        Self::open(config, Box::new(LinuxSmbus::new()))
    }
}

impl<T: SmbusTransport + ?Sized> Lm63<T> {
    /// Validate `config`, program the chip and return a ready session.
    ///
    /// Register writes, in order: PWM/RPM config (PWM unlocked), fan
    /// spin-up, PWM frequency, PWM value, PWM/RPM config (PWM locked),
    /// remote offset LSB (always 0), remote offset MSB.
    ///
    /// # Errors
    ///
    /// * [`Lm63Error::Config`] if the configuration is invalid. No bus
    ///   transaction is issued in that case.
    /// * [`Lm63Error::Bus`] from the first failing write. Nothing is rolled
    ///   back and no session is returned.
    pub fn open(config: DeviceConfig, bus: Box<T>) -> Result<Self> {
        debug!(
            "LM63 open: bus={} addr=0x{:02X} tach_pulses={} rmt_offset={}",
            config.bus_number, config.device_address, config.tach_pulses, config.remote_temp_offset
        );

        config.validate().map_err(|e| {
            error!("Invalid LM63 configuration: {}", e);
            e
        })?;

        let mut session = Self {
            bus,
            config,
            debug_level: DebugLevel::default(),
        };

        for (register, value) in BRINGUP_SEQUENCE {
            session.write_register(register, value)?;
        }

        session.write_register(RMTTEMP_OFF_LSB, 0)?;
        session.write_register(RMTTEMP_OFF_MSB, session.config.remote_temp_offset as u8)?;

        debug!("LM63 ready");
        Ok(session)
    }

    /// Release the session and hand back the transport.
    ///
    /// The chip is left as programmed.
    pub fn close(self) -> Box<T> {
        debug!("LM63 close");
        self.bus
    }

    /// Configuration this session was opened with
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn debug_level(&self) -> DebugLevel {
        self.debug_level
    }

    pub fn set_debug_level(&mut self, level: DebugLevel) {
        self.debug_level = level;
    }

    fn read_register(&mut self, register: u8) -> Result<u8> {
        self.bus
            .read_byte_data(self.config.bus_number, self.config.device_address, register)
            .map_err(|e| {
                error!("Read of register 0x{:02X} failed: {}", register, e);
                Lm63Error::Bus(e)
            })
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<()> {
        self.bus
            .write_byte_data(
                self.config.bus_number,
                self.config.device_address,
                register,
                value,
            )
            .map_err(|e| {
                error!("Write of register 0x{:02X} failed: {}", register, e);
                Lm63Error::Bus(e)
            })
    }

    fn read_pair(&mut self, high: u8, low: u8) -> Result<RawRegisterPair> {
        let high = self.read_register(high)?;
        let low = self.read_register(low)?;
        Ok(RawRegisterPair::new(high, low))
    }

    /// Read and decode one channel.
    ///
    /// Die temperature takes one register read; remote temperature and fan
    /// speed read the MSB first, then the LSB. The first failing read aborts
    /// the call.
    pub fn read_channel(&mut self, channel: ChannelId) -> Result<Measurement> {
        debug!("LM63 read: ch={}", channel.index());

        let value = match channel {
            ChannelId::DieTemperature => decode_die_temperature(self.read_register(TEMP)?),
            ChannelId::RemoteTemperature => {
                decode_remote_temperature(self.read_pair(RMTTEMP_MSB, RMTTEMP_LSB)?)
            }
            ChannelId::FanSpeed => decode_fan_speed(
                self.read_pair(TACH_COUNT_MSB, TACH_COUNT_LSB)?,
                self.config.tach_pulses,
            ),
        };

        if self.debug_level.traces_reads() {
            trace!("{} = {} {}", channel, value, channel.unit());
        }
        Ok(value)
    }

    /// Read consecutive channels into `buf`, 4 bytes (native-endian i32)
    /// per channel.
    ///
    /// Reading starts at `start` and stops after the last channel or when
    /// `buf` has no room for another value. Returns the number of bytes
    /// written.
    ///
    /// # Errors
    ///
    /// [`Lm63Error::BlockRead`] if a channel read fails. `bytes_read` counts
    /// the values already in `buf`; no further channel is read.
    pub fn read_block(&mut self, start: ChannelId, buf: &mut [u8]) -> Result<usize> {
        debug!("LM63 block read: ch={}, size={}", start.index(), buf.len());

        let mut bytes_read = 0;
        let slots = buf.chunks_exact_mut(BYTES_PER_CHANNEL);

        for (channel, slot) in start.from_here().zip(slots) {
            let value = self
                .read_channel(channel)
                .map_err(|e| Lm63Error::BlockRead {
                    bytes_read,
                    source: Box::new(e),
                })?;

            slot.copy_from_slice(&value.to_ne_bytes());
            bytes_read += BYTES_PER_CHANNEL;
        }

        Ok(bytes_read)
    }

    /// Read every channel once
    pub fn read_all(&mut self) -> Result<Vec<Reading>> {
        ChannelId::ALL
            .into_iter()
            .map(|ch| self.read_channel(ch).map(|v| Reading::new(ch, v)))
            .collect()
    }

    /// Read the manufacturer ID and die revision registers
    pub fn read_ident_registers(&mut self) -> Result<(u8, u8)> {
        let manufacturer = self.read_register(MANUFACTURER_ID)?;
        let revision = self.read_register(STEPPING_DIE_REV)?;
        Ok((manufacturer, revision))
    }
}
