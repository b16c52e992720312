//! lm63-hardware
//!
//! Hardware crate that contains the SMBus transport and the LM63 device
//! session. Host tools and framework glue use this crate to talk to the chip.
//
//! Public API:
//! - `session::Lm63` - device session: bring-up, channel and block reads
//! - `driver::LowLevelDriver` - host framework entry points, implemented by `Lm63`
//! - `smbus::SmbusTransport` - byte-data bus seam, with `smbus::LinuxSmbus` for i2c-dev
//! - `mock::MockBus` - in-memory register file for running without hardware

pub mod driver;
pub mod mock;
pub mod session;
pub mod smbus;

pub use driver::{LowLevelDriver, IDENT};
pub use mock::MockBus;
pub use session::Lm63;
pub use smbus::{available_buses, available_buses_in, LinuxSmbus, SmbusTransport};
