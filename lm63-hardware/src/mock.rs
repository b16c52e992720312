//! In-memory SMBus for running the driver without hardware
//!
//! `MockBus` keeps a 256-byte register file per (bus, address), records
//! every transaction in order, and can be told to fail a transaction.
//! Clones share state, so a test can keep a handle while the session owns
//! the transport.

use crate::smbus::SmbusTransport;
use lm63_core::BusError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// One recorded bus transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transaction {
    Read { bus: u32, address: u8, register: u8 },
    Write { bus: u32, address: u8, register: u8, value: u8 },
}

impl Transaction {
    pub fn register(&self) -> u8 {
        match *self {
            Transaction::Read { register, .. } | Transaction::Write { register, .. } => register,
        }
    }

    pub fn is_write(&self) -> bool {
        matches!(self, Transaction::Write { .. })
    }
}

/// When an injected failure fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailAt {
    /// The Nth transaction from now (0 = the next one)
    Nth(usize),
    /// The next transaction touching this register
    Register(u8),
}

#[derive(Default)]
struct MockState {
    registers: HashMap<(u32, u8), [u8; 256]>,
    log: Vec<Transaction>,
    fail: Option<FailAt>,
    /// Devices that acknowledge; empty means every address answers
    present: Vec<(u32, u8)>,
}

impl MockState {
    fn check(&mut self, bus: u32, address: u8, register: u8) -> Result<(), BusError> {
        if !self.present.is_empty() && !self.present.contains(&(bus, address)) {
            return Err(BusError::Nack {
                bus,
                address,
                register,
            });
        }

        let fire = match self.fail {
            Some(FailAt::Nth(0)) => true,
            Some(FailAt::Nth(n)) => {
                self.fail = Some(FailAt::Nth(n - 1));
                false
            }
            Some(FailAt::Register(r)) => r == register,
            None => false,
        };

        if fire {
            self.fail = None;
            return Err(BusError::Nack {
                bus,
                address,
                register,
            });
        }
        Ok(())
    }
}

/// Simulated SMBus
#[derive(Clone, Default)]
pub struct MockBus {
    state: Arc<Mutex<MockState>>,
}

impl MockBus {
    /// Create an empty bus where every address acknowledges
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        // A poisoned lock only means another test thread panicked
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Only acknowledge the given device; others NACK
    pub fn with_device(self, bus: u32, address: u8) -> Self {
        self.state().present.push((bus, address));
        self
    }

    /// Preset a register value
    pub fn set_register(&self, bus: u32, address: u8, register: u8, value: u8) {
        self.state()
            .registers
            .entry((bus, address))
            .or_insert([0; 256])[register as usize] = value;
    }

    /// Current register value
    pub fn register(&self, bus: u32, address: u8, register: u8) -> u8 {
        self.state()
            .registers
            .get(&(bus, address))
            .map(|regs| regs[register as usize])
            .unwrap_or(0)
    }

    /// Fail the Nth transaction from now (0 = the next one)
    pub fn fail_nth(&self, n: usize) {
        self.state().fail = Some(FailAt::Nth(n));
    }

    /// Fail the next transaction that touches `register`
    pub fn fail_on_register(&self, register: u8) {
        self.state().fail = Some(FailAt::Register(register));
    }

    /// All transactions so far, in order
    pub fn transactions(&self) -> Vec<Transaction> {
        self.state().log.clone()
    }

    /// Registers written so far, with values, in order
    pub fn writes(&self) -> Vec<(u8, u8)> {
        self.state()
            .log
            .iter()
            .filter_map(|t| match *t {
                Transaction::Write {
                    register, value, ..
                } => Some((register, value)),
                Transaction::Read { .. } => None,
            })
            .collect()
    }

    /// Registers read so far, in order
    pub fn reads(&self) -> Vec<u8> {
        self.state()
            .log
            .iter()
            .filter(|t| !t.is_write())
            .map(Transaction::register)
            .collect()
    }

    /// Forget recorded transactions
    pub fn clear_log(&self) {
        self.state().log.clear();
    }
}

impl SmbusTransport for MockBus {
    fn read_byte_data(&mut self, bus: u32, address: u8, register: u8) -> Result<u8, BusError> {
        let mut state = self.state();
        state.check(bus, address, register)?;
        state.log.push(Transaction::Read {
            bus,
            address,
            register,
        });

        Ok(state
            .registers
            .get(&(bus, address))
            .map(|regs| regs[register as usize])
            .unwrap_or(0))
    }

    fn write_byte_data(
        &mut self,
        bus: u32,
        address: u8,
        register: u8,
        value: u8,
    ) -> Result<(), BusError> {
        let mut state = self.state();
        state.check(bus, address, register)?;
        state.log.push(Transaction::Write {
            bus,
            address,
            register,
            value,
        });
        state
            .registers
            .entry((bus, address))
            .or_insert([0; 256])[register as usize] = value;
        Ok(())
    }
}
