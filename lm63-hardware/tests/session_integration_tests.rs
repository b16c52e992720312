//! Integration tests for the LM63 session against a simulated chip
//!
//! These go through the public API only: configuration from a TOML file,
//! bring-up, channel reads and the framework entry points.

use lm63_core::registers::*;
use lm63_core::{BusError, ChannelId, DeviceConfig, Lm63Error, Reading};
use lm63_hardware::mock::Transaction;
use lm63_hardware::{Lm63, LowLevelDriver, MockBus};
use std::io::Write;

const BUS: u32 = 1;
const ADDR: u8 = 0x98;

/// Simulated chip on bus 1 with plausible readings preloaded
fn simulated_chip() -> MockBus {
    let mock = MockBus::new().with_device(BUS, ADDR);
    mock.set_register(BUS, ADDR, TEMP, 0x23); // 35 °C
    mock.set_register(BUS, ADDR, RMTTEMP_MSB, 0x30); // 48.75 °C
    mock.set_register(BUS, ADDR, RMTTEMP_LSB, 0xC0);
    mock.set_register(BUS, ADDR, TACH_COUNT_MSB, 0x0A); // 2700 counts
    mock.set_register(BUS, ADDR, TACH_COUNT_LSB, 0x8C);
    mock
}

fn config_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_open_from_config_file_and_read_all() {
    let file = config_file("bus_number = 1\ntach_pulses = 2\n");
    let config = DeviceConfig::load(file.path()).unwrap();

    let mock = simulated_chip();
    let mut session = Lm63::open(config, Box::new(mock.clone())).unwrap();

    let readings = session.read_all().unwrap();
    assert_eq!(
        readings,
        vec![
            Reading::new(ChannelId::DieTemperature, 35),
            Reading::new(ChannelId::RemoteTemperature, 49),
            Reading::new(ChannelId::FanSpeed, 2000),
        ]
    );
}

#[test]
fn test_bad_config_file_issues_no_transactions() {
    let file = config_file("tach_pulses = 4\n");
    assert!(matches!(
        DeviceConfig::load(file.path()),
        Err(Lm63Error::Config(_))
    ));

    // Same check when the config is built in code and handed to open
    let mock = simulated_chip();
    let config = DeviceConfig::default().with_bus_number(BUS).with_tach_pulses(0);
    let result = Lm63::open(config, Box::new(mock.clone()));

    assert!(matches!(result, Err(Lm63Error::Config(_))));
    assert!(mock.transactions().is_empty());
}

#[test]
fn test_open_failure_stops_all_traffic() {
    for failing in 0..7 {
        let mock = simulated_chip();
        mock.fail_nth(failing);

        let config = DeviceConfig::default().with_bus_number(BUS);
        let result = Lm63::open(config, Box::new(mock.clone()));

        match result {
            Err(Lm63Error::Bus(BusError::Nack { bus, address, .. })) => {
                assert_eq!(bus, BUS);
                assert_eq!(address, ADDR);
            }
            Err(other) => panic!("Expected Nack, got {}", other),
            Ok(_) => panic!("open should fail at write {}", failing),
        }
        // Only writes before the failure; no reads were ever attempted
        assert_eq!(mock.writes().len(), failing);
        assert!(mock.reads().is_empty());
    }
}

#[test]
fn test_block_read_two_channel_buffer() {
    let mock = simulated_chip();
    let config = DeviceConfig::default().with_bus_number(BUS);
    let mut drv = Lm63::<MockBus>::init(config, Box::new(mock.clone())).unwrap();
    mock.clear_log();

    let mut buf = [0u8; 8];
    let n = drv.block_read(ChannelId::DieTemperature as u32, &mut buf).unwrap();

    assert_eq!(n, 8);
    assert_eq!(i32::from_ne_bytes(buf[..4].try_into().unwrap()), 35);
    assert_eq!(i32::from_ne_bytes(buf[4..].try_into().unwrap()), 49);
    // Channel 2 (tach registers) is never touched
    assert!(!mock
        .reads()
        .iter()
        .any(|r| *r == TACH_COUNT_MSB || *r == TACH_COUNT_LSB));
}

#[test]
fn test_writes_rejected_for_every_channel() {
    let mock = simulated_chip();
    let config = DeviceConfig::default().with_bus_number(BUS);
    let mut drv = Lm63::<MockBus>::init(config, Box::new(mock.clone())).unwrap();
    mock.clear_log();

    for ch in ChannelId::ALL {
        let err = drv.write(ch as u32, 100).unwrap_err();
        assert!(err.is_unsupported());
    }
    assert!(mock.transactions().is_empty());
}

#[test]
fn test_chip_state_survives_close_open() {
    let mock = simulated_chip();
    let config = DeviceConfig::default()
        .with_bus_number(BUS)
        .with_remote_temp_offset(-5);

    let session = Lm63::open(config, Box::new(mock.clone())).unwrap();
    let bus = session.close();
    assert_eq!(mock.register(BUS, ADDR, RMTTEMP_OFF_MSB), 0xFB);
    assert_eq!(mock.register(BUS, ADDR, PWM_RPM), 0x0A);

    mock.clear_log();
    let mut session = Lm63::open(DeviceConfig::default().with_bus_number(BUS), bus).unwrap();
    assert_eq!(session.read_channel(ChannelId::DieTemperature).unwrap(), 35);
    assert_eq!(
        mock.transactions().last(),
        Some(&Transaction::Read {
            bus: BUS,
            address: ADDR,
            register: TEMP
        })
    );
}
