//! LM63 register map and bring-up values
//!
//! Register offsets and bit definitions taken from the LM63 datasheet.
//! Only a handful are used by the driver itself; the rest are kept so that
//! tools built on top of the transport can address the chip by name.

/// Default SMBus address of the LM63 (8-bit form)
pub const DEFAULT_ADDRESS: u8 = 0x98;

/// Local (die) temperature
pub const TEMP: u8 = 0x00;
/// Remote temperature MSB
pub const RMTTEMP_MSB: u8 = 0x01;
/// ALERT status
pub const ALERT_STATE: u8 = 0x02;
/// Configuration
pub const CFG: u8 = 0x03;
/// Conversion rate
pub const CONVRATE: u8 = 0x04;
/// Local high setpoint
pub const TEMP_HIGH: u8 = 0x05;
/// Remote high setpoint MSB
pub const RMTTEMP_HIGH_MSB: u8 = 0x07;
/// Remote low setpoint MSB
pub const RMTTEMP_LOW_MSB: u8 = 0x08;
/// One shot
pub const ONESHOT: u8 = 0x0F;
/// Remote temperature LSB
pub const RMTTEMP_LSB: u8 = 0x10;
/// Remote temperature offset MSB
pub const RMTTEMP_OFF_MSB: u8 = 0x11;
/// Remote temperature offset LSB
pub const RMTTEMP_OFF_LSB: u8 = 0x12;
/// Remote high setpoint LSB
pub const RMTTEMP_HIGH_LSB: u8 = 0x13;
/// Remote low setpoint LSB
pub const RMTTEMP_LOW_LSB: u8 = 0x14;
/// ALERT mask
pub const ALERT_MASK: u8 = 0x16;
/// Remote TCRIT setpoint
pub const RMTTEMP_TCRIT_SET: u8 = 0x19;
/// Remote TCRIT hysteresis
pub const RMTTEMP_TCRIT_HYS: u8 = 0x21;
/// Tachometer count LSB
pub const TACH_COUNT_LSB: u8 = 0x46;
/// Tachometer count MSB
pub const TACH_COUNT_MSB: u8 = 0x47;
/// Tachometer limit LSB
pub const TACH_LIMIT_LSB: u8 = 0x48;
/// Tachometer limit MSB
pub const TACH_LIMIT_MSB: u8 = 0x49;
/// PWM and RPM configuration
pub const PWM_RPM: u8 = 0x4A;
/// Fan spin-up configuration
pub const FAN_SPINUP_CFG: u8 = 0x4B;
/// PWM value
pub const PWM_VALUE: u8 = 0x4C;
/// PWM frequency
pub const PWM_FREQ: u8 = 0x4D;
/// Lookup table hysteresis
pub const LOOKUP_HYS: u8 = 0x4F;
/// Remote diode temperature filter
pub const RMTTEMP_FILTER: u8 = 0xBF;
/// Manufacturer ID
pub const MANUFACTURER_ID: u8 = 0xFE;
/// Stepping / die revision ID
pub const STEPPING_DIE_REV: u8 = 0xFF;

/// Number of lookup table entries
pub const LOOKUP_TABLE_LEN: u8 = 8;

/// Lookup table temperature register for entry `n` (0..8)
pub const fn lookup_table_temp(n: u8) -> u8 {
    0x50 + 2 * n
}

/// Lookup table PWM register for entry `n` (0..8)
pub const fn lookup_table_pwm(n: u8) -> u8 {
    0x51 + 2 * n
}

/// Configuration register bits
pub mod config_reg {
    /// Start operation; cleared means standby
    pub const START: u8 = 0x01;
    /// Enable interrupt output
    pub const INT_ENABLE: u8 = 0x02;
    /// Disable interrupt output
    pub const INT_CLEAR: u8 = 0x08;
    /// 20 ms reset pulse
    pub const RESET: u8 = 0x10;
    /// 20 ms CI pulse
    pub const CI_CLEAR: u8 = 0x40;
    /// Soft chip reset
    pub const INIT: u8 = 0x80;
}

/// PWM and RPM configuration register bits
pub mod pwm_rpm {
    /// PWM value (0x4C) and lookup table (0x50-0x5F) are writable
    pub const PWM_WRITE_ENABLE: u8 = 0x20;
    /// PWM output polarity: set = 0 V is fan ON
    pub const PWM_POLARITY: u8 = 0x10;
    /// Master PWM clock is 1.4 kHz (clear: 360 kHz)
    pub const PWM_CLOCK_SELECT: u8 = 0x08;
    /// Tach mode: most accurate readings, 0xFFFF under minimum detectable RPM
    pub const TACH_MODE_ACCURATE: u8 = 0x02;
    /// Mask of the tach mode field
    pub const TACH_MODE_MASK: u8 = 0x03;
}

/// PWM/RPM value written while programming the PWM registers
pub const PWM_RPM_BRINGUP: u8 =
    pwm_rpm::PWM_WRITE_ENABLE | pwm_rpm::PWM_CLOCK_SELECT | pwm_rpm::TACH_MODE_ACCURATE;

/// PWM/RPM value left in place after bring-up (PWM registers read-only)
pub const PWM_RPM_LOCKED: u8 = PWM_RPM_BRINGUP & !pwm_rpm::PWM_WRITE_ENABLE;

/// Fan spin-up configuration power-on default
pub const FAN_SPINUP_DEFAULT: u8 = 0x3F;

/// PWM frequency power-on default
pub const PWM_FREQ_DEFAULT: u8 = 0x17;

/// PWM value power-on default
pub const PWM_VALUE_DEFAULT: u8 = 0x00;

/// Tachometer clock scaling constant from the datasheet
pub const TACH_CLOCK: u32 = 5_400_000;

/// Tach count reported when the fan is below the minimum detectable speed
pub const TACH_COUNT_STALLED: u16 = 0xFFFF;
