//! Register decode
//!
//! Pure conversions from raw LM63 register bytes to measurements. No bus
//! access happens here; the session reads the bytes and hands them over.

use crate::config::TACH_PULSES_RANGE;
use crate::registers::{TACH_CLOCK, TACH_COUNT_STALLED};
use crate::Measurement;

/// Two bytes read from a chip register pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRegisterPair {
    pub high: u8,
    pub low: u8,
}

impl RawRegisterPair {
    pub fn new(high: u8, low: u8) -> Self {
        Self { high, low }
    }

    /// Combine into a 16-bit word, high byte first
    #[inline]
    pub fn word(self) -> u16 {
        u16::from_be_bytes([self.high, self.low])
    }
}

/// Decode the local (die) temperature register
///
/// The register holds whole degrees Celsius in two's complement.
/// - 0x1E → 30
/// - 0xE2 → -30
#[inline]
pub fn decode_die_temperature(raw: u8) -> Measurement {
    raw as i8 as Measurement
}

/// Decode the remote temperature register pair
///
/// The pair is a signed 8.8 fixed-point value. The magnitude is taken first,
/// then rounded to whole degrees using only bit 7 (the 0.5 °C bit), and the
/// sign is applied last, so rounding is symmetric around zero.
/// - (0x1E, 0x40) → 30
/// - (0x1E, 0x80) → 31
pub fn decode_remote_temperature(raw: RawRegisterPair) -> Measurement {
    let word = raw.word();

    let (sign, magnitude) = if word & 0x8000 != 0 {
        (-1, (!word).wrapping_add(1))
    } else {
        (1, word)
    };

    let degrees = (magnitude >> 8) as Measurement;
    let round = ((magnitude >> 7) & 0x1) as Measurement;

    sign * (degrees + round)
}

/// Decode the tachometer count register pair into RPM
///
/// A count of 0 or 0xFFFF means the fan is stalled or below the minimum
/// detectable speed and yields 0. `tach_pulses` must be 1-3; the session
/// validates it at open.
///
/// # Panics
///
/// Debug builds panic if `tach_pulses` is outside
/// [`TACH_PULSES_RANGE`]. With `tach_pulses == 0` release builds panic on
/// the division for any non-sentinel count.
pub fn decode_fan_speed(raw: RawRegisterPair, tach_pulses: u8) -> Measurement {
    debug_assert!(
        TACH_PULSES_RANGE.contains(&tach_pulses),
        "tach_pulses must be 1-3, got {}",
        tach_pulses
    );
    let count = raw.word();

    if count == 0 || count == TACH_COUNT_STALLED {
        return 0;
    }

    let rpm = (2 * TACH_CLOCK) / (u32::from(tach_pulses) * u32::from(count));
    rpm as Measurement
}
