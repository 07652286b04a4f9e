//! Reconstruction of signed samples from paired 8-bit registers.

/// The high and low halves of one 16-bit sample, as read from two registers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawRegisterPair {
    pub high: u8,
    pub low: u8,
}

impl RawRegisterPair {
    pub fn new(high: u8, low: u8) -> Self {
        Self { high, low }
    }

    pub fn decode(self) -> i16 {
        combine(self.high, self.low)
    }
}

impl From<i16> for RawRegisterPair {
    fn from(value: i16) -> Self {
        let (high, low) = split(value);
        Self { high, low }
    }
}

/// Combines a high and a low register byte into a two's-complement sample.
pub fn combine(high: u8, low: u8) -> i16 {
    let combined = (u16::from(high) << 8) | u16::from(low);
    if combined & 0x8000 != 0 {
        (-(i32::from(combined ^ 0xFFFF) + 1)) as i16
    } else {
        combined as i16
    }
}

/// Splits a sample into the bytes the sensor would report for it.
pub fn split(value: i16) -> (u8, u8) {
    let bits = value as u16;
    ((bits >> 8) as u8, (bits & 0xFF) as u8)
}
