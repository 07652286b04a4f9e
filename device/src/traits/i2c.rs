use core::fmt::{Debug, Formatter};

/// A 7-bit bus address.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct I2cAddress(u8);

impl I2cAddress {
    pub const fn new(val: u8) -> Self {
        Self(val & 0x7F)
    }
}

impl From<u8> for I2cAddress {
    fn from(addr: u8) -> Self {
        Self::new(addr)
    }
}

impl From<I2cAddress> for u8 {
    fn from(addr: I2cAddress) -> Self {
        addr.0
    }
}

impl Debug for I2cAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for I2cAddress {
    fn format(&self, f: defmt::Formatter<'_>) {
        defmt::write!(f, "0x{:02X}", self.0)
    }
}
