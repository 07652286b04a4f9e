use super::write_register;
use crate::traits::i2c::I2cAddress;
use embedded_hal_async::i2c::I2c;

pub const PWR_MGMT_1: u8 = 0x6B;

/// Power management 1. The clock source stays on the internal oscillator.
#[derive(Debug, Copy, Clone)]
pub struct PwrMgmt1 {
    sleep: bool,
}

impl PwrMgmt1 {
    /// Running, temperature sensor on, internal oscillator.
    pub fn awake() -> Self {
        Self { sleep: false }
    }

    pub async fn write<I: I2c>(
        address: I2cAddress,
        i2c: &mut I,
        reg: PwrMgmt1,
    ) -> Result<(), I::Error> {
        write_register(address, i2c, PWR_MGMT_1, reg.into()).await
    }
}

impl From<PwrMgmt1> for u8 {
    fn from(reg: PwrMgmt1) -> Self {
        match reg.sleep {
            true => 0b0100_0000,
            false => 0,
        }
    }
}
