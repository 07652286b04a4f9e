use super::SampleRegisters;
use crate::traits::i2c::I2cAddress;
use embedded_hal_async::i2c::I2c;

pub const TEMP_OUT: SampleRegisters = SampleRegisters {
    high: 0x41,
    low: 0x42,
};

pub struct TempOut;

impl TempOut {
    pub async fn read<I: I2c>(address: I2cAddress, i2c: &mut I) -> Result<i16, I::Error> {
        Ok(TEMP_OUT.read(address, i2c).await?.decode())
    }
}
