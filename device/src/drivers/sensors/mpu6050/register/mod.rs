use crate::traits::i2c::I2cAddress;
use embedded_hal_async::i2c::I2c;

use super::codec::RawRegisterPair;

pub mod accel_out;
pub mod gyro_out;
pub mod int_enable;
pub mod pwr_mgmt_1;
pub mod temp_out;

/// Addresses of the high and low byte registers of one sample.
#[derive(Debug, Copy, Clone)]
pub struct SampleRegisters {
    pub high: u8,
    pub low: u8,
}

impl SampleRegisters {
    /// Reads both halves with two single-byte transfers, high byte first.
    pub async fn read<I: I2c>(
        &self,
        address: I2cAddress,
        i2c: &mut I,
    ) -> Result<RawRegisterPair, I::Error> {
        let high = read_register(address, i2c, self.high).await?;
        let low = read_register(address, i2c, self.low).await?;
        Ok(RawRegisterPair::new(high, low))
    }
}

/// Reads the three samples of an X/Y/Z register block.
pub(crate) async fn read_axes<I: I2c>(
    address: I2cAddress,
    i2c: &mut I,
    axes: &[SampleRegisters; 3],
) -> Result<[i16; 3], I::Error> {
    let mut counts = [0; 3];
    for (count, registers) in counts.iter_mut().zip(axes.iter()) {
        *count = registers.read(address, i2c).await?.decode();
    }
    Ok(counts)
}

pub(crate) async fn read_register<I: I2c>(
    address: I2cAddress,
    i2c: &mut I,
    register: u8,
) -> Result<u8, I::Error> {
    let mut buf = [0; 1];
    i2c.write_read(address.into(), &[register], &mut buf).await?;
    Ok(buf[0])
}

pub(crate) async fn write_register<I: I2c>(
    address: I2cAddress,
    i2c: &mut I,
    register: u8,
    value: u8,
) -> Result<(), I::Error> {
    i2c.write(address.into(), &[register, value]).await
}
