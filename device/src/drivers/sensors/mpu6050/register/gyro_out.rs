use super::{read_axes, SampleRegisters};
use crate::traits::i2c::I2cAddress;
use embedded_hal_async::i2c::I2c;

pub const GYRO_OUT: [SampleRegisters; 3] = [
    SampleRegisters { high: 0x43, low: 0x44 },
    SampleRegisters { high: 0x45, low: 0x46 },
    SampleRegisters { high: 0x47, low: 0x48 },
];

pub struct GyroOut;

impl GyroOut {
    pub async fn read<I: I2c>(address: I2cAddress, i2c: &mut I) -> Result<[i16; 3], I::Error> {
        read_axes(address, i2c, &GYRO_OUT).await
    }
}
