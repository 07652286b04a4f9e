use super::{read_axes, SampleRegisters};
use crate::traits::i2c::I2cAddress;
use embedded_hal_async::i2c::I2c;

pub const ACCEL_OUT: [SampleRegisters; 3] = [
    SampleRegisters { high: 0x3B, low: 0x3C },
    SampleRegisters { high: 0x3D, low: 0x3E },
    SampleRegisters { high: 0x3F, low: 0x40 },
];

pub struct AccelOut;

impl AccelOut {
    pub async fn read<I: I2c>(address: I2cAddress, i2c: &mut I) -> Result<[i16; 3], I::Error> {
        read_axes(address, i2c, &ACCEL_OUT).await
    }
}
