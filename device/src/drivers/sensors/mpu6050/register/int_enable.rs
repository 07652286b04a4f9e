use super::write_register;
use crate::traits::i2c::I2cAddress;
use embedded_hal_async::i2c::I2c;

pub const INT_ENABLE: u8 = 0x38;

#[derive(Debug, Copy, Clone, Default)]
pub struct IntEnable {
    data_ready: bool,
}

impl IntEnable {
    pub async fn write<I: I2c>(
        address: I2cAddress,
        i2c: &mut I,
        reg: IntEnable,
    ) -> Result<(), I::Error> {
        write_register(address, i2c, INT_ENABLE, reg.into()).await
    }

    pub fn data_ready(&mut self, enable: bool) -> &mut Self {
        self.data_ready = enable;
        self
    }
}

impl From<IntEnable> for u8 {
    fn from(reg: IntEnable) -> Self {
        match reg.data_ready {
            true => 0b0000_0001,
            false => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_ready_only() {
        let mut reg = IntEnable::default();
        reg.data_ready(true);
        assert_eq!(0x01, u8::from(reg));
    }

    #[test]
    fn everything_off_by_default() {
        assert_eq!(0x00, u8::from(IntEnable::default()));
    }
}
