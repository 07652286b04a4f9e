//! InvenSense MPU-6050 six-axis motion sensor with on-die thermometer.

pub mod codec;
mod register;

use crate::domain::motion::Axes;
use crate::domain::temperature::{Celsius, Fahrenheit, Temperature};
use crate::domain::{PhysicalReading, Quantity};
use crate::fmt::Dbg;
use crate::traits::i2c::I2cAddress;
use crate::traits::sensors::TelemetrySensor;
use embedded_hal_async::i2c::I2c;
use register::accel_out::AccelOut;
use register::gyro_out::GyroOut;
use register::int_enable::IntEnable;
use register::pwr_mgmt_1::PwrMgmt1;
use register::temp_out::TempOut;

pub use register::SampleRegisters;

/// Bus address with AD0 tied low.
pub const ADDR: u8 = 0x68;
/// Bus address with AD0 tied high.
pub const ADDR_ALT: u8 = 0x69;

/// Counts per °C of the temperature sensor.
const LSB_PER_CELSIUS: f64 = 340.0;
/// Die temperature at a reading of zero counts.
const TEMP_OFFSET_CELSIUS: f64 = 36.53;
/// Counts per g at the ±2 g full-scale range.
const LSB_PER_G: f32 = 16384.0;
/// Counts per °/s at the ±250 °/s full-scale range.
const LSB_PER_DPS: f32 = 131.0;

#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mpu6050Error<E> {
    I2c(E),
}

impl<E> From<E> for Mpu6050Error<E> {
    fn from(e: E) -> Mpu6050Error<E> {
        Mpu6050Error::I2c(e)
    }
}

pub struct Mpu6050<I>
where
    I: I2c,
{
    address: I2cAddress,
    i2c: I,
}

impl<I> Mpu6050<I>
where
    I: I2c,
{
    /// Takes ownership of the bus handle, wakes the sensor and enables its
    /// data-ready interrupt.
    pub async fn new(i2c: I) -> Result<Self, Mpu6050Error<I::Error>> {
        Self::new_with_address(i2c, ADDR).await
    }

    pub async fn new_with_address(i2c: I, address: u8) -> Result<Self, Mpu6050Error<I::Error>> {
        let mut sensor = Self {
            address: I2cAddress::new(address),
            i2c,
        };
        sensor.initialize().await?;
        Ok(sensor)
    }

    async fn initialize(&mut self) -> Result<(), Mpu6050Error<I::Error>> {
        PwrMgmt1::write(self.address, &mut self.i2c, PwrMgmt1::awake()).await?;

        let mut int_enable = IntEnable::default();
        int_enable.data_ready(true);
        IntEnable::write(self.address, &mut self.i2c, int_enable).await?;

        debug!("MPU6050 at {:?} initialized", self.address);
        Ok(())
    }

    pub fn address(&self) -> I2cAddress {
        self.address
    }

    /// Gives the bus handle back.
    pub fn release(self) -> I {
        self.i2c
    }

    pub async fn try_read_temperature(
        &mut self,
    ) -> Result<Temperature<Fahrenheit>, Mpu6050Error<I::Error>> {
        let counts = TempOut::read(self.address, &mut self.i2c).await?;
        Ok(fahrenheit_from_counts(counts))
    }

    /// Die temperature in whole degrees Fahrenheit, or `None` when the bus
    /// transfer failed.
    pub async fn read_temperature(&mut self) -> Option<i32> {
        match self.try_read_temperature().await {
            Ok(temperature) => Some(temperature.whole_degrees()),
            Err(Mpu6050Error::I2c(e)) => {
                warn!("MPU6050 temperature read failed: {:?}", Dbg(&e));
                None
            }
        }
    }

    pub async fn try_read_acceleration(&mut self) -> Result<Axes, Mpu6050Error<I::Error>> {
        let counts = AccelOut::read(self.address, &mut self.i2c).await?;
        Ok(Axes::from_counts(counts, LSB_PER_G))
    }

    /// Acceleration in g, or `None` when the bus transfer failed.
    pub async fn read_acceleration(&mut self) -> Option<Axes> {
        match self.try_read_acceleration().await {
            Ok(axes) => Some(axes),
            Err(Mpu6050Error::I2c(e)) => {
                warn!("MPU6050 acceleration read failed: {:?}", Dbg(&e));
                None
            }
        }
    }

    pub async fn try_read_angular_rate(&mut self) -> Result<Axes, Mpu6050Error<I::Error>> {
        let counts = GyroOut::read(self.address, &mut self.i2c).await?;
        Ok(Axes::from_counts(counts, LSB_PER_DPS))
    }

    /// Angular rate in °/s, or `None` when the bus transfer failed.
    pub async fn read_angular_rate(&mut self) -> Option<Axes> {
        match self.try_read_angular_rate().await {
            Ok(axes) => Some(axes),
            Err(Mpu6050Error::I2c(e)) => {
                warn!("MPU6050 angular rate read failed: {:?}", Dbg(&e));
                None
            }
        }
    }
}

impl<I> TelemetrySensor for Mpu6050<I>
where
    I: I2c,
{
    async fn sample(&mut self, quantity: Quantity) -> Option<PhysicalReading> {
        match quantity {
            Quantity::Temperature => self.read_temperature().await.map(PhysicalReading::Temperature),
            Quantity::Acceleration => self.read_acceleration().await.map(PhysicalReading::Acceleration),
            Quantity::AngularRate => self.read_angular_rate().await.map(PhysicalReading::AngularRate),
        }
    }
}

pub fn celsius_from_counts(counts: i16) -> Temperature<Celsius> {
    Temperature::new(counts as f64 / LSB_PER_CELSIUS + TEMP_OFFSET_CELSIUS)
}

/// Converts a raw temperature sample without rounding.
pub fn fahrenheit_from_counts(counts: i16) -> Temperature<Fahrenheit> {
    celsius_from_counts(counts).into_fahrenheit()
}
