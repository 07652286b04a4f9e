use embassy_embedded_hal::shared_bus::asynch::i2c::I2cDevice;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::mutex::Mutex;
use futures::executor::block_on;
use imu_telemetry::domain::Quantity;
use imu_telemetry::drivers::sensors::mpu6050::{Mpu6050, ADDR};
use imu_telemetry::testutil::FakeI2c;
use imu_telemetry::traits::sensors::TelemetrySensor;

const TEMP_OUT_H: u8 = 0x41;
const ACCEL_XOUT_H: u8 = 0x3B;

#[test]
fn sensor_shares_the_bus() {
    let bus: Mutex<NoopRawMutex, FakeI2c> = Mutex::new(FakeI2c::new(ADDR).with_sample(TEMP_OUT_H, 0));

    block_on(async {
        let mut sensor = Mpu6050::new(I2cDevice::new(&bus)).await.unwrap();
        assert_eq!(Some(98), sensor.read_temperature().await);

        // another bus user may touch the peripheral between samples
        bus.lock().await.set_sample(TEMP_OUT_H, -3400);
        assert_eq!(Some(80), sensor.read_temperature().await);
    });
}

#[test]
fn bus_failure_yields_absence_and_recovers() {
    let bus: Mutex<NoopRawMutex, FakeI2c> =
        Mutex::new(FakeI2c::new(ADDR).with_sample(ACCEL_XOUT_H, 16384));

    block_on(async {
        let mut sensor = Mpu6050::new(I2cDevice::new(&bus)).await.unwrap();

        bus.lock().await.set_failing(true);
        assert_eq!(None, sensor.read_temperature().await);
        assert_eq!(None, sensor.read_acceleration().await);
        assert!(sensor.sample(Quantity::AngularRate).await.is_none());
        assert!(sensor.try_read_temperature().await.is_err());

        bus.lock().await.set_failing(false);
        let axes = sensor.read_acceleration().await.unwrap();
        assert_eq!(1.0, axes.x);
    });
}
