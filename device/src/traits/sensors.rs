use crate::domain::{PhysicalReading, Quantity};

/// A source of scaled telemetry samples.
///
/// A sample that could not be taken is reported as `None`; the caller skips
/// the cycle instead of treating it as a fault.
#[allow(async_fn_in_trait)]
pub trait TelemetrySensor {
    async fn sample(&mut self, quantity: Quantity) -> Option<PhysicalReading>;
}

impl<T: TelemetrySensor + ?Sized> TelemetrySensor for &mut T {
    async fn sample(&mut self, quantity: Quantity) -> Option<PhysicalReading> {
        T::sample(self, quantity).await
    }
}
