/// Delivery guarantee requested for a subscription or a message.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum QoS {
    AtMostOnce,
    AtLeastOnce,
    ExactlyOnce,
}

/// A broker session used to republish telemetry.
#[allow(async_fn_in_trait)]
pub trait TelemetryPublisher {
    type Error: core::fmt::Debug;

    /// Establishes a session. May block for as long as the transport does.
    async fn connect(&mut self) -> Result<(), Self::Error>;

    /// Subscribes to `topic`. Implementations that fix the subscription level
    /// for the whole session reject any other `qos` without touching the wire.
    async fn subscribe(&mut self, topic: &str, qos: QoS) -> Result<(), Self::Error>;

    async fn publish(&mut self, topic: &str, payload: &[u8], qos: QoS) -> Result<(), Self::Error>;

    /// Releases network resources. Must be harmless without an active session.
    async fn close(&mut self);
}

impl<T: TelemetryPublisher + ?Sized> TelemetryPublisher for &mut T {
    type Error = T::Error;

    async fn connect(&mut self) -> Result<(), Self::Error> {
        T::connect(self).await
    }

    async fn subscribe(&mut self, topic: &str, qos: QoS) -> Result<(), Self::Error> {
        T::subscribe(self, topic, qos).await
    }

    async fn publish(&mut self, topic: &str, payload: &[u8], qos: QoS) -> Result<(), Self::Error> {
        T::publish(self, topic, payload, qos).await
    }

    async fn close(&mut self) {
        T::close(self).await
    }
}
