//! [`TelemetryPublisher`] over an MQTT v5 session.

use crate::config::BrokerConfig;
use crate::fmt::Dbg;
use crate::traits::publisher::{QoS, TelemetryPublisher};
use embedded_io_async::{Read, Write};
use rand_core::RngCore;
use rust_mqtt::client::client::MqttClient;
use rust_mqtt::client::client_config::{ClientConfig, MqttVersion};
use rust_mqtt::packet::v5::publish_packet::QualityOfService;
use rust_mqtt::packet::v5::reason_codes::ReasonCode;

/// The only level subscriptions are made with. The client fixes it when the
/// session is configured.
pub const SUBSCRIBE_QOS: QoS = QoS::AtLeastOnce;

impl From<QoS> for QualityOfService {
    fn from(qos: QoS) -> Self {
        match qos {
            QoS::AtMostOnce => QualityOfService::QoS0,
            QoS::AtLeastOnce => QualityOfService::QoS1,
            QoS::ExactlyOnce => QualityOfService::QoS2,
        }
    }
}

/// Client settings derived from the broker section of the configuration.
pub fn client_config<'a, const MAX_PROPERTIES: usize, R: RngCore>(
    broker: &BrokerConfig<'a>,
    rng: R,
) -> ClientConfig<'a, MAX_PROPERTIES, R> {
    let mut config = ClientConfig::new(MqttVersion::MQTTv5, rng);
    config.add_max_subscribe_qos(SUBSCRIBE_QOS.into());
    config.keep_alive = broker.keepalive_secs;
    if !broker.client_id.is_empty() {
        config.add_client_id(broker.client_id);
    }
    if !broker.username.is_empty() {
        config.add_username(broker.username);
        config.add_password(broker.password);
    }
    config
}

pub struct MqttPublisher<'a, T, const MAX_PROPERTIES: usize, R>
where
    T: Read + Write,
    R: RngCore,
{
    client: MqttClient<'a, T, MAX_PROPERTIES, R>,
    host: &'a str,
    port: u16,
    tls: bool,
    max_republish: u8,
    connected: bool,
}

impl<'a, T, const MAX_PROPERTIES: usize, R> MqttPublisher<'a, T, MAX_PROPERTIES, R>
where
    T: Read + Write,
    R: RngCore,
{
    /// Wraps a client whose transport is already open to `broker`.
    pub fn new(client: MqttClient<'a, T, MAX_PROPERTIES, R>, broker: &BrokerConfig<'a>) -> Self {
        Self {
            client,
            host: broker.host,
            port: broker.port,
            tls: broker.tls,
            max_republish: broker.max_republish,
            connected: false,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }
}

impl<'a, T, const MAX_PROPERTIES: usize, R> TelemetryPublisher
    for MqttPublisher<'a, T, MAX_PROPERTIES, R>
where
    T: Read + Write,
    R: RngCore,
{
    type Error = ReasonCode;

    async fn connect(&mut self) -> Result<(), Self::Error> {
        info!("connecting to {}:{} (tls: {})", self.host, self.port, self.tls);
        self.client.connect_to_broker().await?;
        self.connected = true;
        debug!("MQTT session established");
        Ok(())
    }

    async fn subscribe(&mut self, topic: &str, qos: QoS) -> Result<(), Self::Error> {
        if qos != SUBSCRIBE_QOS {
            warn!("subscription to {} with {:?} not supported", topic, qos);
            return Err(ReasonCode::QoSNotSupported);
        }
        debug!("subscribing to {}", topic);
        self.client.subscribe_to_topic(topic).await
    }

    async fn publish(&mut self, topic: &str, payload: &[u8], qos: QoS) -> Result<(), Self::Error> {
        let mut attempt = 0;
        loop {
            match self
                .client
                .send_message(topic, payload, qos.into(), false)
                .await
            {
                Ok(()) => return Ok(()),
                Err(e) if attempt < self.max_republish => {
                    attempt += 1;
                    warn!("publish failed with {:?}, retry {}", Dbg(&e), attempt);
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn close(&mut self) {
        if !self.connected {
            return;
        }
        self.connected = false;
        if let Err(e) = self.client.disconnect().await {
            debug!("disconnect failed: {:?}", Dbg(&e));
        }
    }
}
