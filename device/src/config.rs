//! Broker and telemetry settings.
//!
//! Everything here is rebuilt from its source on every restart; nothing is
//! persisted by the device.

use crate::domain::Quantity;
use core::fmt::Write;
use embassy_time::Duration;
use heapless::String;
use serde::Deserialize;

pub const TOPIC_CAPACITY: usize = 96;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    Parse,
    TopicTooLong,
}

/// Connection settings handed to the publisher when it is constructed.
///
/// `host`, `port` and `tls` describe the transport the caller opens; the rest
/// goes into the MQTT session itself.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BrokerConfig<'a> {
    pub host: &'a str,
    pub port: u16,
    pub tls: bool,
    pub username: &'a str,
    pub password: &'a str,
    pub client_id: &'a str,
    pub keepalive_secs: u16,
    /// Retries for a publish that was not acknowledged.
    pub max_republish: u8,
}

impl Default for BrokerConfig<'_> {
    fn default() -> Self {
        Self {
            host: "io.adafruit.com",
            port: 8883,
            tls: true,
            username: "",
            password: "",
            client_id: "",
            keepalive_secs: 60,
            max_republish: 4,
        }
    }
}

/// What the supervisor samples, where it publishes it and how often.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig<'a> {
    pub account: &'a str,
    pub feed: &'a str,
    pub quantity: Quantity,
    pub interval_secs: u32,
    pub display_pacing_ms: u32,
}

impl Default for TelemetryConfig<'_> {
    fn default() -> Self {
        Self {
            account: "",
            feed: "sensors.temperature",
            quantity: Quantity::Temperature,
            interval_secs: 5,
            display_pacing_ms: 1000,
        }
    }
}

impl TelemetryConfig<'_> {
    /// `{account}/feeds/{feed}`
    pub fn topic(&self) -> Result<String<TOPIC_CAPACITY>, ConfigError> {
        let mut topic = String::new();
        write!(topic, "{}/feeds/{}", self.account, self.feed)
            .map_err(|_| ConfigError::TopicTooLong)?;
        Ok(topic)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs as u64)
    }

    pub fn display_pacing(&self) -> Duration {
        Duration::from_millis(self.display_pacing_ms as u64)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Config<'a> {
    #[serde(borrow)]
    pub broker: BrokerConfig<'a>,
    #[serde(borrow)]
    pub telemetry: TelemetryConfig<'a>,
}

impl<'a> Config<'a> {
    /// Decodes a JSON document; string values are borrowed from `json`.
    pub fn from_json(json: &'a [u8]) -> Result<Self, ConfigError> {
        serde_json_core::from_slice(json)
            .map(|(config, _)| config)
            .map_err(|_| ConfigError::Parse)
    }
}
