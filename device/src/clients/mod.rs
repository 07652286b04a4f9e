#[cfg(feature = "mqtt")]
pub mod mqtt;
