#![cfg_attr(not(any(test, feature = "std")), no_std)]
//! Inertial sensor telemetry for small async devices.
//!
//! The crate reads an MPU-6050 over I2C, scales its raw register counts into
//! physical units, shows the current value on a small text display and
//! republishes it to an MQTT feed on a fixed interval.
//!
//! The pieces are wired together by a [`Supervisor`], which owns one complete
//! pipeline and hands back a [`Report`] when that pipeline faults or is
//! interrupted. [`supervise`] turns faults into a system reset followed by a
//! fresh pipeline.
//!
//! All hardware and network edges are traits in [`traits`], so the same
//! supervisor runs against real peripherals or the fakes in `testutil`.

pub(crate) mod fmt;

pub mod clients;
pub mod config;
pub mod domain;
pub mod drivers;
pub mod supervisor;
pub mod time;
pub mod traits;

#[cfg(feature = "std")]
pub mod testutil;

pub use config::{BrokerConfig, Config, ConfigError, TelemetryConfig};
pub use domain::{PhysicalReading, Quantity};
pub use supervisor::{supervise, Exit, Fault, Report, State, Supervisor};
