//! Host-side stand-ins for the hardware and network edges of the pipeline.
//!
//! Fakes that outlive a single pipeline (publisher, LED pin, reset) keep their
//! observable state behind a shared reference, so a test can rebuild the
//! pipeline from scratch and still inspect what happened across rebuilds.

use crate::domain::PhysicalReading;
use crate::domain::Quantity;
use crate::traits::display::{StatusSink, TextDisplay};
use crate::traits::publisher::{QoS, TelemetryPublisher};
use crate::traits::sensors::TelemetrySensor;
use crate::traits::system::Reset;
use core::cell::{Cell, RefCell};
use core::convert::Infallible;
use core::fmt::Display;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::signal::Signal;
use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource, Operation};
use embedded_hal_async::delay::DelayNs;
use std::collections::VecDeque;
use std::string::{String, ToString};
use std::vec::Vec;

pub type TestSignal = Signal<NoopRawMutex, ()>;

/// One bus operation as seen by [`FakeI2c`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transfer {
    Write(Vec<u8>),
    Read { register: u8, len: usize },
}

/// A register-file peripheral answering on one 7-bit address.
///
/// A write sets the register pointer from its first byte and stores any
/// following bytes; a read returns bytes starting at the pointer. Both
/// auto-increment like the real part.
pub struct FakeI2c {
    address: u8,
    registers: [u8; 128],
    pointer: u8,
    failing: bool,
    transfers: Vec<Transfer>,
}

impl FakeI2c {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            registers: [0; 128],
            pointer: 0,
            failing: false,
            transfers: Vec::new(),
        }
    }

    pub fn with_register(mut self, register: u8, value: u8) -> Self {
        self.set_register(register, value);
        self
    }

    /// Stores a signed sample big-endian at `high` and `high + 1`.
    pub fn with_sample(mut self, high: u8, counts: i16) -> Self {
        self.set_sample(high, counts);
        self
    }

    pub fn set_register(&mut self, register: u8, value: u8) {
        self.registers[register as usize & 0x7F] = value;
    }

    pub fn set_sample(&mut self, high: u8, counts: i16) {
        let [h, l] = counts.to_be_bytes();
        self.set_register(high, h);
        self.set_register(high.wrapping_add(1), l);
    }

    pub fn register(&self, register: u8) -> u8 {
        self.registers[register as usize & 0x7F]
    }

    /// Makes every following transaction fail with a bus error.
    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    pub fn clear_transfers(&mut self) {
        self.transfers.clear();
    }

    fn next(&mut self) -> usize {
        let index = self.pointer as usize & 0x7F;
        self.pointer = self.pointer.wrapping_add(1);
        index
    }
}

impl embedded_hal::i2c::ErrorType for FakeI2c {
    type Error = ErrorKind;
}

impl embedded_hal_async::i2c::I2c for FakeI2c {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if self.failing {
            return Err(ErrorKind::Bus);
        }
        if address != self.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for operation in operations.iter_mut() {
            match operation {
                Operation::Write(bytes) => {
                    self.transfers.push(Transfer::Write(bytes.to_vec()));
                    if let Some((register, values)) = bytes.split_first() {
                        self.pointer = *register;
                        for value in values {
                            let index = self.next();
                            self.registers[index] = *value;
                        }
                    }
                }
                Operation::Read(buf) => {
                    self.transfers.push(Transfer::Read {
                        register: self.pointer,
                        len: buf.len(),
                    });
                    for byte in buf.iter_mut() {
                        let index = self.next();
                        *byte = self.registers[index];
                    }
                }
            }
        }
        Ok(())
    }
}

/// Records every committed frame of a [`TextDisplay`].
#[derive(Default)]
pub struct RecordingDisplay {
    pending: Vec<(String, u8, u8)>,
    frames: Vec<Vec<(String, u8, u8)>>,
    failing: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DisplayFault;

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn frames(&self) -> &[Vec<(String, u8, u8)>] {
        &self.frames
    }

    /// Rows of the last committed frame, top to bottom.
    pub fn last_rows(&self) -> Vec<&str> {
        self.frames
            .last()
            .map(|frame| frame.iter().map(|(text, _, _)| text.as_str()).collect())
            .unwrap_or_default()
    }
}

impl TextDisplay for RecordingDisplay {
    type Error = DisplayFault;

    async fn clear(&mut self) -> Result<(), Self::Error> {
        self.pending.clear();
        Ok(())
    }

    async fn text(&mut self, text: &str, x: u8, y: u8) -> Result<(), Self::Error> {
        if self.failing {
            return Err(DisplayFault);
        }
        self.pending.push((text.to_string(), x, y));
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        self.frames.push(core::mem::take(&mut self.pending));
        Ok(())
    }
}

/// A [`StatusSink`] appending every rendered status to a shared log.
pub struct StatusLog<'a> {
    lines: &'a RefCell<Vec<String>>,
}

impl<'a> StatusLog<'a> {
    pub fn new(lines: &'a RefCell<Vec<String>>) -> Self {
        Self { lines }
    }
}

impl StatusSink for StatusLog<'_> {
    type Error = Infallible;

    async fn show<V: Display>(&mut self, status: V) -> Result<(), Self::Error> {
        self.lines.borrow_mut().push(status.to_string());
        Ok(())
    }
}

/// Serves a fixed script of samples, then absence.
pub struct FakeSensor {
    script: VecDeque<Option<PhysicalReading>>,
    repeat: Option<PhysicalReading>,
    requested: Vec<Quantity>,
}

impl FakeSensor {
    /// Returns `reading` on every sample.
    pub fn constant(reading: PhysicalReading) -> Self {
        Self {
            script: VecDeque::new(),
            repeat: Some(reading),
            requested: Vec::new(),
        }
    }

    pub fn scripted<I: IntoIterator<Item = Option<PhysicalReading>>>(script: I) -> Self {
        Self {
            script: script.into_iter().collect(),
            repeat: None,
            requested: Vec::new(),
        }
    }

    pub fn requested(&self) -> &[Quantity] {
        &self.requested
    }
}

impl TelemetrySensor for FakeSensor {
    async fn sample(&mut self, quantity: Quantity) -> Option<PhysicalReading> {
        self.requested.push(quantity);
        match self.script.pop_front() {
            Some(sample) => sample,
            None => self.repeat,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BrokerFault {
    Refused,
    NotAcknowledged,
}

/// Broker-side record shared by every [`FakePublisher`] built from it.
#[derive(Default)]
pub struct BrokerLog {
    connects: Cell<u32>,
    closes: Cell<u32>,
    publish_attempts: Cell<u32>,
    refuse_connect: Cell<bool>,
    fail_publish_at: Cell<Option<u32>>,
    subscriptions: RefCell<Vec<(String, QoS)>>,
    messages: RefCell<Vec<(String, String, QoS)>>,
}

impl BrokerLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refuse_connect(&self, refuse: bool) {
        self.refuse_connect.set(refuse);
    }

    /// Fails the `n`th publish attempt, counted from 1 across all publishers.
    pub fn fail_publish_at(&self, n: u32) {
        self.fail_publish_at.set(Some(n));
    }

    pub fn connects(&self) -> u32 {
        self.connects.get()
    }

    pub fn closes(&self) -> u32 {
        self.closes.get()
    }

    pub fn publish_attempts(&self) -> u32 {
        self.publish_attempts.get()
    }

    pub fn subscriptions(&self) -> Vec<(String, QoS)> {
        self.subscriptions.borrow().clone()
    }

    /// Accepted messages as `(topic, payload, qos)`.
    pub fn messages(&self) -> Vec<(String, String, QoS)> {
        self.messages.borrow().clone()
    }

    pub fn payloads(&self) -> Vec<String> {
        self.messages
            .borrow()
            .iter()
            .map(|(_, payload, _)| payload.clone())
            .collect()
    }
}

pub struct FakePublisher<'a> {
    broker: &'a BrokerLog,
    connected: bool,
}

impl<'a> FakePublisher<'a> {
    pub fn new(broker: &'a BrokerLog) -> Self {
        Self {
            broker,
            connected: false,
        }
    }
}

impl TelemetryPublisher for FakePublisher<'_> {
    type Error = BrokerFault;

    async fn connect(&mut self) -> Result<(), Self::Error> {
        self.broker.connects.set(self.broker.connects.get() + 1);
        if self.broker.refuse_connect.get() {
            return Err(BrokerFault::Refused);
        }
        self.connected = true;
        Ok(())
    }

    async fn subscribe(&mut self, topic: &str, qos: QoS) -> Result<(), Self::Error> {
        if !self.connected {
            return Err(BrokerFault::NotAcknowledged);
        }
        self.broker
            .subscriptions
            .borrow_mut()
            .push((topic.to_string(), qos));
        Ok(())
    }

    async fn publish(&mut self, topic: &str, payload: &[u8], qos: QoS) -> Result<(), Self::Error> {
        let attempt = self.broker.publish_attempts.get() + 1;
        self.broker.publish_attempts.set(attempt);
        if !self.connected || self.broker.fail_publish_at.get() == Some(attempt) {
            return Err(BrokerFault::NotAcknowledged);
        }
        self.broker.messages.borrow_mut().push((
            topic.to_string(),
            String::from_utf8_lossy(payload).into_owned(),
            qos,
        ));
        Ok(())
    }

    async fn close(&mut self) {
        self.broker.closes.set(self.broker.closes.get() + 1);
        self.connected = false;
    }
}

/// Output pin whose level is visible through a shared cell.
pub struct TestPin<'a> {
    level: &'a Cell<bool>,
}

impl<'a> TestPin<'a> {
    pub fn new(level: &'a Cell<bool>) -> Self {
        Self { level }
    }
}

impl embedded_hal::digital::ErrorType for TestPin<'_> {
    type Error = Infallible;
}

impl embedded_hal::digital::OutputPin for TestPin<'_> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.level.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.level.set(true);
        Ok(())
    }
}

/// A delay that completes immediately and counts how often it was used.
///
/// Optionally raises a shutdown signal once a number of sleeps has elapsed,
/// standing in for an operator abort.
pub struct InstantDelay<'a> {
    sleeps: u32,
    slept_ms: u64,
    interrupt: Option<(u32, &'a TestSignal)>,
}

impl<'a> InstantDelay<'a> {
    pub fn new() -> Self {
        Self {
            sleeps: 0,
            slept_ms: 0,
            interrupt: None,
        }
    }

    /// Signals `shutdown` during the `after`th sleep.
    pub fn interrupting(after: u32, shutdown: &'a TestSignal) -> Self {
        Self {
            interrupt: Some((after, shutdown)),
            ..Self::new()
        }
    }

    pub fn sleeps(&self) -> u32 {
        self.sleeps
    }

    pub fn slept_ms(&self) -> u64 {
        self.slept_ms
    }

    fn sleep(&mut self, ms: u64) {
        self.sleeps += 1;
        self.slept_ms += ms;
        if let Some((after, shutdown)) = self.interrupt {
            if self.sleeps >= after {
                shutdown.signal(());
            }
        }
    }
}

impl Default for InstantDelay<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayNs for InstantDelay<'_> {
    async fn delay_ns(&mut self, ns: u32) {
        self.sleep(ns as u64 / 1_000_000);
    }

    async fn delay_us(&mut self, us: u32) {
        self.sleep(us as u64 / 1_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.sleep(ms as u64);
    }
}

/// What happened at each reset, shared across pipeline rebuilds.
#[derive(Default)]
pub struct ResetLog {
    resets: Cell<u32>,
    closes_at_reset: RefCell<Vec<u32>>,
}

impl ResetLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resets(&self) -> u32 {
        self.resets.get()
    }

    /// `BrokerLog::closes` as seen by each reset, when a broker is watched.
    pub fn closes_at_reset(&self) -> Vec<u32> {
        self.closes_at_reset.borrow().clone()
    }
}

/// Records resets and optionally raises a shutdown signal on each one.
pub struct CountingReset<'a> {
    log: &'a ResetLog,
    broker: Option<&'a BrokerLog>,
    interrupt: Option<&'a TestSignal>,
}

impl<'a> CountingReset<'a> {
    pub fn new(log: &'a ResetLog) -> Self {
        Self {
            log,
            broker: None,
            interrupt: None,
        }
    }

    /// Samples the broker's close count whenever a reset happens.
    pub fn watching(self, broker: &'a BrokerLog) -> Self {
        Self {
            broker: Some(broker),
            ..self
        }
    }

    pub fn interrupting(self, shutdown: &'a TestSignal) -> Self {
        Self {
            interrupt: Some(shutdown),
            ..self
        }
    }
}

impl Reset for CountingReset<'_> {
    fn reset(&mut self) {
        self.log.resets.set(self.log.resets.get() + 1);
        if let Some(broker) = self.broker {
            self.log.closes_at_reset.borrow_mut().push(broker.closes());
        }
        if let Some(shutdown) = self.interrupt {
            shutdown.signal(());
        }
    }
}

/// Both directions of a scripted broker connection.
///
/// Reads drain the bytes queued with [`Wire::respond`] and report end of
/// stream once empty. Every successful write is kept as one packet.
#[cfg(feature = "mqtt")]
#[derive(Default)]
pub struct Wire {
    inbound: RefCell<VecDeque<u8>>,
    written: RefCell<Vec<Vec<u8>>>,
    failing_writes: Cell<u32>,
    refused_writes: Cell<u32>,
}

#[cfg(feature = "mqtt")]
impl Wire {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, bytes: &[u8]) {
        self.inbound.borrow_mut().extend(bytes.iter().copied());
    }

    /// Makes the next `n` writes fail with a connection reset.
    pub fn fail_writes(&self, n: u32) {
        self.failing_writes.set(n);
    }

    pub fn written(&self) -> Vec<Vec<u8>> {
        self.written.borrow().clone()
    }

    pub fn refused_writes(&self) -> u32 {
        self.refused_writes.get()
    }

    /// Control packet type of every packet written so far.
    pub fn packet_types(&self) -> Vec<u8> {
        self.written
            .borrow()
            .iter()
            .filter_map(|p| p.first().map(|b| b >> 4))
            .collect()
    }
}

#[cfg(feature = "mqtt")]
pub struct ScriptedTransport<'a> {
    wire: &'a Wire,
}

#[cfg(feature = "mqtt")]
impl<'a> ScriptedTransport<'a> {
    pub fn new(wire: &'a Wire) -> Self {
        Self { wire }
    }
}

#[cfg(feature = "mqtt")]
impl embedded_io_async::ErrorType for ScriptedTransport<'_> {
    type Error = embedded_io_async::ErrorKind;
}

#[cfg(feature = "mqtt")]
impl embedded_io_async::Read for ScriptedTransport<'_> {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut inbound = self.wire.inbound.borrow_mut();
        let n = buf.len().min(inbound.len());
        for (slot, byte) in buf.iter_mut().zip(inbound.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

#[cfg(feature = "mqtt")]
impl embedded_io_async::Write for ScriptedTransport<'_> {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        let failing = self.wire.failing_writes.get();
        if failing > 0 {
            self.wire.failing_writes.set(failing - 1);
            self.wire.refused_writes.set(self.wire.refused_writes.get() + 1);
            return Err(embedded_io_async::ErrorKind::ConnectionReset);
        }
        self.wire.written.borrow_mut().push(buf.to_vec());
        Ok(buf.len())
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
