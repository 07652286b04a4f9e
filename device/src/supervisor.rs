//! The outer telemetry loop and its fault-recovery policy.
//!
//! A [`Supervisor`] owns one complete pipeline: publisher session, sensor,
//! status output and link LED. It walks
//! `Disconnected -> Connected -> Publishing` and leaves through exactly one of
//! `Faulted` or `Interrupted`, closing the publisher once on the way out.
//!
//! Faults are never repaired in place. Any publisher failure ends the run,
//! and [`supervise`] answers it with a reset and a freshly built pipeline.
//! Sensor and display failures do not count as faults; they only skip work
//! within a cycle.

use crate::config::TelemetryConfig;
use crate::domain::PhysicalReading;
use crate::fmt::Dbg;
use crate::time::sleep;
use crate::traits::display::StatusSink;
use crate::traits::led::Led;
use crate::traits::publisher::{QoS, TelemetryPublisher};
use crate::traits::sensors::TelemetrySensor;
use crate::traits::system::Reset;
use core::fmt::Display;
use core::future::Future;
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use embedded_hal_async::delay::DelayNs;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    Disconnected,
    Connected,
    Publishing,
    Faulted,
    Interrupted,
}

/// Why a run ended in [`State::Faulted`].
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fault<E> {
    /// The configured topic does not fit the topic buffer.
    Topic,
    Connect(E),
    Subscribe(E),
    Publish(E),
}

#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Exit<E> {
    Faulted(Fault<E>),
    Interrupted,
}

impl<E> Exit<E> {
    pub fn is_faulted(&self) -> bool {
        matches!(self, Exit::Faulted(_))
    }
}

/// Outcome of one [`Supervisor::run`].
#[derive(Debug)]
pub struct Report<E> {
    pub exit: Exit<E>,
    pub state: State,
    /// Messages handed to the publisher during the run.
    pub published: u32,
}

pub struct Supervisor<'a, P, S, St, L, D, M>
where
    P: TelemetryPublisher,
    S: TelemetrySensor,
    St: StatusSink,
    L: Led,
    D: DelayNs,
    M: RawMutex,
{
    config: &'a TelemetryConfig<'a>,
    publisher: P,
    sensor: S,
    status: St,
    link_led: L,
    delay: D,
    shutdown: &'a Signal<M, ()>,
    state: State,
    published: u32,
}

impl<'a, P, S, St, L, D, M> Supervisor<'a, P, S, St, L, D, M>
where
    P: TelemetryPublisher,
    S: TelemetrySensor,
    St: StatusSink,
    L: Led,
    D: DelayNs,
    M: RawMutex,
{
    pub fn new(
        config: &'a TelemetryConfig<'a>,
        publisher: P,
        sensor: S,
        status: St,
        link_led: L,
        delay: D,
        shutdown: &'a Signal<M, ()>,
    ) -> Self {
        Self {
            config,
            publisher,
            sensor,
            status,
            link_led,
            delay,
            shutdown,
            state: State::Disconnected,
            published: 0,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn published(&self) -> u32 {
        self.published
    }

    /// Drives the pipeline until a fault or an operator abort.
    ///
    /// The publisher is closed exactly once before this returns, whichever
    /// way the run ended.
    pub async fn run(mut self) -> Report<P::Error> {
        let exit = match self.session().await {
            Ok(()) => Exit::Interrupted,
            Err(fault) => Exit::Faulted(fault),
        };

        match &exit {
            Exit::Faulted(fault) => {
                error!("telemetry fault: {:?}", Dbg(fault));
                self.transition(State::Faulted);
            }
            Exit::Interrupted => {
                info!("telemetry interrupted by operator");
                self.transition(State::Interrupted);
            }
        }

        self.publisher.close().await;
        self.link(false);

        Report {
            exit,
            state: self.state,
            published: self.published,
        }
    }

    /// Returns `Ok` only when interrupted.
    async fn session(&mut self) -> Result<(), Fault<P::Error>> {
        let topic = self.config.topic().map_err(|_| Fault::Topic)?;
        if self.interrupted() {
            return Ok(());
        }

        self.link(false);
        info!("connecting");
        self.publisher.connect().await.map_err(Fault::Connect)?;
        self.transition(State::Connected);
        self.link(true);

        self.publisher
            .subscribe(&topic, QoS::AtLeastOnce)
            .await
            .map_err(Fault::Subscribe)?;
        self.transition(State::Publishing);

        let interval = self.config.interval();
        loop {
            if self.interrupted() {
                return Ok(());
            }

            self.cycle(&topic).await?;

            let shutdown = self.shutdown;
            let pause = sleep(&mut self.delay, interval);
            if let Either::Second(()) = select(pause, shutdown.wait()).await {
                return Ok(());
            }
        }
    }

    /// One sample: read, display, publish when present.
    async fn cycle(&mut self, topic: &str) -> Result<(), Fault<P::Error>> {
        self.display("publish").await;

        let Some(reading) = self.sensor.sample(self.config.quantity).await else {
            warn!("no reading, skipping cycle");
            self.display("no data").await;
            return Ok(());
        };
        self.display(reading).await;

        self.publish(topic, &reading).await
    }

    async fn publish(&mut self, topic: &str, reading: &PhysicalReading) -> Result<(), Fault<P::Error>> {
        let Some(payload) = reading.payload() else {
            warn!("reading {:?} does not fit a payload, skipping cycle", reading);
            return Ok(());
        };

        info!("publish {}", self.published);
        self.publisher
            .publish(topic, payload.as_bytes(), QoS::AtLeastOnce)
            .await
            .map_err(Fault::Publish)?;
        self.published += 1;
        Ok(())
    }

    async fn display<V: Display>(&mut self, status: V) {
        if let Err(e) = self.status.show(status).await {
            debug!("status display failed: {:?}", Dbg(&e));
        }
    }

    fn link(&mut self, up: bool) {
        let result = if up {
            self.link_led.on()
        } else {
            self.link_led.off()
        };
        if let Err(e) = result {
            debug!("link LED failed: {:?}", Dbg(&e));
        }
    }

    fn interrupted(&self) -> bool {
        self.shutdown.signaled()
    }

    fn transition(&mut self, next: State) {
        info!("{:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

/// Runs pipelines built by `build` until one is interrupted.
///
/// Every faulted run is followed by `reset`. On hardware that call does not
/// return; elsewhere the next pipeline is built from scratch, never patched
/// up from the previous one.
pub async fn supervise<'a, P, S, St, L, D, M, B, F, R>(
    mut build: B,
    mut reset: R,
) -> Report<P::Error>
where
    P: TelemetryPublisher,
    S: TelemetrySensor,
    St: StatusSink,
    L: Led,
    D: DelayNs,
    M: RawMutex + 'a,
    B: FnMut() -> F,
    F: Future<Output = Supervisor<'a, P, S, St, L, D, M>>,
    R: Reset,
{
    loop {
        let report = build().await.run().await;
        if !report.exit.is_faulted() {
            return report;
        }
        warn!("resetting after {} published messages", report.published);
        reset.reset();
    }
}
