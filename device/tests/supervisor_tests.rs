use core::cell::{Cell, RefCell};
use futures::executor::block_on;
use imu_telemetry::config::TelemetryConfig;
use imu_telemetry::domain::motion::Axes;
use imu_telemetry::domain::{PhysicalReading, Quantity};
use imu_telemetry::drivers::led::GpioLed;
use imu_telemetry::supervisor::{supervise, Exit, Fault, State, Supervisor};
use imu_telemetry::testutil::{
    BrokerFault, BrokerLog, CountingReset, FakePublisher, FakeSensor, InstantDelay, ResetLog,
    StatusLog, TestPin, TestSignal,
};
use imu_telemetry::traits::publisher::QoS;

fn config() -> TelemetryConfig<'static> {
    TelemetryConfig {
        account: "jdoe",
        feed: "sensors.temperature",
        ..Default::default()
    }
}

#[test]
fn publishes_once_per_cycle_until_interrupted() {
    let config = config();
    let broker = BrokerLog::new();
    let lines = RefCell::new(Vec::new());
    let led = Cell::new(false);
    let shutdown = TestSignal::new();

    let supervisor = Supervisor::new(
        &config,
        FakePublisher::new(&broker),
        FakeSensor::constant(PhysicalReading::Temperature(72)),
        StatusLog::new(&lines),
        GpioLed::new(TestPin::new(&led)),
        InstantDelay::interrupting(5, &shutdown),
        &shutdown,
    );
    let report = block_on(supervisor.run());

    assert!(matches!(report.exit, Exit::Interrupted));
    assert_eq!(State::Interrupted, report.state);
    assert_eq!(5, report.published);
    assert_eq!(1, broker.connects());
    assert_eq!(1, broker.closes());
    assert_eq!(
        vec![("jdoe/feeds/sensors.temperature".to_string(), QoS::AtLeastOnce)],
        broker.subscriptions()
    );
    assert_eq!(vec!["72"; 5], broker.payloads());
    assert!(broker
        .messages()
        .iter()
        .all(|(topic, _, qos)| topic == "jdoe/feeds/sensors.temperature" && *qos == QoS::AtLeastOnce));
    assert_eq!(
        ["publish", "72"].repeat(5),
        *lines.borrow()
    );
    assert!(!led.get());
}

#[test]
fn absent_samples_skip_publishing_and_keep_going() {
    let config = config();
    let broker = BrokerLog::new();
    let lines = RefCell::new(Vec::new());
    let led = Cell::new(false);
    let shutdown = TestSignal::new();

    let supervisor = Supervisor::new(
        &config,
        FakePublisher::new(&broker),
        FakeSensor::scripted([
            Some(PhysicalReading::Temperature(70)),
            None,
            Some(PhysicalReading::Temperature(71)),
        ]),
        StatusLog::new(&lines),
        GpioLed::new(TestPin::new(&led)),
        InstantDelay::interrupting(3, &shutdown),
        &shutdown,
    );
    let report = block_on(supervisor.run());

    assert!(matches!(report.exit, Exit::Interrupted));
    assert_eq!(2, report.published);
    assert_eq!(2, broker.publish_attempts());
    assert_eq!(vec!["70", "71"], broker.payloads());
    assert_eq!(
        vec!["publish", "70", "publish", "no data", "publish", "71"],
        *lines.borrow()
    );
}

#[test]
fn publish_fault_stops_the_run_and_closes_once() {
    let config = config();
    let broker = BrokerLog::new();
    broker.fail_publish_at(3);
    let lines = RefCell::new(Vec::new());
    let led = Cell::new(false);
    let shutdown = TestSignal::new();

    let supervisor = Supervisor::new(
        &config,
        FakePublisher::new(&broker),
        FakeSensor::constant(PhysicalReading::Temperature(72)),
        StatusLog::new(&lines),
        GpioLed::new(TestPin::new(&led)),
        InstantDelay::new(),
        &shutdown,
    );
    let report = block_on(supervisor.run());

    assert!(matches!(
        report.exit,
        Exit::Faulted(Fault::Publish(BrokerFault::NotAcknowledged))
    ));
    assert_eq!(State::Faulted, report.state);
    assert_eq!(2, report.published);
    assert_eq!(3, broker.publish_attempts());
    assert_eq!(1, broker.closes());
    assert!(!led.get());
}

#[test]
fn refused_connection_is_a_fault() {
    let config = config();
    let broker = BrokerLog::new();
    broker.refuse_connect(true);
    let lines = RefCell::new(Vec::new());
    let led = Cell::new(false);
    let shutdown = TestSignal::new();

    let supervisor = Supervisor::new(
        &config,
        FakePublisher::new(&broker),
        FakeSensor::constant(PhysicalReading::Temperature(72)),
        StatusLog::new(&lines),
        GpioLed::new(TestPin::new(&led)),
        InstantDelay::new(),
        &shutdown,
    );
    let report = block_on(supervisor.run());

    assert!(matches!(report.exit, Exit::Faulted(Fault::Connect(BrokerFault::Refused))));
    assert_eq!(0, report.published);
    assert_eq!(1, broker.closes());
    assert!(broker.subscriptions().is_empty());
    assert!(lines.borrow().is_empty());
}

#[test]
fn oversized_topic_is_a_fault_before_connecting() {
    let account = "a".repeat(100);
    let config = TelemetryConfig {
        account: &account,
        ..config()
    };
    let broker = BrokerLog::new();
    let lines = RefCell::new(Vec::new());
    let led = Cell::new(false);
    let shutdown = TestSignal::new();

    let supervisor = Supervisor::new(
        &config,
        FakePublisher::new(&broker),
        FakeSensor::constant(PhysicalReading::Temperature(72)),
        StatusLog::new(&lines),
        GpioLed::new(TestPin::new(&led)),
        InstantDelay::new(),
        &shutdown,
    );
    let report = block_on(supervisor.run());

    assert!(matches!(report.exit, Exit::Faulted(Fault::Topic)));
    assert_eq!(0, broker.connects());
    assert_eq!(1, broker.closes());
}

#[test]
fn abort_before_connect_still_closes() {
    let config = config();
    let broker = BrokerLog::new();
    let lines = RefCell::new(Vec::new());
    let led = Cell::new(false);
    let shutdown = TestSignal::new();
    shutdown.signal(());

    let supervisor = Supervisor::new(
        &config,
        FakePublisher::new(&broker),
        FakeSensor::constant(PhysicalReading::Temperature(72)),
        StatusLog::new(&lines),
        GpioLed::new(TestPin::new(&led)),
        InstantDelay::new(),
        &shutdown,
    );
    let report = block_on(supervisor.run());

    assert!(matches!(report.exit, Exit::Interrupted));
    assert_eq!(0, broker.connects());
    assert_eq!(1, broker.closes());
}

#[test]
fn link_led_follows_the_session() {
    let config = config();
    let broker = BrokerLog::new();
    let lines = RefCell::new(Vec::new());
    let led = Cell::new(false);
    let shutdown = TestSignal::new();

    struct WatchLed<'a> {
        led: &'a Cell<bool>,
        seen_on: bool,
    }

    impl imu_telemetry::traits::sensors::TelemetrySensor for WatchLed<'_> {
        async fn sample(&mut self, _: Quantity) -> Option<PhysicalReading> {
            self.seen_on |= self.led.get();
            None
        }
    }

    let mut watcher = WatchLed {
        led: &led,
        seen_on: false,
    };
    let supervisor = Supervisor::new(
        &config,
        FakePublisher::new(&broker),
        &mut watcher,
        StatusLog::new(&lines),
        GpioLed::new(TestPin::new(&led)),
        InstantDelay::interrupting(1, &shutdown),
        &shutdown,
    );
    block_on(supervisor.run());

    assert!(watcher.seen_on);
    assert!(!led.get());
}

#[test]
fn configured_quantity_is_sampled_and_sent_as_json() {
    let config = TelemetryConfig {
        feed: "sensors.accel",
        quantity: Quantity::Acceleration,
        ..config()
    };
    let broker = BrokerLog::new();
    let lines = RefCell::new(Vec::new());
    let led = Cell::new(false);
    let shutdown = TestSignal::new();

    let mut sensor = FakeSensor::constant(PhysicalReading::Acceleration(Axes::new(0.5, -1.0, 0.25)));
    let supervisor = Supervisor::new(
        &config,
        FakePublisher::new(&broker),
        &mut sensor,
        StatusLog::new(&lines),
        GpioLed::new(TestPin::new(&led)),
        InstantDelay::interrupting(1, &shutdown),
        &shutdown,
    );
    block_on(supervisor.run());

    assert_eq!(&[Quantity::Acceleration], sensor.requested());
    assert_eq!(vec![r#"{"x":0.5,"y":-1.0,"z":0.25}"#], broker.payloads());
}

#[test]
fn fault_is_followed_by_reset_and_a_fresh_pipeline() {
    let config = config();
    let broker = BrokerLog::new();
    broker.fail_publish_at(3);
    let lines = RefCell::new(Vec::new());
    let led = Cell::new(false);
    let shutdown = TestSignal::new();
    let resets = ResetLog::new();
    let builds = Cell::new(0);

    let report = block_on(supervise(
        || {
            builds.set(builds.get() + 1);
            let supervisor = Supervisor::new(
                &config,
                FakePublisher::new(&broker),
                FakeSensor::constant(PhysicalReading::Temperature(72)),
                StatusLog::new(&lines),
                GpioLed::new(TestPin::new(&led)),
                InstantDelay::interrupting(3, &shutdown),
                &shutdown,
            );
            async move { supervisor }
        },
        CountingReset::new(&resets).watching(&broker),
    ));

    // First pipeline: two publishes, the third fails. Second pipeline: three
    // more publishes before the operator aborts.
    assert!(matches!(report.exit, Exit::Interrupted));
    assert_eq!(3, report.published);
    assert_eq!(1, resets.resets());
    assert_eq!(vec![1], resets.closes_at_reset());
    assert_eq!(2, builds.get());
    assert_eq!(2, broker.connects());
    assert_eq!(2, broker.closes());
    assert_eq!(6, broker.publish_attempts());
    assert_eq!(5, broker.payloads().len());
}

#[test]
fn no_cycle_runs_between_fault_and_reset() {
    let config = config();
    let broker = BrokerLog::new();
    broker.fail_publish_at(3);
    let lines = RefCell::new(Vec::new());
    let led = Cell::new(false);
    let shutdown = TestSignal::new();
    let resets = ResetLog::new();

    let report = block_on(supervise(
        || {
            let supervisor = Supervisor::new(
                &config,
                FakePublisher::new(&broker),
                FakeSensor::constant(PhysicalReading::Temperature(72)),
                StatusLog::new(&lines),
                GpioLed::new(TestPin::new(&led)),
                InstantDelay::new(),
                &shutdown,
            );
            async move { supervisor }
        },
        CountingReset::new(&resets)
            .watching(&broker)
            .interrupting(&shutdown),
    ));

    assert!(matches!(report.exit, Exit::Interrupted));
    assert_eq!(1, resets.resets());
    // the faulted session was closed before the reset, and only once
    assert_eq!(vec![1], resets.closes_at_reset());
    assert_eq!(3, broker.publish_attempts());
    assert_eq!(1, broker.connects());
    assert_eq!(2, broker.closes());
}

#[test]
fn long_interval_is_slept_in_full() {
    let config = TelemetryConfig {
        interval_secs: 4_294_968,
        ..config()
    };
    let broker = BrokerLog::new();
    let lines = RefCell::new(Vec::new());
    let led = Cell::new(false);
    let shutdown = TestSignal::new();
    let mut delay = InstantDelay::interrupting(1, &shutdown);

    let supervisor = Supervisor::new(
        &config,
        FakePublisher::new(&broker),
        FakeSensor::constant(PhysicalReading::Temperature(72)),
        StatusLog::new(&lines),
        GpioLed::new(TestPin::new(&led)),
        &mut delay,
        &shutdown,
    );
    let report = block_on(supervisor.run());

    assert!(matches!(report.exit, Exit::Interrupted));
    assert_eq!(1, report.published);
    assert_eq!(config.interval().as_millis(), delay.slept_ms());
}
