//! Integration tests for the sample → evaluate → actuate → publish tick.
//!
//! The control loop is driven synchronously via `tick()` against mock
//! sensors, a mock transport session, and a recording status sink, which
//! makes the failure-containment rules directly observable.

use crate::mock_hw::{MockSensors, MockSession, RecordingSink};

use flamex::actuator::ActuatorControl;
use flamex::config::NodeConfig;
use flamex::control::ControlLoop;
use flamex::error::{ConnectError, PublishError, SensorReadError};
use flamex::telemetry;
use flamex::transport::{Delivery, SessionState, TransportSession};

struct Harness {
    alarm: ActuatorControl,
    pump: ActuatorControl,
}

impl Harness {
    fn new() -> Self {
        Self {
            alarm: ActuatorControl::new(),
            pump: ActuatorControl::new(),
        }
    }

    fn control_loop<'a>(
        &'a self,
        sensors: MockSensors,
        session: MockSession,
        display: RecordingSink,
    ) -> ControlLoop<'a, MockSensors, MockSession, RecordingSink> {
        ControlLoop::new(
            sensors,
            session,
            display,
            &self.alarm,
            &self.pump,
            NodeConfig::default(),
            Delivery::ExactlyOnce,
        )
    }
}

// ── Happy path ────────────────────────────────────────────────

#[test]
fn fire_tick_drives_actuators_and_publishes() {
    let hw = Harness::new();
    let mut sensors = MockSensors::new();
    // 3000/4095 → 73.26% flame (above 70), 1000/4095 → 24.4% gas (below 40).
    sensors.push_raw(3000, 1000);
    let (sink, lines) = RecordingSink::new();
    let mut ctl = hw.control_loop(sensors, MockSession::new(), sink);

    ctl.tick();

    assert!(hw.alarm.desired(), "fire must request the alarm");
    assert!(hw.pump.desired(), "fire must request the pump");

    assert_eq!(ctl.session().state(), SessionState::Joined);
    let published = &ctl.session().published;
    assert_eq!(published.len(), 1);
    let (topic, payload, delivery) = &published[0];
    assert_eq!(topic, "flamex");
    assert_eq!(*delivery, Delivery::ExactlyOnce);

    let record = telemetry::decode(payload).expect("payload must decode");
    assert_eq!(record.node_id, 1);
    assert_eq!(record.flame_flag, 73);
    assert_eq!(record.gas_pct, 24);
    assert!(record.pump_active);
    assert!(payload.contains("\"voltage\": \"73.26\""));
    assert!(payload.contains("\"pump\": \"ACTIVE\""));

    let lines = lines.borrow();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("FIRE"), "status must flag fire: {}", lines[0]);
}

#[test]
fn quiet_reading_clears_desire_without_new_wake() {
    let hw = Harness::new();
    let mut sensors = MockSensors::new();
    sensors.push_raw(3000, 2000); // fire and gas
    sensors.push_raw(100, 100); // all clear
    let (sink, _lines) = RecordingSink::new();
    let mut ctl = hw.control_loop(sensors, MockSession::new(), sink);

    ctl.tick();
    assert!(hw.alarm.desired());
    assert!(hw.pump.desired());

    ctl.tick();
    assert!(!hw.alarm.desired());
    assert!(!hw.pump.desired());

    let published = &ctl.session().published;
    assert_eq!(published.len(), 2);
    assert!(published[1].1.contains("\"pump\": \"NON_ACTIVE\""));
}

#[test]
fn gas_alone_sounds_alarm_but_not_pump() {
    let hw = Harness::new();
    let mut sensors = MockSensors::new();
    sensors.push_raw(100, 3000); // gas 73% > 40, flame 2.4% < 70
    let (sink, _lines) = RecordingSink::new();
    let mut ctl = hw.control_loop(sensors, MockSession::new(), sink);

    ctl.tick();

    assert!(hw.alarm.desired());
    assert!(!hw.pump.desired(), "pump responds to fire only");
    assert!(ctl.session().published[0].1.contains("\"pump\": \"NON_ACTIVE\""));
}

// ── Failure containment ───────────────────────────────────────

#[test]
fn publish_failure_does_not_disturb_actuators() {
    let hw = Harness::new();
    let mut sensors = MockSensors::new();
    sensors.push_raw(3000, 1000);
    sensors.push_raw(3000, 1000);
    let mut session = MockSession::new();
    session.fail_publishes(1);
    let (sink, _lines) = RecordingSink::new();
    let mut ctl = hw.control_loop(sensors, session, sink);

    ctl.tick();
    // The record is dropped, the hazard response is not.
    assert!(hw.alarm.desired());
    assert!(hw.pump.desired());
    assert!(ctl.session().published.is_empty());
    assert_eq!(ctl.session().state(), SessionState::Joined);

    // Next tick produces a fresh record that goes through.
    ctl.tick();
    assert_eq!(ctl.session().published.len(), 1);
    assert_eq!(ctl.session().publish_attempts, 2);
}

#[test]
fn sensor_fault_skips_tick_and_preserves_desires() {
    let hw = Harness::new();
    let mut sensors = MockSensors::new();
    sensors.push_raw(3000, 1000);
    sensors.push(Err(SensorReadError::AdcReadFailed));
    sensors.push_raw(100, 100);
    let (sink, lines) = RecordingSink::new();
    let mut ctl = hw.control_loop(sensors, MockSession::new(), sink);

    ctl.tick();
    assert!(hw.alarm.desired());

    // Faulty tick: no publish, no status line, desires untouched.
    ctl.tick();
    assert!(hw.alarm.desired());
    assert!(hw.pump.desired());
    assert_eq!(ctl.session().published.len(), 1);
    assert_eq!(lines.borrow().len(), 1);

    // Recovery on the following period.
    ctl.tick();
    assert!(!hw.alarm.desired());
    assert_eq!(ctl.session().published.len(), 2);
    assert_eq!(ctl.sampler().samples_taken, 3, "every tick samples once");
}

// ── Offline operation and reconnect policy ────────────────────

#[test]
fn offline_node_still_protects() {
    let hw = Harness::new();
    let mut sensors = MockSensors::new();
    sensors.push_raw(3000, 3000);
    let mut session = MockSession::new();
    session.refuse_connects(10);
    let (sink, lines) = RecordingSink::new();
    let mut ctl = hw.control_loop(sensors, session, sink);

    ctl.tick();

    // Hazard response and status display are independent of the uplink.
    assert!(hw.alarm.desired());
    assert!(hw.pump.desired());
    assert_eq!(lines.borrow().len(), 1);
    assert!(ctl.session().published.is_empty());
    assert_eq!(ctl.session().publish_attempts, 0);
    assert_eq!(ctl.session().state(), SessionState::Disconnected);
}

/// Session that snapshots the alarm desire at the moment `connect()`
/// runs, making the actuators-before-network ordering observable.
struct SpySession<'a> {
    alarm: &'a ActuatorControl,
    desire_at_connect: Vec<bool>,
}

impl flamex::transport::TransportSession for SpySession<'_> {
    fn connect(&mut self) -> Result<(), ConnectError> {
        self.desire_at_connect.push(self.alarm.desired());
        Err(ConnectError::LinkUnreachable)
    }

    fn publish(
        &mut self,
        _channel: &str,
        _payload: &[u8],
        _delivery: Delivery,
    ) -> Result<(), PublishError> {
        Err(PublishError::NotJoined)
    }

    fn disconnect(&mut self) {}

    fn state(&self) -> SessionState {
        SessionState::Disconnected
    }
}

#[test]
fn actuators_are_driven_before_any_network_work() {
    let hw = Harness::new();
    let mut sensors = MockSensors::new();
    sensors.push_raw(3000, 1000); // fire
    let session = SpySession {
        alarm: &hw.alarm,
        desire_at_connect: Vec::new(),
    };
    let (sink, _lines) = RecordingSink::new();
    let mut ctl = ControlLoop::new(
        sensors,
        session,
        sink,
        &hw.alarm,
        &hw.pump,
        NodeConfig::default(),
        Delivery::ExactlyOnce,
    );

    ctl.tick();

    // The offline connect attempt must already see the alarm requested.
    assert_eq!(ctl.session().desire_at_connect, [true]);
}

#[test]
fn reconnect_is_attempted_on_a_fixed_cadence() {
    let hw = Harness::new();
    let mut sensors = MockSensors::new();
    sensors.push_raw(100, 100);
    let mut session = MockSession::new();
    session.refuse_connects(10);
    let (sink, _lines) = RecordingSink::new();
    let mut ctl = hw.control_loop(sensors, session, sink);

    let every = NodeConfig::default().reconnect_every_ticks;
    for _ in 0..=every {
        ctl.tick();
    }
    // One attempt on the first tick and one when the cadence comes round.
    assert_eq!(ctl.session().connect_calls, 2);
}

#[test]
fn zero_reconnect_cadence_retries_every_tick() {
    let hw = Harness::new();
    let mut sensors = MockSensors::new();
    sensors.push_raw(100, 100);
    let mut session = MockSession::new();
    session.refuse_connects(10);
    let (sink, _lines) = RecordingSink::new();
    let mut cfg = NodeConfig::default();
    cfg.reconnect_every_ticks = 0; // degenerate config value
    let mut ctl = ControlLoop::new(
        sensors,
        session,
        sink,
        &hw.alarm,
        &hw.pump,
        cfg,
        Delivery::ExactlyOnce,
    );

    for _ in 0..3 {
        ctl.tick();
    }
    assert_eq!(ctl.session().connect_calls, 3);
}

#[test]
fn publishing_resumes_once_reconnect_succeeds() {
    let hw = Harness::new();
    let mut sensors = MockSensors::new();
    sensors.push_raw(100, 100);
    let mut session = MockSession::new();
    session.refuse_connects(1);
    let (sink, _lines) = RecordingSink::new();
    let mut ctl = hw.control_loop(sensors, session, sink);

    let every = NodeConfig::default().reconnect_every_ticks;
    for _ in 0..every {
        ctl.tick();
    }
    assert!(ctl.session().published.is_empty());

    // The cadence tick gets through and the same tick publishes.
    ctl.tick();
    assert_eq!(ctl.session().state(), SessionState::Joined);
    assert_eq!(ctl.session().published.len(), 1);

    // Joined sessions are not re-connected.
    let calls = ctl.session().connect_calls;
    ctl.tick();
    assert_eq!(ctl.session().connect_calls, calls);
}
