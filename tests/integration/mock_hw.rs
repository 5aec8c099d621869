//! Mock adapters for host-side integration tests.
//!
//! Scriptable stand-ins for the sensor port, the transport session, and
//! the status display, so the control loop can be driven tick-by-tick
//! with full visibility into every side effect.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use flamex::error::{ConnectError, PublishError, SensorReadError};
use flamex::ports::{SensorPort, StatusSink};
use flamex::sensors::{Reading, calibrate};
use flamex::transport::{Delivery, SessionState, TransportSession};

/// Build a calibrated snapshot from raw 12-bit codes, the same way the
/// real sampler would.
pub fn reading_from_raw(flame_raw: u16, gas_raw: u16) -> Reading {
    Reading {
        flame_raw,
        flame_pct: calibrate(flame_raw, 4095, 100.0, 0.0),
        gas_raw,
        gas_pct: calibrate(gas_raw, 4095, 100.0, 0.0),
    }
}

// ── Sensors ───────────────────────────────────────────────────

/// Sensor port fed from a script of readings. When the script runs out,
/// the last entry repeats.
pub struct MockSensors {
    script: VecDeque<Result<Reading, SensorReadError>>,
    last: Result<Reading, SensorReadError>,
    pub samples_taken: u32,
}

impl MockSensors {
    pub fn new() -> Self {
        Self {
            script: VecDeque::new(),
            last: Ok(reading_from_raw(0, 0)),
            samples_taken: 0,
        }
    }

    pub fn push(&mut self, result: Result<Reading, SensorReadError>) {
        self.script.push_back(result);
    }

    pub fn push_raw(&mut self, flame_raw: u16, gas_raw: u16) {
        self.push(Ok(reading_from_raw(flame_raw, gas_raw)));
    }
}

impl SensorPort for MockSensors {
    fn sample(&mut self) -> Result<Reading, SensorReadError> {
        self.samples_taken += 1;
        if let Some(next) = self.script.pop_front() {
            self.last = next;
        }
        self.last
    }
}

// ── Transport ─────────────────────────────────────────────────

/// Transport session honouring the shared state contract, with scriptable
/// connect/publish outcomes and a record of every delivered payload.
pub struct MockSession {
    state: SessionState,
    connect_script: VecDeque<Result<(), ConnectError>>,
    publish_script: VecDeque<Result<(), PublishError>>,
    pub connect_calls: u32,
    pub publish_attempts: u32,
    pub published: Vec<(String, String, Delivery)>,
}

impl MockSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Disconnected,
            connect_script: VecDeque::new(),
            publish_script: VecDeque::new(),
            connect_calls: 0,
            publish_attempts: 0,
            published: Vec::new(),
        }
    }

    /// Refuse the next `n` connect attempts.
    pub fn refuse_connects(&mut self, n: u32) {
        for _ in 0..n {
            self.connect_script
                .push_back(Err(ConnectError::LinkUnreachable));
        }
    }

    /// Fail the next `n` publish attempts.
    pub fn fail_publishes(&mut self, n: u32) {
        for _ in 0..n {
            self.publish_script.push_back(Err(PublishError::SendFailed));
        }
    }
}

impl TransportSession for MockSession {
    fn connect(&mut self) -> Result<(), ConnectError> {
        self.connect_calls += 1;
        if self.state.is_joined() {
            return Ok(());
        }
        match self.connect_script.pop_front().unwrap_or(Ok(())) {
            Ok(()) => {
                self.state = SessionState::Joined;
                Ok(())
            }
            Err(e) => {
                self.state = SessionState::Disconnected;
                Err(e)
            }
        }
    }

    fn publish(
        &mut self,
        channel: &str,
        payload: &[u8],
        delivery: Delivery,
    ) -> Result<(), PublishError> {
        self.publish_attempts += 1;
        if !self.state.is_joined() {
            return Err(PublishError::NotJoined);
        }
        self.publish_script.pop_front().unwrap_or(Ok(()))?;
        let text = String::from_utf8_lossy(payload).into_owned();
        self.published.push((channel.to_string(), text, delivery));
        Ok(())
    }

    fn disconnect(&mut self) {
        self.state = SessionState::Disconnected;
    }

    fn state(&self) -> SessionState {
        self.state
    }
}

// ── Display ───────────────────────────────────────────────────

/// Status sink that records every line through a shared handle, so tests
/// keep access after the sink moves into the control loop.
pub struct RecordingSink {
    lines: Rc<RefCell<Vec<String>>>,
}

impl RecordingSink {
    pub fn new() -> (Self, Rc<RefCell<Vec<String>>>) {
        let lines = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                lines: Rc::clone(&lines),
            },
            lines,
        )
    }
}

impl StatusSink for RecordingSink {
    fn show(&mut self, line: &str) {
        self.lines.borrow_mut().push(line.to_string());
    }
}
