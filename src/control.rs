//! Control loop — the fixed-period orchestrator.
//!
//! Each tick flows one direction:
//!
//! ```text
//!  SensorPort ──▶ hazard::evaluate ──▶ ActuatorControl (wake on rising edge)
//!                        │
//!                        ├──▶ StatusSink (one deterministic line)
//!                        └──▶ TelemetryRecord ──▶ TransportSession
//! ```
//!
//! Actuators are driven before any network work, and every transport
//! failure is contained to the tick that produced it: hazard response
//! never depends on network health. The loop itself never terminates;
//! only a hardware-init failure at boot aborts the process.

use core::time::Duration;

use log::{info, warn};

use crate::actuator::ActuatorControl;
use crate::config::NodeConfig;
use crate::display::status_line;
use crate::hazard::{self, HazardState};
use crate::ports::{SensorPort, StatusSink};
use crate::telemetry::TelemetryRecord;
use crate::transport::{Delivery, TransportSession};

pub struct ControlLoop<'a, S, T, D> {
    sampler: S,
    session: T,
    display: D,
    alarm: &'a ActuatorControl,
    pump: &'a ActuatorControl,
    cfg: NodeConfig,
    delivery: Delivery,
    last_hazard: HazardState,
    ticks_offline: u32,
}

impl<'a, S, T, D> ControlLoop<'a, S, T, D>
where
    S: SensorPort,
    T: TransportSession,
    D: StatusSink,
{
    pub fn new(
        sampler: S,
        session: T,
        display: D,
        alarm: &'a ActuatorControl,
        pump: &'a ActuatorControl,
        cfg: NodeConfig,
        delivery: Delivery,
    ) -> Self {
        Self {
            sampler,
            session,
            display,
            alarm,
            pump,
            cfg,
            delivery,
            last_hazard: HazardState::None,
            ticks_offline: 0,
        }
    }

    /// Run forever at the configured period. The between-tick sleep is a
    /// cooperative suspension — actuator wakes are delivered through their
    /// signals, never polled under anything this loop holds.
    pub async fn run(&mut self) {
        let period = Duration::from_secs(u64::from(self.cfg.sample_period_secs));
        loop {
            self.tick();
            async_io_mini::Timer::after(period).await;
        }
    }

    /// One control cycle: sample → evaluate → actuate → report.
    /// Synchronous and side-effect-complete, so tests can drive it directly.
    pub fn tick(&mut self) {
        // A stuck sensor must not crash the node: abort the tick, leave
        // actuator desires untouched, retry next period.
        let reading = match self.sampler.sample() {
            Ok(r) => r,
            Err(e) => {
                warn!("control: sensor read failed ({e}), skipping tick");
                return;
            }
        };

        let hazard = hazard::evaluate(
            reading.flame_pct,
            reading.gas_pct,
            self.cfg.flame_threshold_pct,
            self.cfg.gas_threshold_pct,
        );
        if hazard != self.last_hazard {
            self.log_hazard(hazard);
            self.last_hazard = hazard;
        }

        // Desire updates happen-before the wake each request() may post.
        self.alarm.request(hazard.alarm_desired());
        self.pump.request(hazard.pump_desired());

        self.display.show(&status_line(&reading, hazard));

        // Network work strictly after the actuators are driven: a slow
        // connect delays telemetry, never hazard response.
        self.maybe_reconnect();

        if !self.session.state().is_joined() {
            return;
        }
        let record = TelemetryRecord::from_reading(self.cfg.node_id, &reading, hazard.pump_desired());
        let payload = record.encode();
        match self
            .session
            .publish(self.cfg.mqtt.topic.as_str(), payload.as_bytes(), self.delivery)
        {
            Ok(()) => info!("control: published {payload}"),
            // At-most-once: drop the record, next tick retries on its own.
            Err(e) => warn!("control: unable to publish ({e})"),
        }
    }

    /// Offline recovery: re-attempt `connect()` on the first tick and then
    /// every `reconnect_every_ticks` ticks while the session is down.
    fn maybe_reconnect(&mut self) {
        if self.session.state().is_joined() {
            self.ticks_offline = 0;
            return;
        }
        // A zero cadence degenerates to retrying every tick.
        if self.ticks_offline % self.cfg.reconnect_every_ticks.max(1) == 0 {
            if let Err(e) = self.session.connect() {
                warn!("control: connect failed ({e}), staying offline");
            }
        }
        self.ticks_offline = self.ticks_offline.wrapping_add(1);
    }

    fn log_hazard(&self, hazard: HazardState) {
        if hazard.fire() {
            info!("control: FIRE DETECTED");
        } else {
            info!("control: no fire detected");
        }
        if hazard.gas() {
            info!("control: GAS DETECTED");
        } else {
            info!("control: no gas detected");
        }
    }

    pub fn session(&self) -> &T {
        &self.session
    }

    pub fn sampler(&self) -> &S {
        &self.sampler
    }
}
