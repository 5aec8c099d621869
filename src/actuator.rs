//! Actuator tasks — alarm buzzer and pump relay.
//!
//! Each actuator is an independently scheduled async task driven by a
//! shared [`ActuatorControl`]: an atomic desire flag written only by the
//! control loop, plus a coalescing wake signal. While idle the task blocks
//! on the signal and consumes no scheduler time; once woken it runs
//! complete on/off duty pulses, re-checking desire only at pulse
//! boundaries so a pulse is never truncated mid-way.
//!
//! ```text
//!  ControlLoop ──request(true)──▶ desire=true ──signal──▶ ┌──────────┐
//!                                                         │ Actuator │──▶ GPIO
//!  ControlLoop ──request(false)─▶ desire=false (no wake)  │   task   │
//!                                                         └──────────┘
//! ```
//!
//! The alarm and the pump are two instances of this state machine with
//! their own control, pin, and duty cycle — they share no mutable state.

use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embedded_hal::digital::OutputPin;
use log::{info, warn};

/// Fixed on/off pulse pattern executed while active.
///
/// A zero `off` hold degenerates to a continuously held output that still
/// re-checks desire once per `on` period (the pump relay case).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DutyCycle {
    pub on: Duration,
    pub off: Duration,
}

impl DutyCycle {
    pub const fn from_millis(on_ms: u64, off_ms: u64) -> Self {
        Self {
            on: Duration::from_millis(on_ms),
            off: Duration::from_millis(off_ms),
        }
    }
}

/// Electrical polarity of the output pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Asserted = pin high (buzzer).
    ActiveHigh,
    /// Asserted = pin low (relay coil).
    ActiveLow,
}

// ───────────────────────────────────────────────────────────────
// Shared control (writer: control loop; reader: one task)
// ───────────────────────────────────────────────────────────────

/// Desire flag plus wake signal for exactly one actuator task.
///
/// Invariant: only the control loop calls [`request`](Self::request); the
/// owning task only reads the flag and consumes the signal. The signal is
/// coalescing — a second wake before the task runs overwrites the pending
/// one, so the task observes at most the latest desire value.
pub struct ActuatorControl {
    desire: AtomicBool,
    wake: Signal<CriticalSectionRawMutex, ()>,
}

impl ActuatorControl {
    pub const fn new() -> Self {
        Self {
            desire: AtomicBool::new(false),
            wake: Signal::new(),
        }
    }

    /// Set the desired state for this tick. Posts a wake only on a
    /// false→true transition; the flag store happens-before the signal.
    pub fn request(&self, active: bool) {
        let prev = self.desire.swap(active, Ordering::AcqRel);
        if active && !prev {
            self.wake.signal(());
        }
    }

    pub fn desired(&self) -> bool {
        self.desire.load(Ordering::Acquire)
    }

    async fn wait_for_wake(&self) {
        self.wake.wait().await;
    }
}

// ───────────────────────────────────────────────────────────────
// Task
// ───────────────────────────────────────────────────────────────

/// One actuator state machine: `Idle` (blocked on the wake signal) or
/// `Active` (running duty pulses).
pub struct ActuatorTask<'a, P> {
    control: &'a ActuatorControl,
    output: P,
    duty: DutyCycle,
    polarity: Polarity,
    name: &'static str,
}

impl<'a, P: OutputPin> ActuatorTask<'a, P> {
    pub fn new(
        control: &'a ActuatorControl,
        output: P,
        duty: DutyCycle,
        polarity: Polarity,
        name: &'static str,
    ) -> Self {
        Self {
            control,
            output,
            duty,
            polarity,
            name,
        }
    }

    /// Run forever. Spawn on the executor alongside the control loop.
    /// The idle branch deasserts on entry, so the output starts released
    /// regardless of power-on pin state.
    pub async fn run(mut self) {
        loop {
            if !self.control.desired() {
                self.deassert();
                info!("{}: idle", self.name);
                self.control.wait_for_wake().await;
                continue;
            }
            self.pulse().await;
        }
    }

    /// One complete on/off pulse. Desire is not re-checked until the pulse
    /// has finished, so activation always yields at least one clean pulse.
    async fn pulse(&mut self) {
        self.assert_output();
        async_io_mini::Timer::after(self.duty.on).await;
        self.deassert();
        if !self.duty.off.is_zero() {
            async_io_mini::Timer::after(self.duty.off).await;
        }
    }

    fn assert_output(&mut self) {
        let res = match self.polarity {
            Polarity::ActiveHigh => self.output.set_high(),
            Polarity::ActiveLow => self.output.set_low(),
        };
        if res.is_err() {
            warn!("{}: output assert failed", self.name);
        }
    }

    fn deassert(&mut self) {
        let res = match self.polarity {
            Polarity::ActiveHigh => self.output.set_low(),
            Polarity::ActiveLow => self.output.set_high(),
        };
        if res.is_err() {
            warn!("{}: output deassert failed", self.name);
        }
    }
}
