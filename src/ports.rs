//! Port traits — the boundary between the control core and its collaborators.
//!
//! Driven adapters (ADC channels, the display, the logger) implement these
//! traits. The control loop consumes them via generics, so the core never
//! touches a concrete driver. Actuator outputs use
//! [`embedded_hal::digital::OutputPin`] directly — there is nothing
//! node-specific about setting a pin.

use crate::error::SensorReadError;
use crate::sensors::Reading;

/// One calibratable analog input channel.
///
/// A read failure is reported, not panicked on: a stuck sensor must not
/// crash the node. The caller skips the tick and retries next period.
pub trait AnalogInput {
    /// Read one raw ADC code, bounded by the converter's resolution.
    fn read(&mut self) -> Result<u16, SensorReadError>;
}

/// Read-side port: the control loop calls this once per tick.
pub trait SensorPort {
    /// Sample both channels and return a calibrated snapshot.
    fn sample(&mut self) -> Result<Reading, SensorReadError>;
}

/// Display collaborator. The core's only obligation is producing one
/// deterministic status line per tick; where it ends up (OLED, serial,
/// log) is the adapter's business.
pub trait StatusSink {
    fn show(&mut self, line: &str);
}
