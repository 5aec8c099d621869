//! Status-line formatting for the display collaborator.
//!
//! Rendering is out of scope — the node's only obligation is producing one
//! deterministic line per tick from the reading and hazard state.

use core::fmt::Write;

use crate::hazard::HazardState;
use crate::sensors::Reading;

/// Upper bound on a formatted status line.
pub const STATUS_CAP: usize = 96;

/// Format one tick's status. Same inputs always yield the same line.
pub fn status_line(reading: &Reading, hazard: HazardState) -> heapless::String<STATUS_CAP> {
    let mut line = heapless::String::new();
    let fire = if hazard.fire() { "FIRE" } else { "no fire" };
    let gas = if hazard.gas() { "GAS" } else { "no gas" };
    // Bounded field widths; cannot overflow STATUS_CAP.
    let _ = write!(
        line,
        "flame {:.2}% {} | gas {:.2}% {}",
        reading.flame_pct, fire, reading.gas_pct, gas,
    );
    line
}
