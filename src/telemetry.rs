//! Telemetry record and wire encoding.
//!
//! The uplink schema is fixed — field order, quoting, and numeric
//! formatting are part of the contract with the dashboard backend, so the
//! encoder is hand-rolled rather than serde-derived:
//!
//! ```text
//! {"id": "1", "voltage": "73.26", "flame": "73", "gas": "24", "pump": "ACTIVE"}
//! ```
//!
//! Every value is a quoted string; `voltage` carries two decimals, `gas`
//! is zero-padded to two digits. `encode` is total: the output buffer is
//! sized so the bounded numeric widths can never overflow it.

use core::fmt::Write;

use crate::sensors::Reading;

/// Upper bound on an encoded record (fields are width-bounded).
pub const PAYLOAD_CAP: usize = 128;

/// One tick's telemetry, built fresh and consumed immediately.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryRecord {
    pub node_id: u16,
    /// Calibrated flame value, two decimals on the wire (`voltage` field).
    pub flame_pct: f32,
    /// Integer flame percentage (`flame` field).
    pub flame_flag: i32,
    /// Integer gas percentage, two-digit on the wire (`gas` field).
    pub gas_pct: i32,
    pub pump_active: bool,
}

impl TelemetryRecord {
    pub fn from_reading(node_id: u16, reading: &Reading, pump_active: bool) -> Self {
        Self {
            node_id,
            flame_pct: reading.flame_pct,
            flame_flag: reading.flame_pct as i32,
            gas_pct: reading.gas_pct as i32,
            pump_active,
        }
    }

    /// Serialise into the fixed wire schema. Deterministic and total.
    pub fn encode(&self) -> heapless::String<PAYLOAD_CAP> {
        let mut out = heapless::String::new();
        let pump = if self.pump_active { "ACTIVE" } else { "NON_ACTIVE" };
        // Cannot overflow PAYLOAD_CAP: worst-case field widths sum to < 90.
        let _ = write!(
            out,
            "{{\"id\": \"{}\", \"voltage\": \"{:.2}\", \"flame\": \"{}\", \"gas\": \"{:02}\", \"pump\": \"{}\"}}",
            self.node_id, self.flame_pct, self.flame_flag, self.gas_pct, pump,
        );
        out
    }
}

/// Decode a wire payload produced by [`TelemetryRecord::encode`] (or any
/// producer with a matching schema). Returns `None` on shape mismatch.
pub fn decode(payload: &str) -> Option<TelemetryRecord> {
    let value: serde_json::Value = serde_json::from_str(payload).ok()?;
    let field = |name: &str| value.get(name)?.as_str();

    let pump_active = match field("pump")? {
        "ACTIVE" => true,
        "NON_ACTIVE" => false,
        _ => return None,
    };

    Some(TelemetryRecord {
        node_id: field("id")?.parse().ok()?,
        flame_pct: field("voltage")?.parse().ok()?,
        flame_flag: field("flame")?.parse().ok()?,
        gas_pct: field("gas")?.parse().ok()?,
        pump_active,
    })
}
