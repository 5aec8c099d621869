//! Network session abstraction.
//!
//! Both uplink backends — the MQTT pub/sub client and the LoRaWAN MAC
//! client — implement [`TransportSession`], so the control loop carries a
//! single code path regardless of which radio the deployment uses. Backend
//! selection is a build-time choice (`transport-lora` feature), never
//! duplicated loop logic.
//!
//! Telemetry is at-most-once: a failed publish is logged and dropped, and
//! the next tick produces a fresh record. No payload is ever queued.

pub mod lora;
pub mod mqtt;

use crate::error::{ConnectError, PublishError};

/// Delivery guarantee requested for one publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Fire-and-forget (LoRaWAN unconfirmed uplink, MQTT QoS 0).
    AtMostOnce,
    /// Acknowledged (LoRaWAN confirmed uplink, MQTT QoS 1).
    AtLeastOnce,
    /// Exactly-once-attempted handshake (MQTT QoS 2).
    ExactlyOnce,
}

/// Session lifecycle, owned exclusively by the backend. The control loop
/// only observes it to decide whether to attempt a publish this tick.
///
/// `Publishing` is transient: it collapses back to `Joined` after every
/// publish attempt regardless of outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Joined,
    Publishing,
    /// A connect attempt failed; the cause stays visible until the next
    /// attempt. The radio backend reports join exhaustion as
    /// `Disconnected` instead — a bounded join failing while the gateway
    /// is down is routine, not a fault to keep on display.
    Failed(ConnectError),
}

impl SessionState {
    /// Whether a publish can be attempted this tick.
    pub fn is_joined(self) -> bool {
        matches!(self, Self::Joined | Self::Publishing)
    }
}

/// Abstract contract shared by both backends.
pub trait TransportSession {
    /// Establish link-layer connectivity. For the radio backend this
    /// includes the OTAA join handshake, bounded to a fixed retry count;
    /// exhausting the bound is a hard failure the caller surfaces but
    /// does not crash on — the node keeps operating offline.
    fn connect(&mut self) -> Result<(), ConnectError>;

    /// Send one telemetry record. Failure is non-fatal: the caller logs
    /// and skips; the next tick retries independently.
    fn publish(&mut self, channel: &str, payload: &[u8], delivery: Delivery)
    -> Result<(), PublishError>;

    /// Best-effort teardown; failures are logged only.
    fn disconnect(&mut self);

    fn state(&self) -> SessionState;
}
