//! LoRaWAN MAC backend.
//!
//! Joins the network over-the-air (OTAA) with device/application
//! identifiers and keys provisioned at build time, then sends telemetry
//! as UTF-8 uplinks. The join handshake is bounded: at most
//! `max_join_retries` attempts per `connect()`, each attempt independent
//! and logged. Exhausting the bound returns
//! [`ConnectError::JoinExhausted`] and leaves the session `Disconnected` —
//! the node keeps sampling and driving actuators while offline.
//!
//! The radio MAC itself is a collaborator behind [`LorawanMac`]; driver
//! initialisation is out of scope here.

use log::{info, warn};

use crate::config::LoraConfig;
use crate::error::{ConnectError, PublishError};

use super::{Delivery, SessionState, TransportSession};

/// Largest uplink frame accepted at the fast datarates this node uses.
pub const MAX_UPLINK_BYTES: usize = 222;

/// Radio MAC collaborator (e.g. an SX127x LoRaWAN stack).
pub trait LorawanMac {
    fn join_otaa(
        &mut self,
        deveui: &[u8; 8],
        appeui: &[u8; 8],
        appkey: &[u8; 16],
    ) -> Result<(), MacError>;

    fn send(&mut self, port: u8, payload: &[u8], confirmed: bool) -> Result<(), MacError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacError {
    JoinFailed,
    TxFailed,
    Busy,
}

impl core::fmt::Display for MacError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::JoinFailed => write!(f, "join failed"),
            Self::TxFailed => write!(f, "transmit failed"),
            Self::Busy => write!(f, "MAC busy"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Session
// ───────────────────────────────────────────────────────────────

pub struct LoraSession<M> {
    mac: M,
    cfg: LoraConfig,
    state: SessionState,
}

impl<M: LorawanMac> LoraSession<M> {
    pub fn new(mac: M, cfg: LoraConfig) -> Self {
        Self {
            mac,
            cfg,
            state: SessionState::Disconnected,
        }
    }
}

impl<M: LorawanMac> TransportSession for LoraSession<M> {
    fn connect(&mut self) -> Result<(), ConnectError> {
        if self.state.is_joined() {
            return Ok(());
        }
        self.state = SessionState::Connecting;

        let retries = self.cfg.max_join_retries;
        for attempt in 1..=retries {
            info!("LoRa: starting join procedure (attempt {attempt})");
            match self
                .mac
                .join_otaa(&self.cfg.deveui, &self.cfg.appeui, &self.cfg.appkey)
            {
                Ok(()) => {
                    info!("LoRa: join procedure succeeded");
                    self.state = SessionState::Joined;
                    return Ok(());
                }
                Err(e) => warn!("LoRa: join procedure failed ({e})"),
            }
        }

        warn!("LoRa: exceeded maximum join retries ({retries})");
        self.state = SessionState::Disconnected;
        Err(ConnectError::JoinExhausted { attempts: retries })
    }

    fn publish(
        &mut self,
        _channel: &str,
        payload: &[u8],
        delivery: Delivery,
    ) -> Result<(), PublishError> {
        if !self.state.is_joined() {
            return Err(PublishError::NotJoined);
        }
        if payload.len() > MAX_UPLINK_BYTES {
            return Err(PublishError::PayloadTooLarge);
        }

        let confirmed =
            self.cfg.confirmed_uplink || !matches!(delivery, Delivery::AtMostOnce);

        self.state = SessionState::Publishing;
        let result = self
            .mac
            .send(self.cfg.uplink_port, payload, confirmed)
            .map_err(|_| PublishError::SendFailed);
        self.state = SessionState::Joined;
        result
    }

    fn disconnect(&mut self) {
        // A LoRaWAN session has no teardown handshake; forget the join.
        self.state = SessionState::Disconnected;
        info!("LoRa: session dropped");
    }

    fn state(&self) -> SessionState {
        self.state
    }
}

// ───────────────────────────────────────────────────────────────
// Host simulation MAC
// ───────────────────────────────────────────────────────────────

/// Scripted MAC for host-side tests: fails the first `join_failures`
/// join attempts, records every accepted uplink.
#[cfg(not(target_os = "espidf"))]
pub struct SimLoraMac {
    pub join_failures: u32,
    pub join_attempts: u32,
    pub fail_sends: u32,
    pub sent: std::vec::Vec<std::vec::Vec<u8>>,
}

#[cfg(not(target_os = "espidf"))]
impl SimLoraMac {
    pub fn new(join_failures: u32) -> Self {
        Self {
            join_failures,
            join_attempts: 0,
            fail_sends: 0,
            sent: std::vec::Vec::new(),
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl LorawanMac for SimLoraMac {
    fn join_otaa(
        &mut self,
        _deveui: &[u8; 8],
        _appeui: &[u8; 8],
        _appkey: &[u8; 16],
    ) -> Result<(), MacError> {
        self.join_attempts += 1;
        if self.join_failures > 0 {
            self.join_failures -= 1;
            return Err(MacError::JoinFailed);
        }
        Ok(())
    }

    fn send(&mut self, _port: u8, payload: &[u8], _confirmed: bool) -> Result<(), MacError> {
        if self.fail_sends > 0 {
            self.fail_sends -= 1;
            return Err(MacError::TxFailed);
        }
        self.sent.push(payload.to_vec());
        Ok(())
    }
}
