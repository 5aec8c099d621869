//! MQTT pub/sub backend.
//!
//! Connects to a fixed broker address, publishes telemetry to a fixed
//! topic with QoS 2 semantics, non-retained. MQTT 3.1.1, clean session.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real client via `esp_idf_svc::mqtt`.
//! - **all other targets**: deterministic simulation for host-side tests,
//!   scripted through `sim_refuse_connects` / `sim_fail_publishes`.

use log::{info, warn};

use crate::config::MqttConfig;
use crate::error::{ConnectError, PublishError};

use super::{Delivery, SessionState, TransportSession};

pub struct MqttSession {
    cfg: MqttConfig,
    state: SessionState,
    #[cfg(target_os = "espidf")]
    client: Option<esp_idf_svc::mqtt::client::EspMqttClient<'static>>,
    #[cfg(not(target_os = "espidf"))]
    sim_refuse_connects: u32,
    #[cfg(not(target_os = "espidf"))]
    sim_fail_publishes: u32,
    #[cfg(not(target_os = "espidf"))]
    sim_published: std::vec::Vec<std::string::String>,
}

impl MqttSession {
    pub fn new(cfg: MqttConfig) -> Self {
        Self {
            cfg,
            state: SessionState::Disconnected,
            #[cfg(target_os = "espidf")]
            client: None,
            #[cfg(not(target_os = "espidf"))]
            sim_refuse_connects: 0,
            #[cfg(not(target_os = "espidf"))]
            sim_fail_publishes: 0,
            #[cfg(not(target_os = "espidf"))]
            sim_published: std::vec::Vec::new(),
        }
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self) -> Result<(), ConnectError> {
        use core::fmt::Write;
        use esp_idf_svc::mqtt::client::{EspMqttClient, MqttClientConfiguration};
        use log::error;

        let mut url: heapless::String<96> = heapless::String::new();
        let _ = write!(url, "mqtt://{}:{}", self.cfg.broker_host, self.cfg.broker_port);

        let conf = MqttClientConfiguration {
            client_id: Some(self.cfg.client_id.as_str()),
            keep_alive_interval: Some(core::time::Duration::from_secs(u64::from(
                self.cfg.keepalive_secs,
            ))),
            ..Default::default()
        };

        match EspMqttClient::new_cb(&url, &conf, |_| {}) {
            Ok(client) => {
                self.client = Some(client);
                Ok(())
            }
            Err(e) => {
                error!("MQTT: broker connect failed ({e})");
                Err(ConnectError::LinkUnreachable)
            }
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self) -> Result<(), ConnectError> {
        if self.sim_refuse_connects > 0 {
            self.sim_refuse_connects -= 1;
            return Err(ConnectError::LinkUnreachable);
        }
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_publish(
        &mut self,
        channel: &str,
        payload: &[u8],
        delivery: Delivery,
    ) -> Result<(), PublishError> {
        use esp_idf_svc::mqtt::client::QoS;

        let qos = match delivery {
            Delivery::AtMostOnce => QoS::AtMostOnce,
            Delivery::AtLeastOnce => QoS::AtLeastOnce,
            Delivery::ExactlyOnce => QoS::ExactlyOnce,
        };
        let client = self.client.as_mut().ok_or(PublishError::NotJoined)?;
        client
            .publish(channel, qos, false, payload)
            .map(|_| ())
            .map_err(|_| PublishError::SendFailed)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_publish(
        &mut self,
        channel: &str,
        payload: &[u8],
        _delivery: Delivery,
    ) -> Result<(), PublishError> {
        if self.sim_fail_publishes > 0 {
            self.sim_fail_publishes -= 1;
            return Err(PublishError::SendFailed);
        }
        let text = core::str::from_utf8(payload).map_err(|_| PublishError::SendFailed)?;
        self.sim_published.push(format!("{channel}:{text}"));
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_disconnect(&mut self) {
        // Dropping the client tears down the TCP session.
        self.client = None;
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_disconnect(&mut self) {}

    // ── Simulation hooks ──────────────────────────────────────

    /// Refuse the next `n` connect attempts (host sim only).
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_refuse_connects(&mut self, n: u32) {
        self.sim_refuse_connects = n;
    }

    /// Fail the next `n` publishes (host sim only).
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_fail_publishes(&mut self, n: u32) {
        self.sim_fail_publishes = n;
    }

    /// Payloads delivered to the sim broker, as `topic:payload`.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_published(&self) -> &[std::string::String] {
        &self.sim_published
    }
}

impl TransportSession for MqttSession {
    fn connect(&mut self) -> Result<(), ConnectError> {
        if self.state.is_joined() {
            return Ok(());
        }
        info!(
            "MQTT: connecting to {}:{}",
            self.cfg.broker_host, self.cfg.broker_port
        );
        self.state = SessionState::Connecting;
        match self.platform_connect() {
            Ok(()) => {
                info!("MQTT: connected to broker");
                self.state = SessionState::Joined;
                Ok(())
            }
            Err(e) => {
                warn!("MQTT: unable to connect ({e})");
                self.platform_disconnect();
                // Keep the failure cause visible until the next attempt.
                self.state = SessionState::Failed(e);
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
        if !self.state.is_joined() {
            return Err(PublishError::NotJoined);
        }
        self.state = SessionState::Publishing;
        let result = self.platform_publish(channel, payload, delivery);
        // Publishing is transient: back to Joined whatever happened.
        self.state = SessionState::Joined;
        result
    }

    fn disconnect(&mut self) {
        self.platform_disconnect();
        self.state = SessionState::Disconnected;
        info!("MQTT: disconnected");
    }

    fn state(&self) -> SessionState {
        self.state
    }
}
