//! Node configuration.
//!
//! All deployment parameters in one place: sampling period, hazard
//! thresholds, duty cycles, and the transport settings for both backends.
//! Values are fixed at build/config time — there is no runtime
//! reconfiguration path on this node.

use serde::{Deserialize, Serialize};

/// Core node configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Node identifier carried in every telemetry record.
    pub node_id: u16,

    // --- Sampling ---
    /// Highest raw code the ADC can produce (12-bit converter).
    pub adc_max_raw: u16,
    /// Control-loop period in seconds (10–60 depending on deployment).
    pub sample_period_secs: u16,

    // --- Hazard thresholds ---
    /// Flame percentage above which fire is declared.
    pub flame_threshold_pct: f32,
    /// Gas percentage above which gas is declared.
    pub gas_threshold_pct: f32,

    // --- Actuator duty cycles ---
    /// Buzzer on-hold per pulse (milliseconds).
    pub alarm_on_ms: u64,
    /// Buzzer off-hold per pulse (milliseconds).
    pub alarm_off_ms: u64,
    /// Pump relay hold between desire re-checks (milliseconds).
    pub pump_on_ms: u64,
    /// Pump relay off-hold (zero: the relay is held continuously).
    pub pump_off_ms: u64,

    // --- Session ---
    /// Re-attempt `connect()` every this many ticks while offline.
    pub reconnect_every_ticks: u32,

    pub mqtt: MqttConfig,
    pub lora: LoraConfig,
}

/// Pub/sub backend settings (MQTT 3.1.1, clean session).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MqttConfig {
    pub broker_host: heapless::String<64>,
    pub broker_port: u16,
    pub topic: heapless::String<32>,
    pub client_id: heapless::String<32>,
    pub keepalive_secs: u16,
}

/// LPWAN backend settings (OTAA join, keys provisioned at build time).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoraConfig {
    pub deveui: [u8; 8],
    pub appeui: [u8; 8],
    pub appkey: [u8; 16],
    /// Hard bound on OTAA join attempts per connect.
    pub max_join_retries: u8,
    /// Application port for uplinks.
    pub uplink_port: u8,
    /// Request confirmed uplinks (backend default is unconfirmed).
    pub confirmed_uplink: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            node_id: 1,

            adc_max_raw: 4095,
            sample_period_secs: 10,

            flame_threshold_pct: 70.0,
            gas_threshold_pct: 40.0,

            alarm_on_ms: 1000,
            alarm_off_ms: 400,
            pump_on_ms: 5000,
            pump_off_ms: 0,

            reconnect_every_ticks: 6,

            mqtt: MqttConfig {
                broker_host: heapless::String::try_from("192.168.13.13").unwrap_or_default(),
                broker_port: 1883,
                topic: heapless::String::try_from("flamex").unwrap_or_default(),
                client_id: heapless::String::new(),
                keepalive_secs: 10,
            },
            lora: LoraConfig {
                deveui: [0; 8],
                appeui: [0; 8],
                appkey: [0; 16],
                max_join_retries: 3,
                uplink_port: 1,
                confirmed_uplink: false,
            },
        }
    }
}
