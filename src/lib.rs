//! FLAMEX node firmware library.
//!
//! Exposes the control core for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module, so the sampling,
//! hazard, actuator, telemetry, and transport logic runs on the host.

#![deny(unused_must_use)]

pub mod actuator;
pub mod config;
pub mod control;
pub mod display;
pub mod error;
pub mod hazard;
pub mod pins;
pub mod ports;
pub mod sensors;
pub mod telemetry;
pub mod transport;

// Hardware-facing adapters; the real implementations are guarded by cfg
// attributes inside.
pub mod adapters;
