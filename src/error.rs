//! Unified error types for the FLAMEX node.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! control loop's error handling uniform. All variants are `Copy` so they
//! can be passed through the tick path without allocation.
//!
//! Containment policy: only [`Error::Init`] is fatal (raised once at boot,
//! nothing to control without sensors and actuators). Everything else is
//! scoped to a single tick or to the transport session and is logged, never
//! propagated out of the loop.

use core::fmt;

/// Every fallible operation in the node funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Peripheral initialisation failed — fatal at startup.
    Init(&'static str),
    /// A sensor read failed. The tick is skipped and retried next period.
    Sensor(SensorReadError),
    /// The network session could not be established.
    Connect(ConnectError),
    /// A telemetry publish failed. The record is dropped.
    Publish(PublishError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Connect(e) => write!(f, "connect: {e}"),
            Self::Publish(e) => write!(f, "publish: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorReadError {
    /// ADC read returned an error or timed out.
    AdcReadFailed,
    /// Raw code exceeds the configured ADC resolution.
    OutOfRange,
}

impl fmt::Display for SensorReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdcReadFailed => write!(f, "ADC read failed"),
            Self::OutOfRange => write!(f, "raw code out of range"),
        }
    }
}

impl From<SensorReadError> for Error {
    fn from(e: SensorReadError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectError {
    /// Link-layer connect to the broker/gateway failed.
    LinkUnreachable,
    /// The remote end refused the session handshake.
    HandshakeRefused,
    /// OTAA join failed on every attempt within the retry bound.
    JoinExhausted { attempts: u8 },
}

impl fmt::Display for ConnectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LinkUnreachable => write!(f, "link unreachable"),
            Self::HandshakeRefused => write!(f, "session handshake refused"),
            Self::JoinExhausted { attempts } => {
                write!(f, "join exhausted after {attempts} attempts")
            }
        }
    }
}

impl From<ConnectError> for Error {
    fn from(e: ConnectError) -> Self {
        Self::Connect(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishError {
    /// Session is not joined; nothing was sent.
    NotJoined,
    /// The backend reported a transmit failure.
    SendFailed,
    /// Payload exceeds the backend's frame limit.
    PayloadTooLarge,
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotJoined => write!(f, "session not joined"),
            Self::SendFailed => write!(f, "transmit failed"),
            Self::PayloadTooLarge => write!(f, "payload too large"),
        }
    }
}

impl From<PublishError> for Error {
    fn from(e: PublishError) -> Self {
        Self::Publish(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
