//! Grove LoRa-E5 radio module adapter (AT commands over UART).
//!
//! Implements [`LorawanMac`] against the module's AT command set: keys
//! are pushed with `AT+ID`/`AT+KEY`, OTAA via `AT+JOIN`, uplinks via
//! `AT+MSGHEX` (`AT+CMSGHEX` when confirmed). ESP-IDF only — host tests
//! use the scripted sim MAC instead.

use core::fmt::Write;

use esp_idf_hal::delay::TickType;
use esp_idf_hal::uart::UartDriver;
use log::{debug, warn};

use crate::transport::lora::{LorawanMac, MacError};

const RESP_TIMEOUT_MS: u32 = 10_000;
const JOIN_TIMEOUT_MS: u32 = 30_000;

pub struct LoraE5Mac<'d> {
    uart: UartDriver<'d>,
}

impl<'d> LoraE5Mac<'d> {
    pub fn new(uart: UartDriver<'d>) -> Self {
        Self { uart }
    }

    /// Send one command line and wait until `expect` appears in the
    /// response (or the timeout passes).
    fn command(&mut self, cmd: &str, expect: &str, timeout_ms: u32) -> Result<(), MacError> {
        debug!("LoRa-E5 > {cmd}");
        self.uart.write(cmd.as_bytes()).map_err(|_| MacError::Busy)?;
        self.uart.write(b"\r\n").map_err(|_| MacError::Busy)?;

        let mut resp: heapless::String<256> = heapless::String::new();
        let mut buf = [0u8; 64];
        let mut waited_ms = 0u32;
        while waited_ms < timeout_ms {
            let n = self
                .uart
                .read(&mut buf, TickType::new_millis(100).ticks())
                .unwrap_or(0);
            waited_ms += 100;
            for &b in &buf[..n] {
                let _ = resp.push(b as char);
            }
            if resp.contains(expect) {
                debug!("LoRa-E5 < {}", resp.trim());
                return Ok(());
            }
        }
        warn!("LoRa-E5: no '{expect}' within {timeout_ms}ms ({})", resp.trim());
        Err(MacError::Busy)
    }

    fn hex_of(bytes: &[u8]) -> heapless::String<64> {
        let mut out = heapless::String::new();
        for b in bytes {
            let _ = write!(out, "{b:02X}");
        }
        out
    }
}

impl LorawanMac for LoraE5Mac<'_> {
    fn join_otaa(
        &mut self,
        deveui: &[u8; 8],
        appeui: &[u8; 8],
        appkey: &[u8; 16],
    ) -> Result<(), MacError> {
        let mut cmd: heapless::String<96> = heapless::String::new();

        let _ = write!(cmd, "AT+ID=DevEui,\"{}\"", Self::hex_of(deveui));
        self.command(&cmd, "+ID", RESP_TIMEOUT_MS)?;

        cmd.clear();
        let _ = write!(cmd, "AT+ID=AppEui,\"{}\"", Self::hex_of(appeui));
        self.command(&cmd, "+ID", RESP_TIMEOUT_MS)?;

        cmd.clear();
        let _ = write!(cmd, "AT+KEY=APPKEY,\"{}\"", Self::hex_of(appkey));
        self.command(&cmd, "+KEY", RESP_TIMEOUT_MS)?;

        self.command("AT+MODE=LWOTAA", "+MODE", RESP_TIMEOUT_MS)?;
        self.command("AT+DR=DR5", "+DR", RESP_TIMEOUT_MS)?;

        self.command("AT+JOIN", "Network joined", JOIN_TIMEOUT_MS)
            .map_err(|_| MacError::JoinFailed)
    }

    fn send(&mut self, _port: u8, payload: &[u8], confirmed: bool) -> Result<(), MacError> {
        let mut cmd: heapless::String<512> = heapless::String::new();
        let verb = if confirmed { "AT+CMSGHEX" } else { "AT+MSGHEX" };
        let _ = write!(cmd, "{verb}=\"{}\"", {
            let mut hex: heapless::String<448> = heapless::String::new();
            for b in payload {
                let _ = write!(hex, "{b:02X}");
            }
            hex
        });
        self.command(&cmd, "Done", RESP_TIMEOUT_MS)
            .map_err(|_| MacError::TxFailed)
    }
}
