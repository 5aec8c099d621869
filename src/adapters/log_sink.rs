//! Log-based status sink.
//!
//! Implements [`StatusSink`] by writing the per-tick status line to the
//! logger (UART / USB-CDC in production). An OLED adapter would implement
//! the same trait; the core does not care where the line lands.

use log::info;

use crate::ports::StatusSink;

pub struct LogStatusSink;

impl LogStatusSink {
    pub fn new() -> Self {
        Self
    }
}

impl StatusSink for LogStatusSink {
    fn show(&mut self, line: &str) {
        info!("STATUS | {line}");
    }
}
