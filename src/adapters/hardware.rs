//! ADC peripheral adapter.
//!
//! One-shot peripheral initialisation plus the [`AnalogInput`]
//! implementations the sampler reads through.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: raw oneshot-ADC sys calls against ADC1 (initialised once at
//! boot, read from the control-loop task only).
//! On host/test: reads come from per-line `AtomicU16`s so tests can inject
//! raw codes.

use crate::error::{Error, SensorReadError};
use crate::ports::AnalogInput;

#[cfg(target_os = "espidf")]
use crate::pins;
#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;
#[cfg(target_os = "espidf")]
use log::info;

// ── One-shot init ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// Configure the ADC unit and both sensor lines. Fatal on failure —
/// without sensors there is nothing to control.
#[cfg(target_os = "espidf")]
pub fn init_adc() -> Result<(), Error> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is written once here, before any task starts.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(Error::Init("ADC1 unit init failed"));
    }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    for line in [pins::FLAME_ADC_LINE, pins::GAS_ADC_LINE] {
        // SAFETY: handle written above; single-threaded boot path.
        let ret = unsafe { adc_oneshot_config_channel(ADC1_HANDLE, line, &chan_cfg) };
        if ret != ESP_OK as i32 {
            return Err(Error::Init("ADC channel config failed"));
        }
    }

    info!("hw_init: ADC1 configured (CH0=flame, CH2=gas)");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_adc() -> Result<(), Error> {
    log::info!("hw_init(sim): ADC init skipped");
    Ok(())
}

// ── AnalogInput: ESP-IDF ──────────────────────────────────────

/// One ADC1 line read through the oneshot API.
#[cfg(target_os = "espidf")]
pub struct EspAdcInput {
    line: u32,
}

#[cfg(target_os = "espidf")]
impl EspAdcInput {
    pub fn new(line: u32) -> Self {
        Self { line }
    }
}

#[cfg(target_os = "espidf")]
impl AnalogInput for EspAdcInput {
    fn read(&mut self) -> Result<u16, SensorReadError> {
        let mut raw: i32 = 0;
        // SAFETY: ADC1_HANDLE is written once during init_adc() before the
        // control-loop task starts; only that task calls read().
        let ret = unsafe { adc_oneshot_read(ADC1_HANDLE, self.line, &mut raw) };
        if ret != ESP_OK as i32 {
            return Err(SensorReadError::AdcReadFailed);
        }
        Ok(raw.max(0) as u16)
    }
}

// ── AnalogInput: host simulation ──────────────────────────────

#[cfg(not(target_os = "espidf"))]
mod sim {
    use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

    const SIM_LINES: usize = 8;

    static SIM_RAW: [AtomicU16; SIM_LINES] =
        [const { AtomicU16::new(0) }; SIM_LINES];
    static SIM_FAIL: [AtomicBool; SIM_LINES] =
        [const { AtomicBool::new(false) }; SIM_LINES];

    /// Inject a raw code for one ADC line.
    pub fn sim_set_adc(line: u32, raw: u16) {
        SIM_RAW[line as usize % SIM_LINES].store(raw, Ordering::Relaxed);
    }

    /// Force the next reads of one line to fail.
    pub fn sim_fail_adc(line: u32, fail: bool) {
        SIM_FAIL[line as usize % SIM_LINES].store(fail, Ordering::Relaxed);
    }

    pub(super) fn read(line: u32) -> (u16, bool) {
        let idx = line as usize % SIM_LINES;
        (
            SIM_RAW[idx].load(Ordering::Relaxed),
            SIM_FAIL[idx].load(Ordering::Relaxed),
        )
    }
}

#[cfg(not(target_os = "espidf"))]
pub use sim::{sim_fail_adc, sim_set_adc};

/// Host-side stand-in for one ADC line.
#[cfg(not(target_os = "espidf"))]
pub struct SimAdcInput {
    line: u32,
}

#[cfg(not(target_os = "espidf"))]
impl SimAdcInput {
    pub fn new(line: u32) -> Self {
        Self { line }
    }
}

#[cfg(not(target_os = "espidf"))]
impl AnalogInput for SimAdcInput {
    fn read(&mut self) -> Result<u16, SensorReadError> {
        let (raw, fail) = sim::read(self.line);
        if fail {
            return Err(SensorReadError::AdcReadFailed);
        }
        Ok(raw)
    }
}
