//! Flame and gas channel sampling.
//!
//! Wraps two [`AnalogInput`] channels and maps their raw ADC codes to
//! calibrated percentages via a linear rescale. The snapshot produced here
//! is immutable and owned by the tick that created it — nothing downstream
//! holds onto it across ticks.

use crate::error::SensorReadError;
use crate::ports::{AnalogInput, SensorPort};

/// One calibrated snapshot of both channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub flame_raw: u16,
    pub flame_pct: f32,
    pub gas_raw: u16,
    pub gas_pct: f32,
}

/// Linear rescale of a raw ADC code into `[target_min, target_max]`.
///
/// Returns `target_min` at `raw = 0` and `target_max` at `raw = max_raw`,
/// monotonically in between. `max_raw` of zero yields `target_min` rather
/// than dividing by zero.
pub fn calibrate(raw: u16, max_raw: u16, target_max: f32, target_min: f32) -> f32 {
    if max_raw == 0 {
        return target_min;
    }
    let frac = f32::from(raw) / f32::from(max_raw);
    target_min + frac * (target_max - target_min)
}

/// Samples the flame and gas channels once per control tick.
pub struct SensorSampler<F, G> {
    flame: F,
    gas: G,
    max_raw: u16,
}

impl<F: AnalogInput, G: AnalogInput> SensorSampler<F, G> {
    pub fn new(flame: F, gas: G, max_raw: u16) -> Self {
        Self {
            flame,
            gas,
            max_raw,
        }
    }

    fn read_channel(input: &mut impl AnalogInput, max_raw: u16) -> Result<u16, SensorReadError> {
        let raw = input.read()?;
        if raw > max_raw {
            return Err(SensorReadError::OutOfRange);
        }
        Ok(raw)
    }
}

impl<F: AnalogInput, G: AnalogInput> SensorPort for SensorSampler<F, G> {
    fn sample(&mut self) -> Result<Reading, SensorReadError> {
        let flame_raw = Self::read_channel(&mut self.flame, self.max_raw)?;
        let gas_raw = Self::read_channel(&mut self.gas, self.max_raw)?;

        Ok(Reading {
            flame_raw,
            flame_pct: calibrate(flame_raw, self.max_raw, 100.0, 0.0),
            gas_raw,
            gas_pct: calibrate(gas_raw, self.max_raw, 100.0, 0.0),
        })
    }
}
