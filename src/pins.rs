//! Pin and ADC-line assignments for the reference board.

/// IR flame sensor analog output.
pub const FLAME_ADC_LINE: u32 = 0;

/// MQ-2 gas sensor analog output.
pub const GAS_ADC_LINE: u32 = 2;

/// Piezo buzzer, driven active-high.
pub const BUZZER_GPIO: i32 = 23;

/// Water-pump relay coil, driven active-low (output low = pump running).
pub const PUMP_RELAY_GPIO: i32 = 12;
