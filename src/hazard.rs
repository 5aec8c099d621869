//! Hazard classification.
//!
//! Pure threshold comparison, re-evaluated from scratch every tick. There
//! is deliberately no hysteresis: readings near a threshold can chatter,
//! and callers needing debounce must layer it on top.

/// Derived classification of one tick's readings. Recomputed per tick,
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardState {
    None,
    GasOnly,
    FireOnly,
    Both,
}

/// Classify one tick. Each channel is compared independently (strict
/// greater-than), then the pair is combined.
pub fn evaluate(flame_pct: f32, gas_pct: f32, flame_threshold: f32, gas_threshold: f32) -> HazardState {
    let fire = flame_pct > flame_threshold;
    let gas = gas_pct > gas_threshold;
    match (fire, gas) {
        (false, false) => HazardState::None,
        (false, true) => HazardState::GasOnly,
        (true, false) => HazardState::FireOnly,
        (true, true) => HazardState::Both,
    }
}

impl HazardState {
    /// The buzzer sounds for any hazard.
    pub fn alarm_desired(self) -> bool {
        self != Self::None
    }

    /// The pump runs only when fire is present.
    pub fn pump_desired(self) -> bool {
        matches!(self, Self::FireOnly | Self::Both)
    }

    pub fn fire(self) -> bool {
        matches!(self, Self::FireOnly | Self::Both)
    }

    pub fn gas(self) -> bool {
        matches!(self, Self::GasOnly | Self::Both)
    }
}
