//! Adapters binding the control core to the outside world.

pub mod hardware;
pub mod log_sink;
#[cfg(target_os = "espidf")]
pub mod lora_e5;
