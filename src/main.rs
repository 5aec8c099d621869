//! FLAMEX firmware — ESP-IDF entry point.
//!
//! Boot sequence: logger → peripheral init (the only fatal failure path)
//! → actuator tasks spawned Idle → startup connect → control loop. The
//! three tasks share one cooperative executor on the main core:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  edge_executor::LocalExecutor                        │
//! │                                                      │
//! │  ┌─────────────┐  ┌────────────┐  ┌──────────────┐   │
//! │  │ alarm task  │  │ pump task  │  │ control loop │   │
//! │  │ (wake-on-   │  │ (wake-on-  │  │ (fixed       │   │
//! │  │  signal)    │  │  signal)   │  │  period)     │   │
//! │  └─────────────┘  └────────────┘  └──────────────┘   │
//! └──────────────────────────────────────────────────────┘
//! ```

use anyhow::Result;
use log::{error, info};

use flamex::actuator::{ActuatorControl, ActuatorTask, DutyCycle, Polarity};
use flamex::adapters::hardware::{self, EspAdcInput};
use flamex::adapters::log_sink::LogStatusSink;
use flamex::config::NodeConfig;
use flamex::control::ControlLoop;
use flamex::pins;
use flamex::sensors::SensorSampler;
use flamex::transport::Delivery;

// Desire flag + wake signal per actuator. The control loop is the only
// writer; each task is the only consumer of its own signal.
static ALARM_CTL: ActuatorControl = ActuatorControl::new();
static PUMP_CTL: ActuatorControl = ActuatorControl::new();

fn main() -> Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!(
        "FLAMEX v{} — fire/gas detection node",
        env!("CARGO_PKG_VERSION")
    );

    let config = NodeConfig::default();

    // Peripheral init failure is critical — log and halt.
    // In production this triggers the watchdog reset after timeout.
    if let Err(e) = hardware::init_adc() {
        error!("hw_init failed: {e} — halting");
        #[allow(clippy::empty_loop)]
        loop {}
    }

    let peripherals = esp_idf_hal::peripherals::Peripherals::take()?;
    let buzzer = esp_idf_hal::gpio::PinDriver::output(peripherals.pins.gpio23)?;
    let mut relay = esp_idf_hal::gpio::PinDriver::output(peripherals.pins.gpio12)?;
    // Active-low relay: deasserted (pump off) from the first instant.
    relay.set_high()?;
    info!("hw_init: buzzer and pump relay configured");

    let sampler = SensorSampler::new(
        EspAdcInput::new(pins::FLAME_ADC_LINE),
        EspAdcInput::new(pins::GAS_ADC_LINE),
        config.adc_max_raw,
    );

    // Backend selection is a build-time choice; the loop is identical.
    #[cfg(not(feature = "transport-lora"))]
    let (session, delivery) = (
        flamex::transport::mqtt::MqttSession::new(config.mqtt.clone()),
        Delivery::ExactlyOnce,
    );
    #[cfg(feature = "transport-lora")]
    let (session, delivery) = {
        let uart = esp_idf_hal::uart::UartDriver::new(
            peripherals.uart1,
            peripherals.pins.gpio17,
            peripherals.pins.gpio18,
            Option::<esp_idf_hal::gpio::Gpio0>::None,
            Option::<esp_idf_hal::gpio::Gpio0>::None,
            &esp_idf_hal::uart::config::Config::new()
                .baudrate(esp_idf_hal::units::Hertz(9600)),
        )?;
        (
            flamex::transport::lora::LoraSession::new(
                flamex::adapters::lora_e5::LoraE5Mac::new(uart),
                config.lora.clone(),
            ),
            Delivery::AtMostOnce,
        )
    };

    let alarm_task = ActuatorTask::new(
        &ALARM_CTL,
        buzzer,
        DutyCycle::from_millis(config.alarm_on_ms, config.alarm_off_ms),
        Polarity::ActiveHigh,
        "alarm",
    );
    let pump_task = ActuatorTask::new(
        &PUMP_CTL,
        relay,
        DutyCycle::from_millis(config.pump_on_ms, config.pump_off_ms),
        Polarity::ActiveLow,
        "pump",
    );

    let mut control = ControlLoop::new(
        sampler,
        session,
        LogStatusSink::new(),
        &ALARM_CTL,
        &PUMP_CTL,
        config,
        delivery,
    );

    let executor: edge_executor::LocalExecutor<'_, 4> = edge_executor::LocalExecutor::new();
    executor.spawn(alarm_task.run()).detach();
    executor.spawn(pump_task.run()).detach();
    executor
        .spawn(async move { control.run().await })
        .detach();

    info!("node ready, entering control loop");
    futures_lite::future::block_on(executor.run(core::future::pending::<()>()));
    Ok(())
}
