//! UNIT1 Tapper Firmware
//!
//! Main firmware binary for RP2040-based tapper boards. A single embassy
//! task owns the orchestrator and polls it; all command handling happens
//! in `tapper-core`.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as RpUartConfig, Uart};
use embassy_time::{Delay, Instant, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use tapper_core::config::{parse_config, TapperConfig};
use tapper_core::Orchestrator;
use tapper_drivers::serial::SerialChannel;
use tapper_drivers::stepper::{StepDirActuator, StepDirConfig, StepDirPins};

/// Embedded configuration (compiled into firmware)
/// Edit unit1.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../unit1.toml");

/// Pause between loop passes
const POLL_INTERVAL_MS: u64 = 1;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("UNIT1 tapper firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();

    // Host link on UART0 (GPIO0 TX, GPIO1 RX)
    let mut uart_config = RpUartConfig::default();
    uart_config.baudrate = config.serial.baudrate;

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let channel = SerialChannel::new(uart, config.serial.baudrate);

    // Step/dir carrier
    // Pin assignments are board-specific (SKR Pico: STEP=GPIO11, DIR=GPIO10, ENABLE=GPIO12)
    let pins = StepDirPins {
        step: Output::new(p.PIN_11, Level::Low),
        dir: Output::new(p.PIN_10, Level::Low),
        enable: Output::new(p.PIN_12, Level::High),
        ms1: Output::new(p.PIN_13, Level::Low),
        ms2: Output::new(p.PIN_14, Level::Low),
        ms3: Output::new(p.PIN_15, Level::Low),
    };
    let actuator = StepDirActuator::new(pins, Delay, StepDirConfig::default());

    let mut tapper = match Orchestrator::new(actuator, channel, config) {
        Ok(tapper) => tapper,
        Err(e) => {
            error!("Invalid motor configuration: {:?}", e);
            halt().await
        }
    };

    if let Err(e) = tapper.initialize(now_ms()) {
        error!("Initialization failed: {:?}", e);
        halt().await
    }
    info!(
        "Tapper ready at {} baud, heartbeat every {} ms",
        tapper.config().serial.baudrate,
        tapper.config().heartbeat.interval_ms
    );

    loop {
        let report = tapper.run_once_with(now_ms(), |command, event| {
            debug!("{} -> {}", command, event.as_str());
        });

        if let Some(e) = report.last_decode_error {
            warn!("Discarded {} frame(s), last: {:?}", report.decode_errors, e);
        }
        if report.transport_faults > 0 {
            warn!(
                "Lost {} outbound message(s), {} since boot",
                report.transport_faults,
                tapper.transport_faults()
            );
        }
        if report.heartbeat {
            trace!("Heartbeat, arm at {} steps", tapper.arm_position());
        }

        Timer::after_millis(POLL_INTERVAL_MS).await;
    }
}

/// Milliseconds since boot, wrapping after ~49 days
fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}

/// Parse the embedded configuration, falling back to defaults
fn load_config() -> TapperConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            // build.rs validates unit1.toml, so this means the two disagree
            warn!(
                "Embedded config rejected at line {}: {:?}, using defaults",
                e.line, e.kind
            );
            TapperConfig::default()
        }
    }
}

/// Park the main task after a fatal error
async fn halt() -> ! {
    loop {
        Timer::after_secs(60).await;
    }
}
