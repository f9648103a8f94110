//! duoseg - two-digit threshold display firmware
//!
//! Reads "NN TT" lines from the console UART, shows NN on an AiP1628
//! two-digit LED module and blinks it while NN exceeds the threshold TT.
//!
//! Board wiring (RP2040):
//! - UART0 TX/RX: GPIO0 / GPIO1
//! - Display STB / CLK / DIO: GPIO2 / GPIO3 / GPIO4

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{SpawnError, Spawner};
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUartTx, Uart};
use embassy_sync::mutex::Mutex;
use embassy_time::{Delay, Timer};
use portable_atomic::Ordering;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use duoseg_core::blink::BlinkScheduler;
use duoseg_core::config::{parse_config, DeviceConfig};
use duoseg_drivers::display::{Aip1628, Aip1628Config};
use duoseg_hal::Level;
use duoseg_hal_rp2040::uart::uart_config;
use duoseg_hal_rp2040::{ByteReader, RpOutput};

use crate::channels::{SharedDisplay, LINES_ACCEPTED, LINES_REJECTED};

/// Embedded configuration (compiled into firmware)
/// Edit display.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../display.toml");

mod channels;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();

static DISPLAY: StaticCell<SharedDisplay> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("duoseg firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();

    // Console UART
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 64]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config(&config.serial));
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized at {} baud", config.serial.baudrate);

    // Display bus, idle levels are driven again by init()
    info!("Initializing AiP1628...");
    let strobe = RpOutput::new(p.PIN_2, Level::High);
    let clock = RpOutput::new(p.PIN_3, Level::High);
    let data = RpOutput::new(p.PIN_4, Level::Low);

    let mut driver = Aip1628::new(
        strobe,
        clock,
        data,
        Delay,
        Aip1628Config::from_config(&config.timing, &config.display),
    );
    driver.init();
    driver.clear();

    let display: &'static SharedDisplay = DISPLAY.init(Mutex::new(driver));
    info!("Display initialized, brightness {}", config.display.brightness);

    let reader = ByteReader::new(rx, config.input.byte_timeout_ms);
    let scheduler = BlinkScheduler::from_config(&config.timing);

    if let Err(e) = spawn_tasks(&spawner, tx, display, reader, scheduler, &config) {
        error!("Failed to spawn tasks: {:?}", e);
        halt().await;
    }

    info!("Initialization complete, firmware running");

    loop {
        Timer::after_secs(60).await;
        trace!(
            "Main loop heartbeat: {} lines accepted, {} rejected",
            LINES_ACCEPTED.load(Ordering::Relaxed),
            LINES_REJECTED.load(Ordering::Relaxed)
        );
    }
}

fn spawn_tasks(
    spawner: &Spawner,
    tx: BufferedUartTx,
    display: &'static SharedDisplay,
    reader: ByteReader,
    scheduler: BlinkScheduler,
    config: &DeviceConfig,
) -> Result<(), SpawnError> {
    spawner.spawn(tasks::status_tx_task(tx))?;
    spawner.spawn(tasks::blink_task(display, scheduler))?;
    spawner.spawn(tasks::input_task(reader, display, config.input))?;
    Ok(())
}

/// Parse the embedded config, falling back to defaults
fn load_config() -> DeviceConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Loaded embedded configuration");
            config
        }
        Err(e) => {
            warn!("Invalid embedded configuration ({:?}), using defaults", e);
            DeviceConfig::default()
        }
    }
}

/// Park the main task forever after a fatal init failure
async fn halt() -> ! {
    loop {
        Timer::after_secs(1).await;
    }
}
