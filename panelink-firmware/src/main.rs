//! Panelink - Touch Panel Controller Firmware
//!
//! Main firmware binary for RP2040 boards wired between an NSPanel-style
//! touch display (UART0) and a home-automation bridge (UART1).

#![no_std]
#![no_main]

extern crate alloc;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::{UART0, UART1};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embedded_alloc::LlffHeap as Heap;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use panelink_core::{EntityStore, Page, PageKind, PageSet, PanelConfig};

use crate::config::{parse_config, PanelSetup};

// Heap allocator for pages, entities and the command queue
#[global_allocator]
static HEAP: Heap = Heap::empty();

// Heap size: 64KB
const HEAP_SIZE: usize = 64 * 1024;

/// Embedded panel configuration (compiled into firmware)
/// Edit panel.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../panel.toml");

mod backend;
mod channels;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    UART1_IRQ => BufferedInterruptHandler<UART1>;
});

// Static cells for UART buffers (must live forever)
static PANEL_TX_BUF: StaticCell<[u8; 512]> = StaticCell::new();
static PANEL_RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static LINK_TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static LINK_RX_BUF: StaticCell<[u8; 512]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Panelink firmware starting...");

    // Initialize heap allocator
    init_heap();

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let setup = load_config();
    let tick_interval_ms = setup.config.timing.tick_interval_ms;
    info!("Configuration loaded");

    // Panel UART: 115200 baud default
    let panel_tx_buf = PANEL_TX_BUF.init([0u8; 512]);
    let panel_rx_buf = PANEL_RX_BUF.init([0u8; 256]);
    let panel_uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, UartConfig::default());
    let panel_uart = panel_uart.into_buffered::<UART0>(Irqs, panel_tx_buf, panel_rx_buf);
    let (panel_tx, panel_rx) = panel_uart.split();

    info!("UART0 initialized for panel communication");

    // Bridge UART
    // Pin assignment is board-specific (GPIO4 TX, GPIO5 RX)
    let link_uart_config = {
        let mut cfg = UartConfig::default();
        cfg.baudrate = 115200;
        cfg
    };
    let link_tx_buf = LINK_TX_BUF.init([0u8; 256]);
    let link_rx_buf = LINK_RX_BUF.init([0u8; 512]);
    let link_uart = Uart::new_blocking(p.UART1, p.PIN_4, p.PIN_5, link_uart_config);
    let link_uart = link_uart.into_buffered::<UART1>(Irqs, link_tx_buf, link_rx_buf);
    let (link_tx, link_rx) = link_uart.split();

    info!("UART1 initialized for backend bridge");

    // Spawn tasks
    spawner.spawn(tasks::tick_task(tick_interval_ms)).unwrap();
    spawner.spawn(tasks::panel_rx_task(panel_rx)).unwrap();
    spawner.spawn(tasks::panel_tx_task(panel_tx)).unwrap();
    spawner.spawn(tasks::backend_rx_task(link_rx)).unwrap();
    spawner.spawn(tasks::backend_tx_task(link_tx)).unwrap();
    spawner.spawn(tasks::controller_task(setup)).unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Initialize the heap allocator
fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}

/// Parse the panel.toml file that was embedded at compile time
fn load_config() -> PanelSetup {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(setup) => {
            info!("Parsed embedded configuration successfully");
            setup
        }
        Err(e) => {
            // build.rs validates panel.toml, so this only happens when the
            // validator and the parser disagree
            error!("Failed to parse embedded config: {:?}", defmt::Debug2Format(&e));
            error!("Using minimal fallback configuration");
            create_minimal_fallback_config()
        }
    }
}

/// Defaults with a lone screensaver page
fn create_minimal_fallback_config() -> PanelSetup {
    let pages = alloc::vec![Page::new("screensaver", PageKind::Screensaver)];
    PanelSetup {
        config: PanelConfig::default(),
        entities: EntityStore::new(),
        pages: PageSet::new(pages),
    }
}
