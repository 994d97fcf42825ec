//! Panel UART transmit task
//!
//! Writes frames released by the controller's scheduler.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use crate::channels::PANEL_FRAMES;

/// Panel TX task - sends frames to the panel
#[embassy_executor::task]
pub async fn panel_tx_task(mut tx: BufferedUartTx) {
    info!("Panel TX task started");

    loop {
        let frame = PANEL_FRAMES.receive().await;
        if let Err(e) = tx.write_all(&frame).await {
            warn!("Failed to send panel frame: {:?}", e);
        } else {
            trace!("TX: {} bytes", frame.len());
        }
    }
}
