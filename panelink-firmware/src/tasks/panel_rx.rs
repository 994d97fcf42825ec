//! Panel UART receive task
//!
//! Reassembles frames from the touch panel and hands their payloads to
//! the controller.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use panelink_protocol::FrameDecoder;

use crate::channels::PANEL_PAYLOADS;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Panel RX task - receives and decodes frames from the panel
#[embassy_executor::task]
pub async fn panel_rx_task(mut rx: BufferedUartRx) {
    info!("Panel RX task started");

    let mut decoder = FrameDecoder::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for result in decoder.feed_bytes(&buf[..n]) {
                    match result {
                        Ok(payload) => {
                            if PANEL_PAYLOADS.try_send(payload).is_err() {
                                warn!("Panel channel full, dropping message");
                            }
                        }
                        Err(e) => {
                            warn!("Frame decode error: {:?}", e);
                        }
                    }
                }
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}
