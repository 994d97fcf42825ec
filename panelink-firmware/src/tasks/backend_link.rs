//! Backend bridge UART tasks
//!
//! The bridge exchanges postcard messages wrapped in the panel's frame
//! envelope. Entity updates and time syncs flow in; service calls and
//! subscriptions flow out.

use defmt::*;
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embedded_io_async::{Read, Write};

use panelink_core::link::{self, BackendMessage};
use panelink_protocol::FrameDecoder;

use crate::channels::{BACKEND_MESSAGES, LINK_OUTBOX};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Backend RX task - decodes messages from the bridge
#[embassy_executor::task]
pub async fn backend_rx_task(mut rx: BufferedUartRx) {
    info!("Backend RX task started");

    let mut decoder = FrameDecoder::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                for result in decoder.feed_bytes(&buf[..n]) {
                    let payload = match result {
                        Ok(payload) => payload,
                        Err(e) => {
                            warn!("Link frame error: {:?}", e);
                            continue;
                        }
                    };
                    match link::decode::<BackendMessage>(&payload) {
                        Ok(message) => {
                            if BACKEND_MESSAGES.try_send(message).is_err() {
                                warn!("Backend channel full, dropping message");
                            }
                        }
                        Err(e) => warn!("Link decode error: {:?}", e),
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

/// Backend TX task - encodes queued messages for the bridge
#[embassy_executor::task]
pub async fn backend_tx_task(mut tx: BufferedUartTx) {
    info!("Backend TX task started");

    loop {
        let message = LINK_OUTBOX.receive().await;
        let bytes = match link::encode(&message) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Link encode error: {:?}", e);
                continue;
            }
        };
        if let Err(e) = tx.write_all(&bytes).await {
            warn!("Failed to send link message: {:?}", e);
        }
    }
}
