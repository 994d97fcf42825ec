//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use alloc::vec::Vec;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use panelink_core::link::{BackendMessage, ControllerMessage};

/// Channel capacity for decoded panel payloads
const PANEL_CHANNEL_SIZE: usize = 8;

/// Channel capacity for outbound panel frames
///
/// The scheduler releases at most one frame per tick, so a short queue
/// is enough to ride out a slow UART.
const FRAME_CHANNEL_SIZE: usize = 4;

/// Channel capacity for backend traffic in either direction
const LINK_CHANNEL_SIZE: usize = 16;

/// Payloads decoded from panel frames
pub static PANEL_PAYLOADS: Channel<CriticalSectionRawMutex, Vec<u8>, PANEL_CHANNEL_SIZE> =
    Channel::new();

/// Encoded frames waiting for the panel UART
pub static PANEL_FRAMES: Channel<CriticalSectionRawMutex, Vec<u8>, FRAME_CHANNEL_SIZE> =
    Channel::new();

/// Messages received from the backend bridge
pub static BACKEND_MESSAGES: Channel<CriticalSectionRawMutex, BackendMessage, LINK_CHANNEL_SIZE> =
    Channel::new();

/// Messages waiting for the backend bridge
pub static LINK_OUTBOX: Channel<CriticalSectionRawMutex, ControllerMessage, LINK_CHANNEL_SIZE> =
    Channel::new();
