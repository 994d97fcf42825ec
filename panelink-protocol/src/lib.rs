//! Touch Panel Communication Protocol
//!
//! This crate defines the UART protocol between the controller and the
//! Lovelace touch panel. The panel is a thin terminal: it reports button
//! presses and page events, and draws whatever command strings it receives.
//!
//! # Protocol Overview
//!
//! Every message travels in the same binary envelope:
//! ```text
//! ┌──────┬──────┬────────┬─────────────┬──────────┐
//! │ 0x55 │ 0xBB │ LENGTH │ PAYLOAD     │ CRC-16   │
//! │ 1B   │ 1B   │ 2B LE  │ 0–65535B    │ 2B LE    │
//! └──────┴──────┴────────┴─────────────┴──────────┘
//! ```
//!
//! Payloads are ASCII text. Inbound payloads are comma separated and start
//! with `event`; outbound payloads are `~` separated commands such as
//! `pageType~cardEntities`.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod command;
pub mod crc;
pub mod frame;
pub mod message;

pub use command::{CommandWriter, SEPARATOR};
pub use crc::crc16;
pub use frame::{encode, Decoded, FrameDecoder, FrameError, HEADER1, HEADER2};
pub use message::{AlarmAction, ButtonType, MessageError, PanelEvent, TimerAction};
