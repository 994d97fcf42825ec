//! Board-agnostic controller logic for the Lovelace touch panel
//!
//! This crate contains everything that does not touch a UART or a timer:
//!
//! - Entity store with debounced change propagation
//! - Page model, navigation state machine and detail popups
//! - Button press dispatch and slider deduplication
//! - Rate limited outbound command scheduler
//! - Configuration type definitions
//! - Backend and renderer traits

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

// Must come first so the logging macros are visible to every module
mod fmt;

pub mod clock;
pub mod color;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod detail;
pub mod dispatch;
pub mod entity;
pub mod error;
#[cfg(feature = "serde")]
pub mod link;
pub mod nav;
pub mod page;
pub mod scheduler;
pub mod traits;

pub use config::{DisplayConfig, PanelConfig, TimingConfig};
pub use controller::{Controller, Stats, TimerKey};
pub use entity::{EntityHandle, EntityKind, EntityStore};
pub use error::CoreError;
pub use nav::NavTarget;
pub use page::{LovelaceRenderer, Page, PageItem, PageKind, PageSet};
pub use traits::{Backend, PageRenderer, ServiceCall};
