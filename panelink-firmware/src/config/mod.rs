//! Configuration loading and parsing
//!
//! The panel layout is compiled in from `panel.toml` and parsed at boot
//! by a small no_std TOML subset parser.

pub mod toml;

pub use toml::{parse_config, ParseError, PanelSetup};
