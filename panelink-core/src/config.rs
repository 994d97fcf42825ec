//! Configuration type definitions
//!
//! Read-only inputs to the controller. The firmware fills these from its
//! embedded configuration; everything has a working default.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Highest brightness the panel accepts
pub const MAX_DIM: u8 = 100;

/// Display brightness settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// Brightness while the panel is in use (0-100)
    pub active_dim: u8,
    /// Brightness on the screensaver (0-100, below `active_dim`)
    pub inactive_dim: u8,
    /// Background colour code sent with `dimmode`
    pub background: u16,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            active_dim: 100,
            inactive_dim: 10,
            background: 6371,
        }
    }
}

/// Timing of the drive loop, debouncing and popups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimingConfig {
    /// Minimum gap between two transmitted commands
    pub command_cooldown_ms: u32,
    /// Delay for entity update and button press debouncing
    pub debounce_ms: u32,
    /// Drive tick period
    pub tick_interval_ms: u32,
    /// Panel timeout while a light popup is open
    pub light_popup_timeout_s: u16,
    /// Panel timeout while a timer popup is open
    pub timer_popup_timeout_s: u16,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            command_cooldown_ms: 75,
            debounce_ms: 200,
            tick_interval_ms: 10,
            light_popup_timeout_s: 10,
            timer_popup_timeout_s: 30,
        }
    }
}

/// Complete controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PanelConfig {
    pub display: DisplayConfig,
    pub timing: TimingConfig,
}

impl DisplayConfig {
    /// Clamp the levels into a range the panel can show
    ///
    /// `active_dim` is capped at [`MAX_DIM`]; an `inactive_dim` that is not
    /// below `active_dim` becomes `active_dim - 1`.
    pub fn corrected(self) -> Self {
        let active_dim = self.active_dim.min(MAX_DIM);
        let inactive_dim = if self.inactive_dim >= active_dim {
            active_dim.saturating_sub(1)
        } else {
            self.inactive_dim
        };
        Self {
            active_dim,
            inactive_dim,
            background: self.background,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PanelConfig::default();
        assert_eq!(config.display.active_dim, 100);
        assert_eq!(config.display.inactive_dim, 10);
        assert_eq!(config.timing.debounce_ms, 200);
        assert_eq!(config.timing.command_cooldown_ms, 75);
    }

    #[test]
    fn test_corrected_keeps_valid_levels() {
        let display = DisplayConfig {
            active_dim: 80,
            inactive_dim: 20,
            background: 0,
        };
        assert_eq!(display.corrected(), display);
    }

    #[test]
    fn test_corrected_clamps_active() {
        let display = DisplayConfig {
            active_dim: 150,
            inactive_dim: 20,
            background: 0,
        }
        .corrected();
        assert_eq!(display.active_dim, 100);
        assert_eq!(display.inactive_dim, 20);
    }

    #[test]
    fn test_corrected_inactive_below_active() {
        let display = DisplayConfig {
            active_dim: 50,
            inactive_dim: 50,
            background: 0,
        }
        .corrected();
        assert_eq!(display.inactive_dim, 49);

        let display = DisplayConfig {
            active_dim: 0,
            inactive_dim: 5,
            background: 0,
        }
        .corrected();
        assert_eq!(display.inactive_dim, 0);
    }
}
