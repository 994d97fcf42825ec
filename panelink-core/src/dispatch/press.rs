//! Deduplication of repeated button presses
//!
//! Sliders report every step while dragged. The first press of a pair is
//! acted on immediately; repeats of the same `(id, type)` only store their
//! value and arm a single replay, which later acts once on the latest
//! value. A press for a different pair disarms the replay.

use alloc::string::String;

/// A press as received, kept for replay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Press {
    pub id: String,
    pub button: String,
    pub value: Option<String>,
}

/// What to do with an incoming press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressOutcome {
    /// Act now; disarm the replay timer first if `cancel_replay`
    Dispatch { cancel_replay: bool },
    /// Repeat of the current pair; arm the replay timer if `arm_replay`
    Swallow { arm_replay: bool },
}

/// Last seen press pair and replay state
#[derive(Debug, Clone, Default)]
pub struct PressTracker {
    last: Option<Press>,
    armed: bool,
}

impl PressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press from the panel
    pub fn observe(&mut self, id: &str, button: &str, value: Option<&str>) -> PressOutcome {
        if let Some(last) = &mut self.last {
            if last.id == id && last.button == button {
                last.value = value.map(String::from);
                let arm_replay = !self.armed;
                self.armed = true;
                return PressOutcome::Swallow { arm_replay };
            }
        }

        let cancel_replay = core::mem::take(&mut self.armed);
        self.last = Some(Press {
            id: String::from(id),
            button: String::from(button),
            value: value.map(String::from),
        });
        PressOutcome::Dispatch { cancel_replay }
    }

    /// Forget the last press and any pending replay
    pub fn reset(&mut self) {
        self.last = None;
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Disarm and return the press to replay
    pub fn replay(&mut self) -> Option<Press> {
        if !core::mem::take(&mut self.armed) {
            return None;
        }
        self.last.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_press_dispatches() {
        let mut tracker = PressTracker::new();
        assert_eq!(
            tracker.observe("light.a", "brightnessSlider", Some("10")),
            PressOutcome::Dispatch {
                cancel_replay: false
            }
        );
        assert!(!tracker.is_armed());
        assert_eq!(tracker.replay(), None);
    }

    #[test]
    fn test_repeats_arm_once_and_keep_latest_value() {
        let mut tracker = PressTracker::new();
        tracker.observe("light.a", "brightnessSlider", Some("10"));

        assert_eq!(
            tracker.observe("light.a", "brightnessSlider", Some("20")),
            PressOutcome::Swallow { arm_replay: true }
        );
        assert_eq!(
            tracker.observe("light.a", "brightnessSlider", Some("30")),
            PressOutcome::Swallow { arm_replay: false }
        );

        let press = tracker.replay().unwrap();
        assert_eq!(press.value.as_deref(), Some("30"));
        assert!(!tracker.is_armed());
        assert_eq!(tracker.replay(), None);
    }

    #[test]
    fn test_different_pair_cancels_replay() {
        let mut tracker = PressTracker::new();
        tracker.observe("light.a", "brightnessSlider", Some("10"));
        tracker.observe("light.a", "brightnessSlider", Some("20"));

        assert_eq!(
            tracker.observe("light.a", "colorTempSlider", Some("5")),
            PressOutcome::Dispatch {
                cancel_replay: true
            }
        );
        assert_eq!(tracker.replay(), None);
    }

    #[test]
    fn test_reset_disarms() {
        let mut tracker = PressTracker::new();
        tracker.observe("light.a", "brightnessSlider", Some("10"));
        tracker.observe("light.a", "brightnessSlider", Some("20"));
        assert!(tracker.is_armed());

        tracker.reset();
        assert!(!tracker.is_armed());
        assert_eq!(tracker.replay(), None);
        assert_eq!(
            tracker.observe("light.a", "brightnessSlider", Some("30")),
            PressOutcome::Dispatch {
                cancel_replay: false
            }
        );
    }
}
