//! Page navigation state
//!
//! Index 0 holds the screensaver when one is configured. `Next` and
//! `Prev` cycle through `[start, len - 1]` and never land on it.

use alloc::string::String;

/// Where a navigation request wants to go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NavTarget {
    /// A specific page; ignored when out of range
    Index(usize),
    /// First page of the cycle
    Default,
    /// The screensaver, or the default page without one
    Ambient,
    Next,
    Prev,
}

/// Shape of the loaded page set as navigation sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBounds {
    pub len: usize,
    pub start: usize,
    pub has_ambient: bool,
}

impl NavTarget {
    /// Page index this target selects from `current`
    ///
    /// Returns `None` when the request must be ignored.
    pub fn resolve(self, current: Option<usize>, bounds: PageBounds) -> Option<usize> {
        if bounds.len == 0 {
            return None;
        }
        let last = bounds.len - 1;
        let start = bounds.start;
        let current = current.unwrap_or(start);

        let index = match self {
            NavTarget::Index(index) => index,
            NavTarget::Default => start,
            NavTarget::Ambient => {
                if bounds.has_ambient {
                    0
                } else {
                    start
                }
            }
            NavTarget::Next => {
                if current >= last {
                    start
                } else {
                    current + 1
                }
            }
            NavTarget::Prev => {
                if current <= start {
                    last
                } else {
                    current - 1
                }
            }
        };

        (index <= last).then_some(index)
    }
}

/// Current page, open popup and pending redraw
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavState {
    page: Option<usize>,
    popup: Option<String>,
    force_update: bool,
}

impl NavState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the page on screen, if any has been shown
    pub fn page(&self) -> Option<usize> {
        self.page
    }

    /// Switch page; closes any popup and drops a pending redraw
    pub fn set_page(&mut self, index: usize) {
        self.page = Some(index);
        self.popup = None;
        self.force_update = false;
    }

    /// Item uuid of the open popup
    pub fn popup(&self) -> Option<&str> {
        self.popup.as_deref()
    }

    pub fn open_popup(&mut self, uuid: &str) {
        match &mut self.popup {
            Some(current) => {
                current.clear();
                current.push_str(uuid);
            }
            None => self.popup = Some(String::from(uuid)),
        }
    }

    pub fn close_popup(&mut self) {
        self.popup = None;
    }

    pub fn is_update_pending(&self) -> bool {
        self.force_update
    }

    /// Mark the page or popup for a redraw on the next tick
    pub fn request_update(&mut self) {
        self.force_update = true;
    }

    /// Consume the redraw request
    pub fn take_update(&mut self) -> bool {
        core::mem::take(&mut self.force_update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WITH_AMBIENT: PageBounds = PageBounds {
        len: 4,
        start: 1,
        has_ambient: true,
    };

    const WITHOUT_AMBIENT: PageBounds = PageBounds {
        len: 3,
        start: 0,
        has_ambient: false,
    };

    #[test]
    fn test_next_wraps_to_start() {
        assert_eq!(NavTarget::Next.resolve(Some(3), WITH_AMBIENT), Some(1));
        assert_eq!(NavTarget::Next.resolve(Some(1), WITH_AMBIENT), Some(2));
        assert_eq!(NavTarget::Next.resolve(Some(0), WITH_AMBIENT), Some(1));
    }

    #[test]
    fn test_prev_wraps_to_last() {
        assert_eq!(NavTarget::Prev.resolve(Some(1), WITH_AMBIENT), Some(3));
        assert_eq!(NavTarget::Prev.resolve(Some(0), WITH_AMBIENT), Some(3));
        assert_eq!(NavTarget::Prev.resolve(Some(3), WITH_AMBIENT), Some(2));
    }

    #[test]
    fn test_cycle_never_visits_ambient() {
        let mut index = Some(1);
        for _ in 0..10 {
            index = NavTarget::Next.resolve(index, WITH_AMBIENT);
            assert_ne!(index, Some(0));
        }
        for _ in 0..10 {
            index = NavTarget::Prev.resolve(index, WITH_AMBIENT);
            assert_ne!(index, Some(0));
        }
    }

    #[test]
    fn test_ambient_and_default() {
        assert_eq!(NavTarget::Ambient.resolve(Some(2), WITH_AMBIENT), Some(0));
        assert_eq!(NavTarget::Ambient.resolve(Some(2), WITHOUT_AMBIENT), Some(0));
        assert_eq!(NavTarget::Default.resolve(Some(2), WITH_AMBIENT), Some(1));
        assert_eq!(NavTarget::Default.resolve(None, WITHOUT_AMBIENT), Some(0));
    }

    #[test]
    fn test_index_out_of_range_ignored() {
        assert_eq!(NavTarget::Index(3).resolve(Some(1), WITH_AMBIENT), Some(3));
        assert_eq!(NavTarget::Index(4).resolve(Some(1), WITH_AMBIENT), None);
    }

    #[test]
    fn test_empty_or_screensaver_only() {
        let empty = PageBounds {
            len: 0,
            start: 0,
            has_ambient: false,
        };
        assert_eq!(NavTarget::Default.resolve(None, empty), None);

        let only_ambient = PageBounds {
            len: 1,
            start: 1,
            has_ambient: true,
        };
        assert_eq!(NavTarget::Default.resolve(None, only_ambient), None);
        assert_eq!(NavTarget::Ambient.resolve(None, only_ambient), Some(0));
    }

    #[test]
    fn test_set_page_clears_popup_and_update() {
        let mut state = NavState::new();
        state.set_page(1);
        state.open_popup("abc");
        state.request_update();

        state.set_page(2);
        assert_eq!(state.page(), Some(2));
        assert_eq!(state.popup(), None);
        assert!(!state.is_update_pending());
    }

    #[test]
    fn test_take_update_consumes() {
        let mut state = NavState::new();
        state.request_update();
        assert!(state.take_update());
        assert!(!state.take_update());
    }
}
