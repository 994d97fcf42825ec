//! Page content rendering

use alloc::string::String;

use crate::entity::{EntityHandle, EntityStore};
use crate::page::Page;

/// Produces the content commands for a page
///
/// Each method writes exactly one command into `out`, which arrives empty.
pub trait PageRenderer {
    /// Write the item update for every item on `page`
    fn render(&self, page: &Page, entities: &EntityStore, out: &mut String);

    /// Whether a change to `entity` should redraw the screensaver
    fn is_status_relevant(&self, page: &Page, entities: &EntityStore, entity: EntityHandle) -> bool;

    /// Write the screensaver status icons
    ///
    /// Returns `false` when there is nothing to send.
    fn render_status_update(&self, page: &Page, entities: &EntityStore, out: &mut String) -> bool;
}
