//! Seams to the parts of the system the controller does not own
//!
//! The backend transport and the page content layout are supplied by the
//! caller; the controller only decides when to call them.

pub mod backend;
pub mod renderer;

pub use backend::{Backend, ServiceCall};
pub use renderer::PageRenderer;
