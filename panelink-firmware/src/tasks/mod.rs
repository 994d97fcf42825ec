//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod backend_link;
pub mod controller;
pub mod panel_rx;
pub mod panel_tx;
pub mod tick;

pub use backend_link::{backend_rx_task, backend_tx_task};
pub use controller::controller_task;
pub use panel_rx::panel_rx_task;
pub use panel_tx::panel_tx_task;
pub use tick::tick_task;
