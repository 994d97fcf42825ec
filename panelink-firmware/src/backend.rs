//! Backend sink that forwards service calls to the bridge task

use defmt::*;

use panelink_core::link::ControllerMessage;
use panelink_core::{Backend, ServiceCall};

use crate::channels::LINK_OUTBOX;

/// Queues service calls on [`LINK_OUTBOX`]
///
/// Never blocks: a call that does not fit is dropped with a warning.
pub struct ChannelBackend;

impl Backend for ChannelBackend {
    fn call_service(&mut self, call: ServiceCall) {
        debug!("Service call: {=str}", call.service.as_str());
        if LINK_OUTBOX
            .try_send(ControllerMessage::CallService(call))
            .is_err()
        {
            warn!("Link outbox full, dropping service call");
        }
    }
}
