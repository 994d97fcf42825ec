//! Messages exchanged with the backend bridge
//!
//! The bridge carries postcard encoded messages inside the same CRC frame
//! envelope the panel uses.

use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use panelink_protocol::frame;

use crate::traits::ServiceCall;

/// Backend → Controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendMessage {
    /// State (attribute `state`) or attribute change
    EntityUpdate {
        entity_id: String,
        attribute: String,
        value: String,
    },
    /// Wall clock in seconds since the Unix epoch
    TimeSync { epoch_seconds: i64 },
}

/// Controller → Backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerMessage {
    CallService(ServiceCall),
    /// Ask the backend to push `attribute` of `entity_id`
    Subscribe { entity_id: String, attribute: String },
}

/// Errors from the bridge codec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    Frame(frame::FrameError),
    Serialization,
}

impl From<frame::FrameError> for LinkError {
    fn from(e: frame::FrameError) -> Self {
        LinkError::Frame(e)
    }
}

/// Serialize and frame a message
pub fn encode<T: Serialize>(message: &T) -> Result<Vec<u8>, LinkError> {
    let payload = postcard::to_allocvec(message).map_err(|_| LinkError::Serialization)?;
    Ok(frame::encode(&payload)?)
}

/// Deserialize a frame payload
pub fn decode<'a, T: Deserialize<'a>>(payload: &'a [u8]) -> Result<T, LinkError> {
    postcard::from_bytes(payload).map_err(|_| LinkError::Serialization)
}
