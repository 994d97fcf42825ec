//! Home automation backend interface

use alloc::collections::BTreeMap;
use alloc::string::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::entity::attr;

/// One fire-and-forget service invocation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ServiceCall {
    /// `<domain>.<action>`, e.g. `light.turn_on`
    pub service: String,
    pub data: BTreeMap<String, String>,
    /// Values the backend evaluates as templates
    pub data_template: BTreeMap<String, String>,
}

impl ServiceCall {
    pub fn new(service: &str) -> Self {
        Self {
            service: String::from(service),
            ..Self::default()
        }
    }

    /// `<domain>.<action>` targeting `entity_id`
    pub fn for_entity(domain: &str, action: &str, entity_id: &str) -> Self {
        let mut service = String::with_capacity(domain.len() + action.len() + 1);
        service.push_str(domain);
        service.push('.');
        service.push_str(action);
        Self {
            service,
            ..Self::default()
        }
        .with_data(attr::ENTITY_ID, entity_id)
    }

    pub fn with_data(mut self, key: &str, value: &str) -> Self {
        self.data.insert(String::from(key), String::from(value));
        self
    }

    pub fn with_template(mut self, key: &str, value: &str) -> Self {
        self.data_template
            .insert(String::from(key), String::from(value));
        self
    }

    /// Target entity, when the call has one
    pub fn entity_id(&self) -> Option<&str> {
        self.data.get(attr::ENTITY_ID).map(String::as_str)
    }
}

/// Sink for service calls
///
/// Implementations must not block; the controller calls this from its
/// drive loop.
pub trait Backend {
    fn call_service(&mut self, call: ServiceCall);
}

impl<B: Backend + ?Sized> Backend for &mut B {
    fn call_service(&mut self, call: ServiceCall) {
        (**self).call_service(call)
    }
}
