//! # Service
//!
//! Services express ways of communicating with the DID subject. The registry
//! operator's document advertises a `dap-registry` service pointing at this
//! registry.

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{Kind, OneMany};

/// A Service is used to express a way of communicating with the DID subject or
/// associated entities.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// A URI unique to the service.
    pub id: String,

    /// The service type. SHOULD be registered in the DID Specification
    /// Registries.
    #[serde(rename = "type")]
    pub type_: String,

    /// One or more endpoints for the service.
    #[allow(clippy::struct_field_names)]
    pub service_endpoint: OneMany<Kind<Value>>,
}

/// Service builder
#[derive(Default)]
pub struct ServiceBuilder {
    id: String,
    service_type: Option<String>,
    endpoint: Option<OneMany<Kind<Value>>>,
}

impl ServiceBuilder {
    /// Creates a new `ServiceBuilder` with the given service ID. A bare
    /// fragment is resolved against the document's DID when the document is
    /// built.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Specify the service type.
    #[must_use]
    pub fn service_type(mut self, service_type: impl Into<String>) -> Self {
        self.service_type = Some(service_type.into());
        self
    }

    /// Add a string-based service endpoint.
    ///
    /// Chain to add multiple endpoints.
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        let endpoint = Kind::String(endpoint.into());
        self.endpoint = Some(match self.endpoint {
            Some(existing) => existing.add(endpoint),
            None => OneMany::One(endpoint),
        });
        self
    }

    /// Build the service for the document identified by `did`.
    ///
    /// # Errors
    ///
    /// Will fail if no type or endpoint has been set.
    pub fn build(self, did: &str) -> Result<Service> {
        let Some(service_type) = self.service_type else {
            return Err(anyhow!("no type specified for service {}", self.id));
        };
        let Some(endpoint) = self.endpoint else {
            return Err(anyhow!("no endpoints specified for service {}", self.id));
        };
        let id = if self.id.starts_with("did:") {
            self.id
        } else {
            format!("{did}#{}", self.id.trim_start_matches('#'))
        };

        Ok(Service {
            id,
            type_: service_type,
            service_endpoint: endpoint,
        })
    }
}
