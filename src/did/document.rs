//! # DID Document
//!
//! A DID Document is a JSON-LD document that contains information related to a
//! DID.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{Kind, OneMany};
use crate::did::service::{Service, ServiceBuilder};
use crate::did::verification::{VerificationMethod, VerificationMethodBuilder};

/// Default context of a DID document.
pub const CONTEXT: &str = "https://www.w3.org/ns/did/v1";

/// DID Document
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// The context of the DID document.
    #[serde(rename = "@context")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<OneMany<Kind<Value>>>,

    /// The DID for a particular DID subject.
    pub id: String,

    /// A set of URIs that are other identifiers for the subject of the above
    /// DID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub also_known_as: Option<Vec<String>>,

    /// One or more DIDs whose verification methods are authoritative for this
    /// document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller: Option<OneMany<String>>,

    /// A set of services, that express ways of communicating with the DID
    /// subject or related entities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<Vec<Service>>,

    /// If set, MUST be a set of verification methods for the DID subject.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_method: Option<Vec<VerificationMethod>>,

    /// How the DID subject is expected to be authenticated.
    ///
    /// <https://www.w3.org/TR/did-core/#authentication>
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication: Option<Vec<Kind<VerificationMethod>>>,

    /// How the DID subject is expected to express claims.
    ///
    /// <https://www.w3.org/TR/did-core/#assertion>
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assertion_method: Option<Vec<Kind<VerificationMethod>>>,

    /// Keys used to establish confidential communication with the subject.
    ///
    /// <https://www.w3.org/TR/did-core/#key-agreement>
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_agreement: Option<Vec<Kind<VerificationMethod>>>,

    /// Keys the subject uses to invoke cryptographic capabilities.
    ///
    /// <https://www.w3.org/TR/did-core/#capability-invocation>
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capability_invocation: Option<Vec<Kind<VerificationMethod>>>,

    /// Keys the subject uses to delegate cryptographic capabilities.
    ///
    /// <https://www.w3.org/TR/did-core/#capability-delegation>
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capability_delegation: Option<Vec<Kind<VerificationMethod>>>,
}

impl Document {
    /// Retrieve a service by its ID.
    #[must_use]
    pub fn service(&self, id: &str) -> Option<&Service> {
        self.service.as_ref()?.iter().find(|s| s.id == id)
    }

    /// Retrieve a verification method by its ID.
    ///
    /// Methods embedded in a verification relationship are searched as well as
    /// the top-level `verificationMethod` set. Relative IDs (`#0`) are resolved
    /// against the document's DID.
    #[must_use]
    pub fn verification_method(&self, id: &str) -> Option<&VerificationMethod> {
        let matches = |vm: &&VerificationMethod| {
            vm.id == id || (vm.id.starts_with('#') && format!("{}{}", self.id, vm.id) == id)
        };

        if let Some(vm) = self.verification_method.as_ref().and_then(|vms| vms.iter().find(matches))
        {
            return Some(vm);
        }

        [
            &self.authentication,
            &self.assertion_method,
            &self.capability_invocation,
            &self.capability_delegation,
        ]
        .into_iter()
        .flatten()
        .flatten()
        .filter_map(Kind::as_object)
        .find(matches)
    }
}

/// DID Document builder.
pub struct DocumentBuilder {
    did: String,
    verification_method: Vec<VerificationMethodBuilder>,
    relationships: Vec<String>,
    service: Vec<ServiceBuilder>,
    also_known_as: Option<Vec<String>>,
}

impl DocumentBuilder {
    /// Creates a new `DocumentBuilder` for the given DID.
    #[must_use]
    pub fn new(did: impl Into<String>) -> Self {
        Self {
            did: did.into(),
            verification_method: vec![],
            relationships: vec![],
            service: vec![],
            also_known_as: None,
        }
    }

    /// Add an also-known-as identifier.
    #[must_use]
    pub fn also_known_as(mut self, aka: impl Into<String>) -> Self {
        self.also_known_as.get_or_insert(vec![]).push(aka.into());
        self
    }

    /// Add a verification method. The method is referenced from the
    /// `authentication`, `assertionMethod`, `capabilityInvocation` and
    /// `capabilityDelegation` relationships.
    #[must_use]
    pub fn verification_method(mut self, builder: VerificationMethodBuilder) -> Self {
        self.verification_method.push(builder);
        self
    }

    /// Add a service endpoint.
    ///
    /// Chain to add multiple service endpoints.
    #[must_use]
    pub fn add_service(mut self, service: ServiceBuilder) -> Self {
        self.service.push(service);
        self
    }

    /// Build the DID Document.
    ///
    /// # Errors
    ///
    /// Will fail if a verification method or service cannot be built.
    pub fn build(mut self) -> Result<Document> {
        let mut methods = vec![];
        for builder in self.verification_method {
            let vm = builder.did(&self.did).build()?;
            self.relationships.push(vm.id.clone());
            methods.push(vm);
        }
        let service =
            self.service.into_iter().map(|s| s.build(&self.did)).collect::<Result<Vec<_>>>()?;

        let refs = || -> Option<Vec<Kind<VerificationMethod>>> {
            if self.relationships.is_empty() {
                return None;
            }
            Some(self.relationships.iter().map(|id| Kind::String(id.clone())).collect())
        };

        Ok(Document {
            context: Some(OneMany::Many(vec![Kind::String(CONTEXT.to_string())])),
            id: self.did.clone(),
            also_known_as: self.also_known_as.clone(),
            service: if service.is_empty() { None } else { Some(service) },
            authentication: refs(),
            assertion_method: refs(),
            capability_invocation: refs(),
            capability_delegation: refs(),
            verification_method: if methods.is_empty() { None } else { Some(methods) },
            ..Document::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::did::KeyId;
    use crate::jose::JWK;

    #[test]
    fn build_and_find() {
        let jwk = JWK::generate_ed25519().expect("should generate").to_public();
        let doc = DocumentBuilder::new("did:web:example.com")
            .verification_method(VerificationMethodBuilder::new(jwk).key_id(KeyId::Index("0".into())))
            .add_service(
                ServiceBuilder::new("dap-registry")
                    .service_type("dap-registry")
                    .endpoint("https://example.com/dap-registry"),
            )
            .build()
            .expect("should build");

        assert!(doc.verification_method("did:web:example.com#0").is_some());
        assert!(doc.verification_method("did:web:example.com#1").is_none());
        assert!(doc.service("did:web:example.com#dap-registry").is_some());
        assert_eq!(
            doc.authentication,
            Some(vec![Kind::String("did:web:example.com#0".into())])
        );
    }

    #[test]
    fn relative_and_embedded_methods() {
        let jwk = JWK::generate_ed25519().expect("should generate").to_public();
        let doc: Document = serde_json::from_value(serde_json::json!({
            "id": "did:example:123",
            "verificationMethod": [{
                "id": "#0",
                "controller": "did:example:123",
                "type": "JsonWebKey",
                "publicKeyJwk": jwk
            }],
            "authentication": [{
                "id": "did:example:123#auth",
                "controller": "did:example:123",
                "type": "JsonWebKey",
                "publicKeyJwk": jwk
            }]
        }))
        .expect("should deserialize");

        assert!(doc.verification_method("did:example:123#0").is_some());
        assert!(doc.verification_method("did:example:123#auth").is_some());
        assert!(doc.context.is_none());

        let doc: Document = serde_json::from_value(serde_json::json!({
            "@context": CONTEXT,
            "id": "did:example:123"
        }))
        .expect("should accept a single context");
        assert_eq!(doc.context, Some(OneMany::One(Kind::String(CONTEXT.into()))));
    }
}
