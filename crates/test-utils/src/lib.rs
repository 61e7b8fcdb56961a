//! In-process providers and identities for testing the registry.

mod provider;

use anyhow::Result;
use dap_registry::did::{DocumentBuilder, KeyId, ServiceBuilder, VerificationMethodBuilder, web};
use dap_registry::jose::JWK;
use dap_registry::{BearerDid, RegistrationRequest};

pub use crate::provider::Provider;

/// Domain used for the registry in tests.
pub const DOMAIN: &str = "didpay.me";

/// Create an operator identity for `domain` (a host, optionally followed by a
/// path) advertising a `dap-registry` service.
///
/// # Errors
///
/// Returns an error if the identity cannot be created.
pub fn operator(domain: &str) -> Result<BearerDid> {
    let endpoint = format!("https://{}/dap-registry", domain.trim_end_matches('/'));
    web::create(
        domain,
        vec![ServiceBuilder::new("dap-registry").service_type("dap-registry").endpoint(endpoint)],
    )
}

/// Create an identity for an arbitrary DID, backed by a fresh Ed25519 key.
/// Publish its document with [`Provider::publish`] so it can be resolved.
///
/// # Errors
///
/// Returns an error if the document cannot be built.
pub fn identity(did: &str) -> Result<BearerDid> {
    identity_with_key(did, JWK::generate_ed25519()?)
}

/// Create an identity for an arbitrary DID whose single verification method
/// is the public half of `key`.
///
/// # Errors
///
/// Returns an error if the document cannot be built or `key` is not private.
pub fn identity_with_key(did: &str, key: JWK) -> Result<BearerDid> {
    let document = DocumentBuilder::new(did)
        .verification_method(
            VerificationMethodBuilder::new(key.to_public()).key_id(KeyId::Index("0".into())),
        )
        .build()?;
    BearerDid::new(document, &key)
}

/// Build a request for `handle` claiming `did`, signed by `signer`.
///
/// # Errors
///
/// Returns an error if signing fails.
pub fn signed_request(handle: &str, did: &str, signer: &BearerDid) -> Result<RegistrationRequest> {
    let mut request = RegistrationRequest::new(handle, DOMAIN, did);
    request.sign(signer)?;
    Ok(request)
}

/// Serialize a request as a request body.
///
/// # Errors
///
/// Returns an error if the request cannot be serialized.
pub fn body(request: &RegistrationRequest) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(request)?)
}
