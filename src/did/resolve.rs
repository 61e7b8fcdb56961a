//! # DID Resolution
//!
//! Resolve a DID to its document and dereference DID URLs to verification
//! methods.

use std::str::FromStr;

use anyhow::{Result, anyhow};

use crate::IdentityResolver;
use crate::did::{Document, Method, Url, VerificationMethod, jwk};

/// Resolve a DID to its DID document.
///
/// Self-describing methods (`did:jwk`) are expanded locally and never reach
/// the resolver. All other methods are delegated to `resolver`.
///
/// # Errors
///
/// Will return an error if the DID cannot be parsed, the resolver fails, or
/// the resolved document describes a different DID.
pub async fn resolve_document(did: &str, resolver: &impl IdentityResolver) -> Result<Document> {
    let url = Url::from_str(did)?;
    match url.method {
        Method::Jwk => jwk::resolve(&url),
        Method::Web | Method::Other(_) => {
            let did = url.did();
            let document = resolver.resolve(&did).await?;
            if document.id != did {
                return Err(anyhow!("resolved document {} does not describe {did}", document.id));
            }
            Ok(document)
        }
    }
}

/// Dereference a DID URL into the verification method it names.
///
/// # Errors
///
/// Will return an error if the DID cannot be resolved or the document has no
/// verification method with the URL's ID.
pub async fn dereference(did_url: &str, resolver: &impl IdentityResolver) -> Result<VerificationMethod> {
    let url = Url::from_str(did_url)?;
    let document = resolve_document(&url.did(), resolver).await?;
    document
        .verification_method(&url.resource_id())
        .cloned()
        .ok_or_else(|| anyhow!("verification method {url} not found in document"))
}
