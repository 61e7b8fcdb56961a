//! # DID JWK
//!
//! The `did:jwk` method encodes a public key directly in the identifier, so a
//! document can be expanded from the DID alone without any network access.
//!
//! See <https://github.com/quartzjer/did-jwk/blob/main/spec.md>

use std::sync::LazyLock;

use anyhow::{Result, anyhow, bail};
use base64ct::{Base64UrlUnpadded, Encoding};
use regex::Regex;

use super::{Document, DocumentBuilder, KeyId, Method, Url, VerificationMethodBuilder};
use crate::bearer::BearerDid;
use crate::jose::JWK;

static DID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^did:jwk:(?<jwk>[A-Za-z0-9_-]+)$").expect("should compile"));

/// Construct a `did:jwk` from the public half of a key.
///
/// # Errors
///
/// Will fail if the key cannot be serialized.
pub fn did_from_jwk(jwk: &JWK) -> Result<String> {
    let serialized = serde_json::to_vec(&jwk.to_public())?;
    Ok(format!("did:jwk:{}", Base64UrlUnpadded::encode_string(&serialized)))
}

/// Expand a `did:jwk` DID URL into its DID document.
///
/// The document has a single verification method, `#0`, referenced from every
/// verification relationship.
///
/// # Errors
///
/// Returns an error if the URL is not `did:jwk` or the identifier does not
/// decode to a JWK.
pub fn resolve(url: &Url) -> Result<Document> {
    if url.method != Method::Jwk {
        bail!("DID is not a valid did:jwk: {url}");
    }
    let did = url.did();
    let Some(caps) = DID_REGEX.captures(&did) else {
        bail!("DID is not a valid did:jwk: {did}");
    };

    let decoded = Base64UrlUnpadded::decode_vec(&caps["jwk"])
        .map_err(|e| anyhow!("issue decoding key: {e}"))?;
    let jwk: JWK =
        serde_json::from_slice(&decoded).map_err(|e| anyhow!("issue deserializing key: {e}"))?;
    if crate::jose::is_private(&jwk) {
        bail!("did:jwk must not carry private key material");
    }

    DocumentBuilder::new(did)
        .verification_method(VerificationMethodBuilder::new(jwk).key_id(KeyId::Index("0".into())))
        .build()
}

/// Create a new `did:jwk` identity backed by a freshly generated Ed25519 key.
///
/// # Errors
///
/// Will fail if key generation fails or the document cannot be built.
pub fn create() -> Result<BearerDid> {
    create_with_key(JWK::generate_ed25519()?)
}

/// Create a `did:jwk` identity for an existing private key.
///
/// # Errors
///
/// Will fail if `key` holds no private key material or the document cannot be
/// built.
pub fn create_with_key(key: JWK) -> Result<BearerDid> {
    let did = did_from_jwk(&key)?;
    let document = resolve(&did.parse()?)?;
    BearerDid::new(document, &key)
}
