//! # Bearer and Portable DIDs
//!
//! A [`BearerDid`] is a DID together with the private key material needed to
//! sign on its behalf. A [`PortableDid`] is its serialized form: the DID URI,
//! the DID document, and the private keys as JWKs. The registry operator's
//! identity is supplied as a portable DID secret and re-derived on every use.

use anyhow::{Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::did::Document;
use crate::jose::{self, JWK, Signer};

/// Serialized DID with its private keys.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PortableDid {
    /// The DID.
    pub uri: String,

    /// The DID document describing `uri`.
    pub document: Document,

    /// Private keys matching verification methods in `document`.
    #[serde(default)]
    pub private_keys: Vec<JWK>,

    /// Method-specific metadata, carried through untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// A DID able to sign on its own behalf.
#[derive(Clone)]
pub struct BearerDid {
    /// The DID.
    pub did: String,

    /// The DID document.
    pub document: Document,

    key_id: String,
    signing_key: JWK,
}

impl std::fmt::Debug for BearerDid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerDid")
            .field("did", &self.did)
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

impl BearerDid {
    /// Bind `key` to the verification method in `document` holding its public
    /// half.
    ///
    /// # Errors
    ///
    /// Returns an error if the key has no private part or no verification
    /// method in the document matches it.
    pub fn new(document: Document, key: &JWK) -> Result<Self> {
        if !jose::is_private(key) {
            bail!("signing key for {} has no private key material", document.id);
        }

        let methods = document.verification_method.as_deref().unwrap_or_default();
        let vm = methods
            .iter()
            .find(|vm| vm.key.jwk().is_ok_and(|jwk| jwk.equals_public(key)))
            .ok_or_else(|| anyhow!("no verification method in {} matches key", document.id))?;

        let key_id =
            if vm.id.starts_with('#') { format!("{}{}", document.id, vm.id) } else { vm.id.clone() };

        Ok(Self {
            did: document.id.clone(),
            document,
            key_id,
            signing_key: key.clone(),
        })
    }

    /// Restore a bearer DID from its portable form. The first private key
    /// matching a verification method is used for signing.
    ///
    /// # Errors
    ///
    /// Returns an error if the portable DID has no usable private key or its
    /// `uri` does not match the document.
    pub fn from_portable(portable: PortableDid) -> Result<Self> {
        if portable.uri != portable.document.id {
            bail!(
                "portable DID uri {} does not match document {}",
                portable.uri,
                portable.document.id
            );
        }

        let mut last_err = anyhow!("portable DID {} has no private keys", portable.uri);
        for key in &portable.private_keys {
            match Self::new(portable.document.clone(), key) {
                Ok(bearer) => return Ok(bearer),
                Err(e) => last_err = e,
            }
        }
        Err(last_err)
    }

    /// Export the bearer DID in portable form.
    #[must_use]
    pub fn to_portable(&self) -> PortableDid {
        PortableDid {
            uri: self.did.clone(),
            document: self.document.clone(),
            private_keys: vec![self.signing_key.clone()],
            metadata: None,
        }
    }

    /// DID URL of the verification method used for signing.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }
}

impl Signer for BearerDid {
    fn key_id(&self) -> &str {
        &self.key_id
    }

    fn signing_key(&self) -> &JWK {
        &self.signing_key
    }
}

#[derive(Deserialize)]
struct PublishedDocument {
    document: Document,
}

#[derive(Deserialize)]
struct PublishedUri {
    uri: String,
}

/// Read the DID document out of the operator's portable DID secret. Private
/// keys are not parsed, so the document is served whatever key types it and
/// the secret hold.
///
/// # Errors
///
/// Returns an error if the secret has no readable `document`.
pub fn derive_document(secret: &str) -> Result<Document> {
    let published: PublishedDocument =
        serde_json::from_str(secret).map_err(|e| anyhow!("issue parsing portable DID: {e}"))?;
    Ok(published.document)
}

/// Read the operator's DID (the portable DID `uri`) out of its secret.
///
/// # Errors
///
/// Returns an error if the secret has no `uri`.
pub fn derive_did(secret: &str) -> Result<String> {
    let published: PublishedUri =
        serde_json::from_str(secret).map_err(|e| anyhow!("issue parsing portable DID: {e}"))?;
    if published.uri.is_empty() {
        bail!("portable DID has an empty uri");
    }
    Ok(published.uri)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::did::{ServiceBuilder, web};
    use crate::jose::{Algorithm, sign_detached};

    #[test]
    fn portable_round_trip() {
        let bearer = web::create(
            "example.com",
            vec![
                ServiceBuilder::new("dap-registry")
                    .service_type("dap-registry")
                    .endpoint("https://example.com/dap-registry"),
            ],
        )
        .expect("should create");

        let secret = serde_json::to_string(&bearer.to_portable()).expect("should serialize");
        assert!(secret.contains("\"privateKeys\""));

        let portable: PortableDid = serde_json::from_str(&secret).expect("should parse");
        let restored = BearerDid::from_portable(portable).expect("should restore");
        assert_eq!(restored.did, "did:web:example.com");
        assert_eq!(restored.key_id(), bearer.key_id());
        assert_eq!(restored.signing_key(), bearer.signing_key());
        assert!(sign_detached(b"payload", &restored).is_ok());

        assert_eq!(derive_document(&secret).expect("should derive"), bearer.document);
        assert_eq!(derive_did(&secret).expect("should derive"), "did:web:example.com");
    }

    #[test]
    fn secp256k1_operator() {
        let key = JWK::generate_secp256k1().expect("should generate");
        let bearer = web::create_with_key("example.com", key, vec![]).expect("should create");
        assert_eq!(bearer.signing_key().get_algorithm(), Some(Algorithm::ES256K));

        let secret = serde_json::to_string(&bearer.to_portable()).expect("should serialize");
        assert_eq!(derive_document(&secret).expect("should derive"), bearer.document);
        assert_eq!(derive_did(&secret).expect("should derive"), "did:web:example.com");
    }

    #[test]
    fn unparsed_private_keys_ignored() {
        let bearer = web::create("example.com", vec![]).expect("should create");
        let mut secret = serde_json::to_value(bearer.to_portable()).expect("should serialize");
        secret["privateKeys"] = serde_json::json!([{"kty": "unknown", "opaque": true}]);
        let secret = secret.to_string();

        assert_eq!(derive_document(&secret).expect("should derive"), bearer.document);
        assert_eq!(derive_did(&secret).expect("should derive"), "did:web:example.com");
        assert!(serde_json::from_str::<PortableDid>(&secret).is_err());
    }

    #[test]
    fn public_key_cannot_sign() {
        let bearer = web::create("example.com", vec![]).expect("should create");
        let public = bearer.signing_key().to_public();
        assert!(BearerDid::new(bearer.document.clone(), &public).is_err());
    }

    #[test]
    fn foreign_key_rejected() {
        let bearer = web::create("example.com", vec![]).expect("should create");
        let mut portable = bearer.to_portable();
        portable.private_keys = vec![JWK::generate_ed25519().expect("should generate")];
        assert!(BearerDid::from_portable(portable).is_err());
    }

    #[test]
    fn mismatched_uri_rejected() {
        let bearer = web::create("example.com", vec![]).expect("should create");
        let mut portable = bearer.to_portable();
        portable.uri = "did:web:other.com".into();
        assert!(BearerDid::from_portable(portable).is_err());
    }

    #[test]
    fn malformed_secret() {
        assert!(derive_document("not json").is_err());
        assert!(derive_did("{}").is_err());
        assert!(derive_did(r#"{"uri": ""}"#).is_err());
    }
}
