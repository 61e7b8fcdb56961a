//! # Verification Methods
//!
//! A DID document expresses verification methods, such as cryptographic public
//! keys, which can be used to authenticate or authorize interactions with the
//! DID subject. The registry uses them to check the signature on a
//! registration request.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::Kind;
use crate::jose::{self, JWK};

/// A verification method in a DID document.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationMethod {
    /// Only used when the verification method uses terms not defined in the
    /// containing document.
    #[serde(rename = "@context")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Kind<Value>>,

    /// A DID URL that identifies the verification method.
    pub id: String,

    /// The DID of the controller of the verification method.
    pub controller: String,

    /// The format of the public key material.
    #[serde(flatten)]
    pub key: KeyFormat,
}

impl VerificationMethod {
    /// Infer the DID from the key ID.
    #[must_use]
    pub fn did(&self) -> String {
        self.id.split('#').next().unwrap_or_default().to_string()
    }
}

/// The format of the public key material.
#[derive(Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
#[serde(rename_all_fields = "camelCase")]
#[serde(tag = "type")]
pub enum KeyFormat {
    /// The key is encoded as a Multibase string.
    #[serde(alias = "Ed25519VerificationKey2020")]
    Multikey {
        /// The public key encoded as a Multibase.
        public_key_multibase: String,
    },

    /// The key is encoded as a JWK.
    #[serde(alias = "JsonWebKey2020")]
    JsonWebKey {
        /// The public key encoded as a JWK.
        public_key_jwk: JWK,
    },
}

impl Default for KeyFormat {
    fn default() -> Self {
        Self::Multikey {
            public_key_multibase: String::new(),
        }
    }
}

impl KeyFormat {
    /// Return the key as a JWK.
    ///
    /// # Errors
    /// Will return an error if the key is multibase encoded and cannot be
    /// decoded.
    pub fn jwk(&self) -> Result<JWK, jose::Error> {
        match self {
            Self::JsonWebKey { public_key_jwk } => Ok(public_key_jwk.clone()),
            Self::Multikey { public_key_multibase } => {
                jose::jwk_from_multibase(public_key_multibase)
            }
        }
    }

    /// Return the key as a multibase string.
    ///
    /// # Errors
    /// Will return an error if the key is a JWK and cannot be encoded as a
    /// multibase string.
    pub fn multibase(&self) -> Result<String, jose::Error> {
        match self {
            Self::JsonWebKey { public_key_jwk } => jose::jwk_to_multibase(public_key_jwk),
            Self::Multikey { public_key_multibase } => Ok(public_key_multibase.clone()),
        }
    }
}

impl From<JWK> for KeyFormat {
    fn from(jwk: JWK) -> Self {
        Self::JsonWebKey { public_key_jwk: jwk }
    }
}

impl From<String> for KeyFormat {
    fn from(multibase: String) -> Self {
        Self::Multikey {
            public_key_multibase: multibase,
        }
    }
}

/// A builder for creating a verification method.
#[derive(Default)]
pub struct VerificationMethodBuilder {
    key: KeyFormat,
    did: String,
    id_type: KeyId,
}

impl VerificationMethodBuilder {
    /// Creates a new `VerificationMethodBuilder` with the given public key.
    #[must_use]
    pub fn new(key: impl Into<KeyFormat>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    /// The DID of the controlling document.
    #[must_use]
    pub fn did(mut self, did: impl Into<String>) -> Self {
        self.did = did.into();
        self
    }

    /// Specify how to construct the key ID.
    #[must_use]
    pub fn key_id(mut self, id_type: KeyId) -> Self {
        self.id_type = id_type;
        self
    }

    /// Build the verification method.
    ///
    /// # Errors
    ///
    /// Will fail if the key ID is derived from the key and the key cannot be
    /// converted to a multibase string.
    pub fn build(self) -> Result<VerificationMethod, jose::Error> {
        let suffix = match self.id_type {
            KeyId::Did => String::new(),
            KeyId::Verification => format!("#{}", self.key.multibase()?),
            KeyId::Index(index) => format!("#{index}"),
        };

        Ok(VerificationMethod {
            id: format!("{}{suffix}", self.did),
            controller: self.did,
            key: self.key,
            ..VerificationMethod::default()
        })
    }
}

/// Instruction to the `VerificationMethodBuilder` on how to construct the key
/// ID.
#[derive(Default)]
pub enum KeyId {
    /// Use the DID as the identifier without any fragment.
    #[default]
    Did,

    /// Append the multibase form of the key to the DID.
    Verification,

    /// Append the given fragment to the DID.
    ///
    /// # Examples
    ///
    /// `did:<method>:<method-specific-identifier>#0`.
    Index(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    const MULTIKEY: &str = "z6MkmM42vxfqZQsv4ehtTjFFxQ4sQKS2w6WR7emozFAn5cxu";

    #[test]
    fn json_web_key() {
        let jwk = jose::jwk_from_multibase(MULTIKEY).expect("should decode");
        let vm = VerificationMethodBuilder::new(jwk)
            .did("did:web:example.com")
            .key_id(KeyId::Verification)
            .build()
            .expect("should build");

        let ser = serde_json::to_value(&vm).expect("should serialize");
        let json = serde_json::json!({
            "id": format!("did:web:example.com#{MULTIKEY}"),
            "controller": "did:web:example.com",
            "type": "JsonWebKey",
            "publicKeyJwk": {
                "kty": "OKP",
                "crv": "Ed25519",
                "x": "Zmq-CJA17UpFeVmJ-nIKDuDEhUnoRSNIXFbxyBtCh6Y"
            }
        });
        assert_eq!(ser, json);
    }

    #[test]
    fn multikey() {
        let vm = VerificationMethodBuilder::new(MULTIKEY.to_string())
            .did("did:web:example.com")
            .key_id(KeyId::Index("0".into()))
            .build()
            .expect("should build");

        let ser = serde_json::to_value(&vm).expect("should serialize");
        let json = serde_json::json!({
            "id": "did:web:example.com#0",
            "controller": "did:web:example.com",
            "type": "Multikey",
            "publicKeyMultibase": MULTIKEY
        });
        assert_eq!(ser, json);
    }

    #[test]
    fn legacy_type_names() {
        let vm: VerificationMethod = serde_json::from_value(serde_json::json!({
            "id": "did:example:123#key-1",
            "controller": "did:example:123",
            "type": "JsonWebKey2020",
            "publicKeyJwk": {
                "kty": "OKP",
                "crv": "Ed25519",
                "x": "Zmq-CJA17UpFeVmJ-nIKDuDEhUnoRSNIXFbxyBtCh6Y"
            }
        }))
        .expect("should deserialize");

        assert_eq!(vm.did(), "did:example:123");
        let multi = vm.key.multibase().expect("should encode");
        assert_eq!(multi, MULTIKEY);
    }

    #[test]
    fn secp256k1_json_web_key() {
        let public = JWK::generate_secp256k1().expect("should generate").to_public();
        let vm: VerificationMethod = serde_json::from_value(serde_json::json!({
            "id": "did:example:456#key-1",
            "controller": "did:example:456",
            "type": "JsonWebKey2020",
            "publicKeyJwk": public
        }))
        .expect("should deserialize");

        let jwk = vm.key.jwk().expect("should be jwk");
        assert_eq!(jwk.get_algorithm(), Some(jose::Algorithm::ES256K));
        assert!(vm.key.multibase().expect("should encode").starts_with("zQ3s"));
    }
}
