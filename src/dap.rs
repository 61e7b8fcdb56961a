//! # Registration Requests
//!
//! A DAP (decentralized agnostic paytag) binds a human-readable handle at a
//! domain to a DID. Registrants submit a [`RegistrationRequest`] signed by the
//! DID's own key (or by the registry operator on their behalf). The signature
//! is a detached compact JWS over [`RegistrationRequest::digest`].

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use anyhow::{anyhow, bail};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::IdentityResolver;
use crate::bearer::BearerDid;
use crate::jose::{self, Decoded};

const ID_PREFIX: &str = "reg_";

/// Identifier a registrant assigns to a registration request.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct RegistrationId(String);

impl RegistrationId {
    /// Generate a new time-ordered identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(format!("{ID_PREFIX}{}", Uuid::now_v7().simple()))
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RegistrationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RegistrationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for RegistrationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A signed request to bind `handle` to `did`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct RegistrationRequest {
    /// Registrant-assigned request ID.
    pub id: RegistrationId,

    /// The handle being claimed.
    pub handle: String,

    /// The DID the handle resolves to.
    pub did: String,

    /// Domain of the registry the handle is claimed at.
    pub domain: String,

    /// Detached compact JWS over [`Self::digest`].
    pub signature: String,
}

#[derive(Serialize)]
struct SignedFields<'a> {
    id: &'a RegistrationId,
    handle: &'a str,
    did: &'a str,
    domain: &'a str,
}

impl RegistrationRequest {
    /// Create an unsigned request with a fresh ID.
    #[must_use]
    pub fn new(handle: impl Into<String>, domain: impl Into<String>, did: impl Into<String>) -> Self {
        Self {
            id: RegistrationId::new(),
            handle: handle.into(),
            did: did.into(),
            domain: domain.into(),
            signature: String::new(),
        }
    }

    /// SHA-256 over the canonical (RFC 8785) JSON of every field but the
    /// signature.
    ///
    /// # Errors
    ///
    /// Returns an error if the fields cannot be canonicalized.
    pub fn digest(&self) -> anyhow::Result<Vec<u8>> {
        let fields = SignedFields {
            id: &self.id,
            handle: &self.handle,
            did: &self.did,
            domain: &self.domain,
        };
        let canonical = serde_json_canonicalizer::to_string(&fields)
            .map_err(|e| anyhow!("issue canonicalizing request: {e}"))?;
        Ok(Sha256::digest(canonical.as_bytes()).to_vec())
    }

    /// Sign the request with `signer`, replacing any existing signature.
    ///
    /// # Errors
    ///
    /// Returns an error if the digest cannot be computed or signing fails.
    pub fn sign(&mut self, signer: &BearerDid) -> anyhow::Result<()> {
        let digest = self.digest()?;
        self.signature = jose::sign_detached(&digest, signer)?;
        Ok(())
    }

    /// Verify the signature over the request digest, returning the decoded
    /// envelope. The signer DID is taken from the envelope, not from
    /// `self.did`.
    ///
    /// # Errors
    ///
    /// Returns an error if the signature is malformed, the signer cannot be
    /// resolved, or the signature does not verify.
    pub async fn verify(&self, resolver: &impl IdentityResolver) -> Result<Decoded, jose::Error> {
        let digest = self.digest().map_err(|e| jose::Error::Malformed(e.to_string()))?;
        jose::verify_detached(&self.signature, &digest, resolver).await
    }

    /// The handle and domain as a [`Dap`].
    #[must_use]
    pub fn dap(&self) -> Dap {
        Dap {
            handle: self.handle.clone(),
            domain: self.domain.clone(),
        }
    }
}

/// A handle at a domain, written `@handle/domain`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dap {
    /// The local handle.
    pub handle: String,

    /// The registry domain.
    pub domain: String,
}

impl Display for Dap {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}/{}", self.handle, self.domain)
    }
}

impl FromStr for Dap {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let Some(rest) = s.strip_prefix('@') else {
            bail!("DAP must start with '@': {s}");
        };
        let Some((handle, domain)) = rest.split_once('/') else {
            bail!("DAP must have the form @handle/domain: {s}");
        };
        if handle.is_empty() || domain.is_empty() {
            bail!("DAP handle and domain must not be empty: {s}");
        }
        Ok(Self {
            handle: handle.to_string(),
            domain: domain.to_string(),
        })
    }
}
