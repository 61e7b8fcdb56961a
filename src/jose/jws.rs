//! Compact JWS with a detached payload.
//!
//! A detached JWS has the form `<header>..<signature>`: the payload is agreed
//! out of band (for registrations, the request digest) and is re-encoded by
//! the verifier to rebuild the signing input.

use std::str::FromStr;

use base64ct::{Base64UrlUnpadded, Encoding};
use ssi_jwk::{Algorithm, JWK};
use ssi_jws::{DecodedJWS, Header};

use super::Error;
use crate::IdentityResolver;
use crate::did::{self, Url};

/// Produces signatures for a JWS.
pub trait Signer {
    /// DID URL of the verification method matching the signing key.
    fn key_id(&self) -> &str;

    /// The private key signatures are made with. Its algorithm becomes the
    /// JWS `alg`.
    fn signing_key(&self) -> &JWK;
}

/// A verified JWS.
#[derive(Clone, Debug)]
pub struct Decoded {
    /// The decoded header.
    pub header: Header,

    /// The payload that was signed.
    pub payload: Vec<u8>,

    /// DID of the signer, recovered from the header `kid`.
    pub signer_did: String,
}

/// Sign `payload` and return a compact JWS with the payload detached.
///
/// # Errors
///
/// Returns an error if the key has no signing algorithm, the header cannot be
/// serialized, or signing fails.
pub fn sign_detached(payload: &[u8], signer: &impl Signer) -> Result<String, Error> {
    let key = signer.signing_key();
    let Some(algorithm) = key.get_algorithm() else {
        return Err(Error::UnsupportedAlgorithm("key has no signing algorithm".into()));
    };

    let header = Header {
        algorithm,
        key_id: Some(signer.key_id().to_string()),
        type_: Some("JWT".to_string()),
        ..Header::default()
    };
    let header_json = serde_json::to_vec(&header).map_err(|e| Error::Signing(e.to_string()))?;
    let header_b64 = Base64UrlUnpadded::encode_string(&header_json);
    let payload_b64 = Base64UrlUnpadded::encode_string(payload);

    let signing_input = format!("{header_b64}.{payload_b64}");
    let signature = ssi_jws::sign_bytes_b64(algorithm, signing_input.as_bytes(), key)
        .map_err(|e| Error::Signing(e.to_string()))?;

    Ok(format!("{header_b64}..{signature}"))
}

/// Verify a compact JWS over `payload`.
///
/// The signer is identified by the header `kid`, a DID URL. The DID is
/// resolved (locally for self-describing methods, otherwise through
/// `resolver`) and the verification method named by `kid` supplies the key.
/// An attached payload is accepted only if it equals `payload`.
///
/// # Errors
///
/// Returns an error if the JWS is malformed, the algorithm is unsigned or
/// symmetric, the signer cannot be resolved, or the signature does not verify.
pub async fn verify_detached(
    jws: &str, payload: &[u8], resolver: &impl IdentityResolver,
) -> Result<Decoded, Error> {
    let (header_b64, payload_part, signature_b64) =
        ssi_jws::split_jws(jws).map_err(|e| Error::Malformed(e.to_string()))?;

    let payload_b64 = Base64UrlUnpadded::encode_string(payload);
    if !payload_part.is_empty() && payload_part != payload_b64 {
        return Err(Error::PayloadMismatch);
    }

    let DecodedJWS {
        header,
        signing_input,
        signature,
        ..
    } = ssi_jws::decode_jws_parts(header_b64, payload_b64.as_bytes(), signature_b64)
        .map_err(|e| Error::Malformed(e.to_string()))?;
    if header.base64urlencode_payload == Some(false) {
        return Err(Error::Malformed("unencoded payloads are not accepted".into()));
    }
    if matches!(
        header.algorithm,
        Algorithm::None | Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
    ) {
        return Err(Error::UnsupportedAlgorithm(format!("{:?}", header.algorithm)));
    }

    let Some(kid) = &header.key_id else {
        return Err(Error::MissingKid);
    };
    let kid_url = Url::from_str(kid).map_err(|e| Error::Resolution(e.to_string()))?;
    let vm = did::dereference(kid, resolver).await.map_err(|e| Error::Resolution(e.to_string()))?;
    let key = vm.key.jwk()?;

    ssi_jws::verify_bytes(header.algorithm, &signing_input, &key, &signature)
        .map_err(|_| Error::Signature)?;

    Ok(Decoded {
        header,
        payload: payload.to_vec(),
        signer_did: kid_url.did(),
    })
}
