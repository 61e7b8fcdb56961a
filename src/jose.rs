//! # JOSE
//!
//! JSON Web Keys and compact JSON Web Signatures, as used by the registry.
//! Key handling and signature primitives come from `ssi-jwk` and `ssi-jws`;
//! this module adds the detached-payload envelope and the `kid` to DID
//! binding on top.
//!
//! See:
//!
//! - <https://www.rfc-editor.org/rfc/rfc7515>
//! - <https://www.rfc-editor.org/rfc/rfc7517>

mod jws;

pub use ssi_jwk::{Algorithm, JWK, Params};
pub use ssi_jws::Header;
use thiserror::Error;

pub use self::jws::*;

/// Multicodec prefix for an Ed25519 public key.
const ED25519_CODEC: [u8; 2] = [0xed, 0x01];

/// Multicodec prefix for a compressed secp256k1 public key.
const SECP256K1_CODEC: [u8; 2] = [0xe7, 0x01];

/// Multicodec prefix for a compressed P-256 public key.
const P256_CODEC: [u8; 2] = [0x80, 0x24];

/// Errors raised while producing or checking a signed envelope.
#[derive(Debug, Error)]
pub enum Error {
    /// The envelope is not a well-formed compact JWS.
    #[error("malformed JWS: {0}")]
    Malformed(String),

    /// The JWS header names an algorithm the registry does not accept.
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The JWS header carries no `kid`, so the signer cannot be identified.
    #[error("JWS header is missing kid")]
    MissingKid,

    /// The signer's DID could not be resolved to key material.
    #[error("failed to resolve signer: {0}")]
    Resolution(String),

    /// The resolved key is not usable for verification.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// An attached payload differs from the expected one.
    #[error("payload does not match")]
    PayloadMismatch,

    /// The signature does not verify.
    #[error("signature verification failed")]
    Signature,

    /// Signing failed.
    #[error("signing failed: {0}")]
    Signing(String),
}

/// Decode a multicodec-prefixed multibase public key into a JWK.
///
/// # Errors
///
/// Returns an error if the string is not multibase or the codec is not one of
/// Ed25519, secp256k1, or P-256.
pub fn jwk_from_multibase(key: &str) -> Result<JWK, Error> {
    let (_, bytes) =
        multibase::decode(key).map_err(|e| Error::InvalidKey(format!("not multibase: {e}")))?;
    let Some((codec, key_bytes)) = bytes.split_first_chunk::<2>() else {
        return Err(Error::InvalidKey("multikey is too short".into()));
    };

    let jwk = match *codec {
        ED25519_CODEC => ssi_jwk::ed25519_parse(key_bytes),
        SECP256K1_CODEC => ssi_jwk::secp256k1_parse(key_bytes),
        P256_CODEC => ssi_jwk::p256_parse(key_bytes),
        _ => return Err(Error::InvalidKey("unsupported multicodec".into())),
    };
    jwk.map_err(|e| Error::InvalidKey(e.to_string()))
}

/// Encode the public half of a JWK as a multicodec-prefixed, base58btc
/// multibase string.
///
/// # Errors
///
/// Returns an error if the key type has no multicodec encoding here.
pub fn jwk_to_multibase(jwk: &JWK) -> Result<String, Error> {
    let invalid = |e: ssi_jwk::Error| Error::InvalidKey(e.to_string());
    let (codec, key_bytes) = match &jwk.params {
        Params::OKP(okp) if okp.curve == "Ed25519" => (ED25519_CODEC, okp.public_key.0.clone()),
        Params::EC(ec) if ec.curve.as_deref() == Some("secp256k1") => {
            (SECP256K1_CODEC, ssi_jwk::serialize_secp256k1(ec).map_err(invalid)?)
        }
        Params::EC(ec) if ec.curve.as_deref() == Some("P-256") => {
            (P256_CODEC, ssi_jwk::serialize_p256(ec).map_err(invalid)?)
        }
        _ => return Err(Error::InvalidKey("no multicodec for key type".into())),
    };

    let mut multi_bytes = codec.to_vec();
    multi_bytes.extend_from_slice(&key_bytes);
    Ok(multibase::encode(multibase::Base::Base58Btc, &multi_bytes))
}

/// Whether the JWK carries private key material.
#[must_use]
pub fn is_private(jwk: &JWK) -> bool {
    match &jwk.params {
        Params::OKP(okp) => okp.private_key.is_some(),
        Params::EC(ec) => ec.ecc_private_key.is_some(),
        Params::RSA(rsa) => rsa.private_exponent.is_some(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ed25519_multibase() {
        let jwk = JWK::generate_ed25519().expect("should generate").to_public();
        let multi = jwk_to_multibase(&jwk).expect("should encode");
        assert!(multi.starts_with("z6Mk"));

        let decoded = jwk_from_multibase(&multi).expect("should decode");
        assert!(decoded.equals_public(&jwk));
    }

    #[test]
    fn secp256k1_multibase() {
        let jwk = JWK::generate_secp256k1().expect("should generate").to_public();
        let multi = jwk_to_multibase(&jwk).expect("should encode");
        assert!(multi.starts_with("zQ3s"));

        let decoded = jwk_from_multibase(&multi).expect("should decode");
        assert!(decoded.equals_public(&jwk));
    }

    #[test]
    fn private_material() {
        let jwk = JWK::generate_ed25519().expect("should generate");
        assert!(is_private(&jwk));
        assert!(!is_private(&jwk.to_public()));
    }

    #[test]
    fn unknown_codec() {
        let multi = multibase::encode(multibase::Base::Base58Btc, [0x00, 0x01, 0x02]);
        assert!(matches!(jwk_from_multibase(&multi), Err(Error::InvalidKey(_))));
    }
}
