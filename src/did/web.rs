//! # DID Web
//!
//! The `did:web` method uses a web domain's reputation to confer trust. A
//! `did:web` identifier maps onto an HTTPS location: a bare domain resolves to
//! `/.well-known/did.json`, and a domain followed by path segments resolves to
//! `/<path>/did.json`.
//!
//! See:
//!
//! - <https://w3c-ccg.github.io/did-method-web>
//! - <https://w3c.github.io/did-resolution>

use std::fmt::Write;

use anyhow::{Result, bail};

use super::{DocumentBuilder, KeyId, Method, ServiceBuilder, Url, VerificationMethodBuilder};
use crate::bearer::BearerDid;
use crate::jose::JWK;

/// Where a `did:web` document is published relative to its host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentLocation {
    /// `/.well-known/did.json`, for a DID with no path component.
    WellKnown,

    /// `/<path>/did.json`, for a DID with one or more path components.
    Path,
}

/// Classify a DID by the number of `:` separators in it.
///
/// `did:web:example.com` (two separators) is a root identity published at
/// the well-known location; `did:web:example.com:user:alice` (more than two)
/// is published under its path. Anything with fewer separators is not a
/// servable identifier.
#[must_use]
pub fn location(did: &str) -> Option<DocumentLocation> {
    match did.matches(':').count() {
        2 => Some(DocumentLocation::WellKnown),
        n if n > 2 => Some(DocumentLocation::Path),
        _ => None,
    }
}

impl Url {
    /// Convert a `did:web` URL to an HTTP URL pointing to the location of the
    /// DID document.
    #[must_use]
    pub fn to_web_http(&self) -> String {
        // 1. Replace ":" with "/" in the method specific identifier to obtain the fully
        //    qualified domain name and optional path.
        let domain = self.id.replace(':', "/");

        // 2. If the domain contains a port percent decode the colon.
        let domain = domain.replace("%3A", ":");

        // 3. Generate an HTTPS URL to the expected location of the DID document by
        //    prepending https://.
        let mut url = format!("https://{domain}");

        // 4. If no path has been specified in the URL, append /.well-known.
        if !self.id.contains(':') {
            url = format!("{url}/.well-known");
        }

        // 5. Append /did.json to complete the URL.
        format!("{url}/did.json")
    }
}

/// Convert an HTTP URL into a host and path separated by colons suitable
/// for use in a `did:web` DID.
///
/// Valid examples:
/// - `https://example.com`
/// - `http://example.com/custom/path/`
/// - `https://example.com:8080`
///
/// # Errors
///
/// Will return an error if the url is not a valid URL or a host cannot be
/// parsed.
pub fn parse_url(url: &str) -> Result<String> {
    let url = url::Url::parse(url)?;
    let Some(host_str) = url.host_str() else {
        bail!("no host in url");
    };
    let mut host = host_str.to_string();
    if let Some(port) = url.port() {
        let _ = write!(host, "%3A{port}");
    }
    if let Some(path) = url.path().strip_prefix('/') {
        if !path.is_empty() {
            let formatted_path = path.trim_end_matches('/').replace('/', ":");
            let _ = write!(host, ":{formatted_path}");
        }
    }
    Ok(host)
}

/// Construct a default `did:web` DID from a URL. A missing scheme is taken to
/// be `https`.
///
/// # Errors
///
/// Will return an error if the url is not a valid URL or a host cannot be
/// parsed.
pub fn default_did(url: &str) -> Result<String> {
    let url = if url.contains("://") { url.to_string() } else { format!("https://{url}") };
    let host_and_path = parse_url(&url)?;
    Ok(format!("did:web:{host_and_path}"))
}

/// Create a new `did:web` identity for `domain` backed by a freshly generated
/// Ed25519 key, advertising the given services.
///
/// # Errors
///
/// Will fail if `domain` is not a valid host (with optional path) or a service
/// cannot be built.
pub fn create(domain: &str, services: Vec<ServiceBuilder>) -> Result<BearerDid> {
    create_with_key(domain, JWK::generate_ed25519()?, services)
}

/// Create a `did:web` identity for `domain` whose single verification method
/// is the public half of `key`.
///
/// # Errors
///
/// Will fail if `domain` is not a valid host (with optional path), `key` holds
/// no private key material, or a service cannot be built.
pub fn create_with_key(domain: &str, key: JWK, services: Vec<ServiceBuilder>) -> Result<BearerDid> {
    let did = default_did(domain)?;
    let url: Url = did.parse()?;
    if url.method != Method::Web {
        bail!("not a did:web: {did}");
    }

    let mut builder = DocumentBuilder::new(&did).verification_method(
        VerificationMethodBuilder::new(key.to_public()).key_id(KeyId::Index("0".into())),
    );
    for service in services {
        builder = builder.add_service(service);
    }

    BearerDid::new(builder.build()?, &key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_parser() {
        assert_eq!(parse_url("https://example.com").expect("should parse"), "example.com");
        assert_eq!(
            parse_url("http://example.com/custom/path/").expect("should parse"),
            "example.com:custom:path"
        );
        assert_eq!(parse_url("https://example.com:8080").expect("should parse"), "example.com%3A8080");
    }

    #[test]
    fn default_scheme() {
        assert_eq!(default_did("didpay.me").expect("should build"), "did:web:didpay.me");
        assert_eq!(
            default_did("https://credibil.io/issuers/example").expect("should build"),
            "did:web:credibil.io:issuers:example"
        );
    }

    #[test]
    fn web_http() {
        let url: Url = "did:web:example.com".parse().expect("should parse");
        assert_eq!(url.to_web_http(), "https://example.com/.well-known/did.json");

        let url: Url = "did:web:example.com%3A3000:user:alice".parse().expect("should parse");
        assert_eq!(url.to_web_http(), "https://example.com:3000/user/alice/did.json");
    }

    #[test]
    fn locations() {
        assert_eq!(location("did:web:example.com"), Some(DocumentLocation::WellKnown));
        assert_eq!(location("did:web:example.com%3A8080"), Some(DocumentLocation::WellKnown));
        assert_eq!(location("did:web:example.com:dap"), Some(DocumentLocation::Path));
        assert_eq!(location("did:web:example.com:a:b:c"), Some(DocumentLocation::Path));
        assert_eq!(location("did:web"), None);
        assert_eq!(location(""), None);
    }

    #[test]
    fn create_with_service() {
        let bearer = create(
            "didpay.me",
            vec![
                ServiceBuilder::new("dap-registry")
                    .service_type("dap-registry")
                    .endpoint("https://didpay.me/dap-registry"),
            ],
        )
        .expect("should create");

        assert_eq!(bearer.did, "did:web:didpay.me");
        assert_eq!(bearer.key_id(), "did:web:didpay.me#0");
        assert!(bearer.document.service("did:web:didpay.me#dap-registry").is_some());
    }
}
