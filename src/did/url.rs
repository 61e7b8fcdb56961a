//! Destructure DID URLs into strongly typed components.
//!
//! A DID URL is of the form
//!
//! `did:<method>:<method-specific-id>[/<path>][?<query>][#<fragment>]`.

use std::fmt::Display;
use std::str::FromStr;

use anyhow::{anyhow, bail};

use super::Method;

/// Structure of a DID URL.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Url {
    /// DID method.
    pub method: Method,

    /// Method-specific ID.
    ///
    /// For `did:web` this is the colon-separated host and optional path.
    pub id: String,

    /// Path segments following the method-specific ID.
    pub path: Option<Vec<String>>,

    /// Raw query string.
    pub query: Option<String>,

    /// Fragment, typically identifying a verification method or service.
    pub fragment: Option<String>,
}

impl Display for Url {
    /// Format the URL as a specification-compliant string.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "did:{}:{}", self.method, self.id)?;
        if let Some(path) = &self.path {
            write!(f, "/{}", path.join("/"))?;
        }
        if let Some(query) = &self.query {
            write!(f, "?{query}")?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{fragment}")?;
        }
        Ok(())
    }
}

impl FromStr for Url {
    type Err = anyhow::Error;

    /// Parse a string into a strongly typed DID URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the string does not start with `did:`, names an
    /// invalid method, or has an empty method-specific ID.
    fn from_str(s: &str) -> anyhow::Result<Self> {
        let Some(rest) = s.strip_prefix("did:") else {
            bail!("{s} does not start with 'did:'");
        };
        let (method, rest) = rest.split_once(':').ok_or_else(|| anyhow!("invalid DID URL: {s}"))?;
        let method = Method::from_str(method)?;

        let (rest, fragment) = match rest.split_once('#') {
            Some((r, f)) => (r, Some(f.to_string())),
            None => (rest, None),
        };
        let (rest, query) = match rest.split_once('?') {
            Some((r, q)) => (r, Some(q.to_string())),
            None => (rest, None),
        };
        let (id, path) = match rest.split_once('/') {
            Some((id, p)) if !p.is_empty() => {
                (id, Some(p.split('/').map(ToString::to_string).collect()))
            }
            Some((id, _)) => (id, None),
            None => (rest, None),
        };
        if id.is_empty() {
            bail!("missing method-specific id: {s}");
        }

        Ok(Self {
            method,
            id: id.to_string(),
            path,
            query,
            fragment,
        })
    }
}

impl Url {
    /// The resource identifier used to dereference a verification method or
    /// service inside a DID document: `did:<method>:<id>#<fragment>`.
    ///
    /// Without a fragment this is just the DID.
    #[must_use]
    pub fn resource_id(&self) -> String {
        let mut id = self.did();
        if let Some(fragment) = &self.fragment {
            id.push('#');
            id.push_str(fragment);
        }
        id
    }

    /// The DID part of the URL: `did:<method>:<method-specific-id>`.
    #[must_use]
    pub fn did(&self) -> String {
        format!("did:{}:{}", self.method, self.id)
    }
}
