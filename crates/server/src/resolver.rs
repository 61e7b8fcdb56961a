//! `did:web` resolution over HTTPS.

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use dap_registry::did::{Document, Method, Url};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};

const AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Fetches `did:web` documents from their HTTPS location. Each fetch is
/// bounded by `timeout`, covering connect through reading the body.
#[derive(Clone, Debug)]
pub struct HttpResolver {
    client: reqwest::Client,
}

impl HttpResolver {
    pub fn new(timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client })
    }

    pub async fn resolve(&self, did: &str) -> Result<Document> {
        let url = Url::from_str(did)?;
        if url.method != Method::Web {
            bail!("unsupported DID method: {}", url.method);
        }

        let location = url.to_web_http();
        let response = self
            .client
            .get(&location)
            .send()
            .await
            .with_context(|| format!("failed to fetch {location}"))?
            .error_for_status()
            .with_context(|| format!("failed to fetch {location}"))?;
        response.json::<Document>().await.with_context(|| format!("invalid DID document at {location}"))
    }
}

#[cfg(test)]
mod tests {
    use tokio::net::TcpListener;

    use super::*;

    #[tokio::test]
    async fn other_methods_unsupported() {
        let resolver = HttpResolver::new(Duration::from_secs(1)).expect("should build");
        let err = resolver.resolve("did:example:123").await.expect_err("should fail");
        assert_eq!(err.to_string(), "unsupported DID method: example");
    }

    // A host that accepts the connection but never answers is given up on.
    #[tokio::test]
    async fn silent_host_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("should bind");
        let port = listener.local_addr().expect("should have address").port();
        tokio::spawn(async move {
            let mut held = vec![];
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });

        let resolver = HttpResolver::new(Duration::from_millis(200)).expect("should build");
        let did = format!("did:web:127.0.0.1%3A{port}");
        let err = tokio::time::timeout(Duration::from_secs(10), resolver.resolve(&did))
            .await
            .expect("should give up before the outer deadline")
            .expect_err("should fail");
        assert!(
            err.chain()
                .any(|e| e.downcast_ref::<reqwest::Error>().is_some_and(reqwest::Error::is_timeout)),
            "{err:#}"
        );
    }
}
