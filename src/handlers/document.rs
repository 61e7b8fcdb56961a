//! # DID Document Endpoints
//!
//! `GET /did.json` and `GET /.well-known/did.json` publish the registry
//! operator's DID document. Exactly one of the two serves it, chosen by the
//! shape of the operator's DID (see [`web::location`]). The document is
//! re-derived from the operator secret on every call.

use tracing::error;

use crate::bearer::derive_document;
use crate::did::Document;
use crate::did::web::{self, DocumentLocation};
use crate::handlers::{Error, Response, Result};
use crate::{OPERATOR_SECRET, Provider};

/// Serve the operator document at `/did.json`. Returns `None` (not found)
/// unless the operator DID has a path component.
///
/// # Errors
///
/// Returns `Internal` if the operator secret is missing or unreadable.
pub async fn resolve_root(provider: &impl Provider) -> Result<Option<Response<Document>>> {
    serve_at(provider, DocumentLocation::Path).await
}

/// Serve the operator document at `/.well-known/did.json`. Returns `None`
/// (not found) unless the operator DID is a bare domain.
///
/// # Errors
///
/// Returns `Internal` if the operator secret is missing or unreadable.
pub async fn resolve_well_known(provider: &impl Provider) -> Result<Option<Response<Document>>> {
    serve_at(provider, DocumentLocation::WellKnown).await
}

async fn serve_at(
    provider: &impl Provider, location: DocumentLocation,
) -> Result<Option<Response<Document>>> {
    let document = operator_document(provider).await?;
    if web::location(&document.id) != Some(location) {
        return Ok(None);
    }
    Ok(Some(Response::ok(document)))
}

async fn operator_document(provider: &impl Provider) -> Result<Document> {
    let Some(secret) = provider.secret(OPERATOR_SECRET).await.map_err(|e| {
        error!("failed to read operator secret: {e:#}");
        Error::Internal(e)
    })?
    else {
        error!("operator secret {OPERATOR_SECRET} is not set");
        return Err(Error::Internal(anyhow::anyhow!("operator secret not set")));
    };

    derive_document(&secret).map_err(|e| {
        error!("failed to derive operator document: {e:#}");
        Error::Internal(e)
    })
}
