//! # Resolve Endpoint
//!
//! `GET /daps/{handle}`: look up the registration for a handle.

use tracing::error;

use crate::Provider;
use crate::dap::RegistrationRequest;
use crate::handlers::{Error, Response, Result};
use crate::store::{Registry, StoreError};

/// Return the registration request stored for `handle`, exactly as it was
/// submitted.
///
/// # Errors
///
/// Returns `BadRequest` if `handle` is empty, `NotFound` if it is not
/// registered, and `Internal` if the store fails.
pub async fn resolve(provider: &impl Provider, handle: &str) -> Result<Response<RegistrationRequest>> {
    if handle.is_empty() {
        return Err(Error::BadRequest("expected handle in path".into()));
    }

    match Registry::new(provider).get_handle_registration(handle).await {
        Ok(Some(request)) => Ok(Response::ok(request)),
        Ok(None) => Err(Error::NotFound("handle not found".into())),
        Err(StoreError::Storage(e)) => {
            error!(handle, "failed to query registration: {e:#}");
            Err(Error::Internal(e))
        }
        Err(e) => {
            error!(handle, "unexpected store error on lookup: {e}");
            Err(Error::Internal(e.into()))
        }
    }
}
