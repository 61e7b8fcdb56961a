//! # Register Endpoint
//!
//! `POST /daps`: verify a signed registration request, check the signer is
//! allowed to claim the DID, and persist it.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::bearer::derive_did;
use crate::dap::RegistrationRequest;
use crate::handlers::{Error, Response, Result};
use crate::store::{Registry, StoreError};
use crate::{OPERATOR_SECRET, Provider};

/// Body of a successful registration. Empty for now: the registry does not
/// counter-sign registrations.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct RegisterResponse {}

/// Register a handle.
///
/// The request is accepted when its signature verifies over the request
/// digest and the signer is either the DID being registered or the registry
/// operator.
///
/// # Errors
///
/// Returns `BadRequest` for an unreadable body, `Unauthorized` for a bad or
/// unauthorized signature, `Conflict` if the DID or handle is taken, and
/// `Internal` for anything else.
pub async fn register(provider: &impl Provider, body: &[u8]) -> Result<Response<RegisterResponse>> {
    let request: RegistrationRequest = serde_json::from_slice(body).map_err(|e| {
        debug!("rejecting registration: {e}");
        Error::BadRequest("failed to unmarshal request body".into())
    })?;

    let decoded = request.verify(provider).await.map_err(|e| {
        debug!(id = %request.id, "rejecting registration: {e}");
        Error::Unauthorized(format!("invalid signature: {e}"))
    })?;

    let signer = decoded.signer_did;
    if signer != request.did && signer != operator_did(provider).await? {
        debug!(id = %request.id, signer = %signer, did = %request.did, "signer not authorized");
        return Err(Error::Unauthorized(
            "invalid signature. signer DID does not match the provided DID or registry's DID"
                .into(),
        ));
    }

    match Registry::new(provider).create(&request).await {
        Ok(()) => {
            info!(id = %request.id, dap = %request.dap(), did = %request.did, "registered");
            Ok(Response::created(RegisterResponse {}))
        }
        Err(e @ (StoreError::DidConflict | StoreError::HandleConflict)) => {
            debug!(id = %request.id, "rejecting registration: {e}");
            Err(Error::Conflict(e.to_string()))
        }
        Err(StoreError::Storage(e)) => {
            error!(id = %request.id, "failed to write DAP: {e:#}");
            Err(Error::Internal(e))
        }
    }
}

async fn operator_did(provider: &impl Provider) -> Result<String> {
    let secret = provider.secret(OPERATOR_SECRET).await.map_err(|e| {
        error!("failed to read operator secret: {e:#}");
        Error::Internal(e)
    })?;
    let Some(secret) = secret else {
        error!("operator secret {OPERATOR_SECRET} is not set");
        return Err(Error::Internal(anyhow::anyhow!("operator secret not set")));
    };
    derive_did(&secret).map_err(|e| {
        error!("failed to derive operator DID: {e:#}");
        Error::Internal(e)
    })
}
