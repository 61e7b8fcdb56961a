//! Routes and axum handlers.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use dap_registry::{Provider, handlers};
use serde::Serialize;

use crate::error::AppError;

pub fn router<P: Provider + 'static>(provider: P) -> Router {
    Router::new()
        .route("/daps", post(register::<P>))
        .route("/daps/", get(missing_handle::<P>))
        .route("/daps/{handle}", get(resolve::<P>))
        .route("/did.json", get(did_json::<P>))
        .route("/.well-known/did.json", get(well_known_did_json::<P>))
        .with_state(provider)
}

fn reply<T: Serialize>(response: handlers::Response<T>) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::OK);
    (status, Json(response.body)).into_response()
}

async fn register<P: Provider>(State(provider): State<P>, body: Bytes) -> Result<Response, AppError> {
    Ok(reply(handlers::register(&provider, &body).await?))
}

async fn resolve<P: Provider>(
    State(provider): State<P>, Path(handle): Path<String>,
) -> Result<Response, AppError> {
    Ok(reply(handlers::resolve(&provider, &handle).await?))
}

async fn missing_handle<P: Provider>(State(provider): State<P>) -> Result<Response, AppError> {
    Ok(reply(handlers::resolve(&provider, "").await?))
}

async fn did_json<P: Provider>(State(provider): State<P>) -> Result<Response, AppError> {
    Ok(handlers::resolve_root(&provider).await?.map_or_else(not_found, reply))
}

async fn well_known_did_json<P: Provider>(State(provider): State<P>) -> Result<Response, AppError> {
    Ok(handlers::resolve_well_known(&provider).await?.map_or_else(not_found, reply))
}

fn not_found() -> Response {
    StatusCode::NOT_FOUND.into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Method, Request};
    use http_body_util::BodyExt;
    use insta::assert_json_snapshot as assert_snapshot;
    use serde_json::Value;
    use test_utils::{body, identity, operator, signed_request};
    use tower::ServiceExt;

    use super::*;

    async fn send(app: Router, method: Method, uri: &str, body: Vec<u8>) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .expect("should build request");
        let response = app.oneshot(request).await.expect("should respond");
        let status = response.status();
        let bytes = response.into_body().collect().await.expect("should read body").to_bytes();
        (status, bytes.to_vec())
    }

    fn json(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).expect("should be JSON")
    }

    #[tokio::test]
    async fn register_and_resolve() {
        let operator = operator("didpay.me").expect("should create operator");
        let provider = test_utils::Provider::with_operator(&operator).expect("should create");
        let alice = identity("did:example:123").expect("should create identity");
        provider.publish(alice.document.clone());
        let app = router(provider);

        let request = signed_request("alice", "did:example:123", &alice).expect("should sign");
        let (status, bytes) =
            send(app.clone(), Method::POST, "/daps", body(&request).expect("should serialize")).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_snapshot!(json(&bytes), @"{}");

        let again = signed_request("bob", "did:example:123", &alice).expect("should sign");
        let (status, bytes) =
            send(app.clone(), Method::POST, "/daps", body(&again).expect("should serialize")).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_snapshot!(json(&bytes), @r#"
        {
          "message": "DID already registered",
          "status": 409
        }
        "#);

        let (status, bytes) = send(app.clone(), Method::GET, "/daps/alice", vec![]).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&bytes)["did"], "did:example:123");

        let (status, bytes) = send(app.clone(), Method::GET, "/daps/bob", vec![]).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_snapshot!(json(&bytes), @r#"
        {
          "message": "handle not found",
          "status": 404
        }
        "#);

        let (status, bytes) = send(app, Method::GET, "/daps/", vec![]).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json(&bytes)["message"], "expected handle in path");
    }

    #[tokio::test]
    async fn malformed_and_unauthorized() {
        let operator = operator("didpay.me").expect("should create operator");
        let provider = test_utils::Provider::with_operator(&operator).expect("should create");
        let app = router(provider);

        let (status, _) = send(app.clone(), Method::POST, "/daps", b"{".to_vec()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let stranger = dap_registry::did::jwk::create().expect("should create did:jwk");
        let request = signed_request("alice", "did:example:123", &stranger).expect("should sign");
        let (status, _) =
            send(app, Method::POST, "/daps", body(&request).expect("should serialize")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn document_paths() {
        let operator = operator("didpay.me").expect("should create operator");
        let provider = test_utils::Provider::with_operator(&operator).expect("should create");
        let app = router(provider);

        let (status, bytes) = send(app.clone(), Method::GET, "/.well-known/did.json", vec![]).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&bytes)["id"], "did:web:didpay.me");

        let (status, bytes) = send(app, Method::GET, "/did.json", vec![]).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(bytes.is_empty());
    }
}
