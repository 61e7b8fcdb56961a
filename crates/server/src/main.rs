//! # DAP Registry Server
//!
//! Serves the registry over HTTP:
//!
//! - `POST /daps` registers a handle
//! - `GET /daps/{handle}` resolves a handle
//! - `GET /did.json` and `GET /.well-known/did.json` publish the operator's
//!   DID document
//!
//! `create-did <domain>` bootstraps an operator identity and prints it as a
//! portable DID, ready to be supplied as `DID_WEB_PORTABLE_DID`.

mod config;
mod error;
mod provider;
mod resolver;
mod router;

use anyhow::{Context, Result};
use clap::Parser;
use dap_registry::did::{ServiceBuilder, web};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{Cli, Command, ServeArgs};
use crate::provider::AppProvider;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match Cli::parse().command {
        Command::Serve(args) => serve(args).await,
        Command::CreateDid { domain } => create_did(&domain),
    }
}

async fn serve(args: ServeArgs) -> Result<()> {
    let provider = AppProvider::new(&args)?;
    let app = router::router(provider);

    let listener = tokio::net::TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("failed to bind {}", args.listen))?;
    info!("listening on {}", args.listen);
    axum::serve(listener, app).await?;
    Ok(())
}

fn create_did(domain: &str) -> Result<()> {
    let domain = domain.trim_end_matches('/');
    let host = domain.split_once("://").map_or(domain, |(_, rest)| rest);
    let scheme = domain.split_once("://").map_or("https", |(scheme, _)| scheme);
    let endpoint = format!("{scheme}://{host}/dap-registry");

    let bearer = web::create(
        domain,
        vec![ServiceBuilder::new("dap-registry").service_type("dap-registry").endpoint(endpoint)],
    )
    .context("failed to generate did:web")?;

    let portable = serde_json::to_string(&bearer.to_portable())
        .context("failed to marshal portable did")?;
    println!("{portable}");
    Ok(())
}
