//! stackdiff server
//!
//! Reads configuration from the environment (and `.env`), opens the diff
//! store, connects to the source-control host and serves the JSON routes.

use anyhow::Context;
use stackdiff_core::logging_facility;
use stackdiff_github::{GithubClient, SourceControl};
use stackdiff_server::{app, AppState, ServerConfig};
use stackdiff_store::SqliteDiffStore;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env().context("invalid configuration")?;
    logging_facility::init(config.log_profile);

    let store = SqliteDiffStore::open_url(&config.database_url)
        .with_context(|| format!("cannot open store at {}", config.database_url))?;

    let client = GithubClient::new(config.github_settings())?;
    match client.authenticate().await {
        Ok(user) => tracing::info!(login = %user.login, organization = %config.organization, "authenticated"),
        Err(e) => tracing::warn!(error = %e, "source-control authentication failed"),
    }

    let state = AppState::new(store, Arc::new(client), config.batch_settings());
    let router = app(state, &config.cors_origins);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("cannot bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "listening");

    axum::serve(listener, router).await?;
    Ok(())
}
