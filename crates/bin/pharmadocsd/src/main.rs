//! Daemon entry point for pharmadocs.
//!
//! Loads configuration, seeds the session's document collection, and serves
//! the HTTP API and MCP surfaces over the same control plane.

mod config;
mod logging;

use std::sync::Arc;

use pharmadocs_api::{ApiServer, ApiServerConfig};
use pharmadocs_core::ask::{
    CannedAnswerService, FixedAnswerService, HttpAnsweringService, QuestionAnsweringService,
};
use pharmadocs_core::control::PharmaControlPlane;
use pharmadocs_core::seed::{SeedData, SeedError};
use pharmadocs_mcp::server::{McpHttpServerConfig, serve_stdio, serve_streamable_http};
use tokio::task::JoinSet;
use tracing::info;

use crate::config::{AskBackend, PharmaConfig};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = PharmaConfig::from_args()?;
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    let seed = load_seed(&config)?;
    let answers = build_answering_service(&config.ask_backend);
    let control = Arc::new(PharmaControlPlane::new(seed, answers)?);
    info!(
        user = %control.current_user().name,
        backend = ?config.ask_backend,
        "pharmadocs control plane ready"
    );

    let mut servers: JoinSet<Result<(), BoxError>> = JoinSet::new();

    if config.api_serve {
        let api_config = ApiServerConfig::new(config.api_addr)
            .with_max_body_bytes(config.api_max_body_bytes)
            .with_request_timeout(config.api_timeout);
        let server = ApiServer::new(control.as_ref().clone(), api_config);
        servers.spawn(server.serve());
    }

    if config.mcp_serve {
        info!("pharmadocs MCP listening on {}/mcp", config.mcp_http_addr);
        servers.spawn(serve_streamable_http(
            control.clone(),
            McpHttpServerConfig::new(config.mcp_http_addr),
        ));
    }

    if config.enable_stdio {
        servers.spawn(serve_stdio(control.clone()));
    }

    while let Some(joined) = servers.join_next().await {
        joined??;
    }
    Ok(())
}

fn load_seed(config: &PharmaConfig) -> Result<SeedData, SeedError> {
    let seed = match &config.seed_path {
        Some(path) => {
            info!(path = %path.display(), "loading seed data");
            SeedData::load(path)?
        }
        None => SeedData::demo(),
    };
    Ok(match &config.current_user {
        Some(user_id) => seed.with_current_user(user_id.clone()),
        None => seed,
    })
}

fn build_answering_service(backend: &AskBackend) -> Arc<dyn QuestionAnsweringService> {
    match backend {
        AskBackend::Fixed { delay } => Arc::new(FixedAnswerService::default().with_delay(*delay)),
        AskBackend::Canned { delay } => {
            Arc::new(CannedAnswerService::builtin().with_delay(*delay))
        }
        AskBackend::Http { base_url } => Arc::new(HttpAnsweringService::new(base_url.clone())),
    }
}
