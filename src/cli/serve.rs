// src/cli/serve.rs — Default command: run the service

use std::sync::Arc;

use crate::api::{self, ApiState};
use crate::infra::config::Config;
use crate::recorder::geo::UnknownGeoResolver;
use crate::recorder::notify::LogNotifier;
use crate::recorder::VisitRecorder;
use crate::registry::sweeper::{self, SweepPolicy};
use crate::registry::SessionRegistry;

/// Run the HTTP API and the sweeper until Ctrl+C.
pub async fn run_serve(config: &Config) -> anyhow::Result<()> {
    let registry = SessionRegistry::new();
    let recorder = VisitRecorder::new(
        registry.clone(),
        Arc::new(UnknownGeoResolver),
        Arc::new(LogNotifier),
    );

    let policy = SweepPolicy::from(&config.retention);
    let sweeper = sweeper::spawn_sweeper(registry.clone(), policy);

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Shutting down...");
    };

    let result = api::start_server(&config.server, ApiState { recorder }, shutdown).await;

    sweeper.abort();
    tracing::info!("Stopped with {} live sessions", registry.size());
    result
}
