//! Bestiary Engine - Main entry point.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bestiary_engine::infrastructure::{
    config::EngineConfig,
    content_sources::{DirectorySource, RemoteSource},
    diagnostics::{FanoutDiagnostics, JsonLinesDiagnostics, TracingDiagnostics},
    ports::{DiagnosticsSink, DocumentSource},
};
use bestiary_engine::use_cases::bestiary::BestiaryService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the engine may be run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bestiary_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Bestiary Engine");

    let config = EngineConfig::from_env();

    // Diagnostics go to the log and to the overflow file
    let overflow = JsonLinesDiagnostics::open(&config.overflow_log)?;
    tracing::info!(path = %overflow.path().display(), "Overflow log opened");
    let sink: Arc<dyn DiagnosticsSink> = Arc::new(
        FanoutDiagnostics::new()
            .with(Arc::new(TracingDiagnostics))
            .with(Arc::new(overflow)),
    );

    let source: Arc<dyn DocumentSource> = match config.remote_url {
        Some(ref url) => {
            tracing::info!(url = %url, "Using remote bestiary source");
            Arc::new(RemoteSource::new(url))
        }
        None => {
            tracing::info!(path = %config.data_path.display(), "Using local bestiary source");
            Arc::new(DirectorySource::new(&config.data_path))
        }
    };

    let mut service = BestiaryService::new(source, sink);
    if let Some(ref output) = config.output_path {
        service = service.with_output(output);
    }

    match config.sync_interval {
        None => {
            let report = service.sync().await?;
            tracing::info!(
                parsed = report.parsed,
                failed = report.failed,
                diagnostics = report.diagnostics,
                "Done"
            );
        }
        Some(period) => {
            tracing::info!(period_secs = period.as_secs(), "Starting periodic sync");
            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!(error = %e, "Failed to listen for shutdown signal");
                }
            };
            let runs = service.run_periodic(period, shutdown).await;
            tracing::info!(runs, monsters = service.len(), "Shutting down");
        }
    }

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
