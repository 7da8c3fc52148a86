//! Search Provisioner Main Entry Point
//!
//! Creates or deletes the resources of a search service and waits for the
//! indexer run. Exits non-zero when any step or the indexer run fails.

use dotenv::dotenv;
use search_provisioner::{Dependencies, ProvisioningError};
use std::env;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("search_provisioner=info,search_provisioner_repository=info")
    });

    let json = env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .init();

        info!(
            service_name = "search-provisioner",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with JSON format"
        );
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .init();

        info!(
            service_name = "search-provisioner",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with console output"
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), ProvisioningError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    info!("Starting search provisioner");

    let deps = match Dependencies::new() {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    match deps.orchestrator.run(deps.mode).await {
        Ok(Some(report)) => {
            info!(
                indexer = %report.indexer,
                polls = report.polls,
                warnings = report.warnings.len(),
                "Search provisioner completed successfully"
            );
            Ok(())
        }
        Ok(None) => {
            info!("Search provisioner completed successfully");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Search provisioner failed");
            Err(e)
        }
    }
}
