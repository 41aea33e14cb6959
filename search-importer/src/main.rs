//! Search Import Entry Point
//!
//! Imports a CSV export into a named search repository:
//!
//! ```text
//! search-import <repository> <file>
//! ```

use dotenv::dotenv;
use search_importer::{Dependencies, ImportError};
use std::env;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() -> Result<(), ImportError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("search_importer=info,search_repository=info"));

    let json_logs = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init()
            .map_err(|e| ImportError::config(format!("Failed to initialize tracing: {}", e)))?;

        info!(
            service_name = "search-import",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with JSON format"
        );
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .try_init()
            .map_err(|e| ImportError::config(format!("Failed to initialize tracing: {}", e)))?;

        info!(
            service_name = "search-import",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with console output"
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), ImportError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing()?;

    let args: Vec<String> = env::args().collect();
    let (repository, file) = match args.as_slice() {
        [_, repository, file] => (repository.as_str(), file.as_str()),
        _ => {
            let program = args.first().map(String::as_str).unwrap_or("search-import");
            error!("Usage: {} <repository> <file>", program);
            return Err(ImportError::config("expected <repository> and <file> arguments"));
        }
    };

    info!(repository = %repository, file = %file, "Starting search import");

    let deps = match Dependencies::new().await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let importer = deps.importer(repository)?;
    match importer.import_file(repository, file).await {
        Ok(summary) => {
            info!(
                read = summary.read,
                imported = summary.imported,
                skipped = summary.skipped,
                batches = summary.flushed_batches,
                "Search import completed successfully"
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Search import failed");
            Err(e)
        }
    }
}
