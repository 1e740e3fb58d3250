use std::path::PathBuf;

use carebook_server::ServerBuilder;
use carebook_server::config::loader::{DEFAULT_CONFIG_PATH, load_config};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "carebook-server", version, about = "Carebook hospital management API")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, env = "CAREBOOK_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    // Load .env file if present (before anything else)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist - it's optional
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound) {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }

    // Initialize tracing early with the default level
    carebook_server::observability::init_tracing();

    let cli = Cli::parse();

    let cfg = match load_config(Some(cli.config.as_path())) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    tracing::info!(
        path = %cli.config.display(),
        backend = ?cfg.storage.backend,
        "Configuration loaded"
    );

    carebook_server::observability::apply_logging_level(&cfg.logging.level);

    let server = match ServerBuilder::new().with_config(cfg).build().await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Server initialization failed: {e:#}");
            std::process::exit(2);
        }
    };

    if let Err(e) = server.run().await {
        tracing::error!(error = %e, "Server exited with error");
        std::process::exit(1);
    }
}
