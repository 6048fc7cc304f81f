//! # Sidesa Server
//!
//! Entry point: loads configuration, installs logging and serves the API.

use sidesa_config::{load_config, DEFAULT_CONFIG_DIR};
use sidesa_core::SidesaResult;
use sidesa_server::startup::{init_logging, print_banner};
use sidesa_server::Application;
use tracing::error;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Application error: {}", e);
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> SidesaResult<()> {
    let config = load_config(DEFAULT_CONFIG_DIR)?;

    init_logging(&config.observability);
    print_banner();

    Application::new(config).run().await
}
