use std::net::SocketAddr;

use github_store::StoreSource;
use tracing::{info, warn};
use users_relay::{
    config::{self, RelayConfig},
    server::{self, state::AppState},
};

#[tokio::main]
async fn main() {
    // Initialize environment and logging
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .compact()
        .init();

    info!("Starting users relay server...");

    let relay_config = RelayConfig::from_env();

    let store = match &relay_config.github_token {
        Some(token) => Some(
            StoreSource::live(token.clone(), config::GITHUB_REPO, config::USERS_FILE_PATH)
                .into_store(),
        ),
        None => {
            warn!("GITHUB_PAT is not set; user-list requests will be rejected");
            None
        }
    };

    let app = server::create_app(AppState { store });
    let addr = SocketAddr::from((config::SERVER_HOST, relay_config.port));

    if let Err(e) = server::run_server(app, addr).await {
        eprintln!("Server error: {:?}", e);
        std::process::exit(1);
    }
}
