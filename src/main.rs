use std::sync::Arc;

use studiosite::config::SiteConfig;
use studiosite::content::PgContentStore;
use studiosite::identity::IdentityToolkit;
use studiosite::state::AppState;
use studiosite::{db, routes, services};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = SiteConfig::from_env().expect("invalid configuration");

    let pool = db::init_pool(&config.database_url, config.db_max_connections)
        .await
        .expect("database init failed");

    let identity = IdentityToolkit::new(&config.identity).expect("identity client init failed");
    tracing::info!(base_url = identity.base_url(), "identity service configured");

    let content = PgContentStore::new(pool.clone());
    let port = config.port;
    let state = AppState::new(pool, Arc::new(identity), Arc::new(content), config);

    // Expired sessions are swept in the background.
    let _sweeper = services::session::spawn_session_sweeper(state.pool.clone());

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "studiosite listening");
    axum::serve(listener, app).await.expect("server failed");
}
