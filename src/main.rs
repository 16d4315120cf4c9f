use std::net::SocketAddr;

use tracing::info;

use civicast::config::AppConfig;
use civicast::database::init_db;
use civicast::seed::{ensure_indexes, seed_default_admin};
use civicast::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .init();

    let config = AppConfig::load()?;

    let db = init_db(&config.database.url).await?;
    ensure_indexes(&db).await?;
    seed_default_admin(&db).await?;

    tokio::fs::create_dir_all(&config.storage.upload_dir).await?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let state = AppState { db, config };
    let app = civicast::build_router(state);

    info!("Server running at http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
