use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use warbler_web::{AppState, AppStateInner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "warbler_server=debug,warbler_web=debug,warbler_db=debug,tower_http=debug".into()
            }),
        )
        .init();

    // Config
    let db_path = std::env::var("DATABASE_URL").unwrap_or_else(|_| "warbler.db".into());
    let host = std::env::var("WARBLER_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("WARBLER_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    // Init database
    let db = warbler_db::Database::open(&PathBuf::from(&db_path))?;

    // Shared state
    let state: AppState = Arc::new(AppStateInner { db });

    let app = warbler_web::router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Warbler listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
