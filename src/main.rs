//! Server: loads settings, prepares the database, serves the API.

use campus_registry::{app, apply_migrations, connect, ensure_database_exists, seed_from_file, AppState, Settings};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("campus_registry=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    ensure_database_exists(&settings.database_url).await?;
    let pool = connect(&settings).await?;
    apply_migrations(&pool).await?;
    if let Some(path) = &settings.seed_universities_path {
        seed_from_file(&pool, path).await?;
    }

    let listener = TcpListener::bind(settings.bind_addr).await?;
    let state = AppState::new(pool, settings);
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
