//! Server entry point: configuration, database bootstrap, and the axum
//! listener.

use dotenvy::dotenv;
use labtrack::api::{self, AppState};
use labtrack::config;
use labtrack::core::attachment::AttachmentStore;
use labtrack::errors::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load the application configuration
    let app_config = config::load_default()?;
    info!(
        database_url = %app_config.database_url,
        upload_dir = %app_config.upload_dir.display(),
        "configuration loaded"
    );

    // 4. Connect and bootstrap the schema
    let db = config::database::create_connection(&app_config.database_url).await?;
    config::database::create_tables(&db).await?;
    info!("database initialized");

    // 5. Prepare the attachment store
    let store = AttachmentStore::new(&app_config.upload_dir);
    store.ensure_dir().await?;

    // 6. Serve the API
    let app = api::router(AppState { db, store });
    let listener = tokio::net::TcpListener::bind(&app_config.bind_addr).await?;
    info!(addr = %app_config.bind_addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
