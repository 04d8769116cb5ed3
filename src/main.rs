//! EventHub server
//!
//! Main application entry point

use tracing::info;

use eventhub::{
    config::Settings,
    utils::logging,
    database::connection::{create_pool, run_migrations, DatabaseConfig},
    handlers::{self, AppState},
    services::ServiceFactory,
    state::SessionStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging
    logging::init_logging(&settings.logging)?;

    info!("Starting EventHub server...");

    // Initialize database connection
    info!("Connecting to database...");
    let db_config = DatabaseConfig {
        url: settings.database.url.clone(),
        max_connections: settings.database.max_connections,
        min_connections: settings.database.min_connections,
        ..DatabaseConfig::default()
    };
    let db_pool = create_pool(&db_config).await?;

    // Run database migrations
    run_migrations(&db_pool).await?;

    // Initialize session store
    info!("Connecting to Redis session store...");
    let sessions = SessionStore::new(settings.redis.clone()).await?;
    sessions.test_connection().await?;

    // Initialize services
    info!("Initializing services...");
    let notifier = ServiceFactory::notifier_from_settings(&settings);
    if settings.email.is_none() {
        info!("No SMTP configuration found; emails will be logged only");
    }
    let services = ServiceFactory::new(db_pool, settings.clone(), notifier);

    let state = AppState {
        services,
        sessions,
        settings: settings.clone(),
    };

    let app = handlers::router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("EventHub listening on {}", addr);
    axum::serve(listener, app).await?;

    info!("EventHub server has been shut down.");
    Ok(())
}
