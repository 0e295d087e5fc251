use std::sync::Arc;

use account_service::config::Config;
use account_service::domain::user::ports::UserServicePort;
use account_service::domain::user::service::UserService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::InMemoryUserRepository;
use account_service::outbound::repositories::PostgresUserRepository;
use auth::Authenticator;
use auth::PasswordHasher;
use auth::SigningKey;
use auth::TokenSettings;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,auth=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;
    let store = if config.database.is_some() {
        "postgresql"
    } else {
        "memory"
    };

    tracing::info!(
        http_port = config.server.http_port,
        store,
        jwt_algorithm = %config.jwt.algorithm,
        jwt_expiration_minutes = config.jwt.expiration_minutes,
        hashing_algorithm = %config.hashing.algorithm,
        "Configuration loaded"
    );

    let signing_key = SigningKey::resolve(config.jwt.secret.as_deref());
    let token_settings = TokenSettings::new(&config.jwt.algorithm, config.jwt.expiration_minutes)?;
    let password_hasher = PasswordHasher::from_config(&config.hashing.params())?;
    let authenticator = Arc::new(Authenticator::new(
        &signing_key,
        token_settings,
        password_hasher,
    )?);

    let hashing_permits = config.hashing.permits();
    tracing::info!(max_concurrent = hashing_permits, "Password hashing pool sized");

    let user_service: Arc<dyn UserServicePort> = match &config.database {
        Some(database) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(database.max_connections)
                .connect(&database.url)
                .await?;
            tracing::info!(
                max_connections = database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            Arc::new(UserService::new(
                Arc::new(PostgresUserRepository::new(pg_pool)),
                Arc::clone(&authenticator),
                hashing_permits,
            ))
        }
        None => {
            tracing::warn!("No database configured; accounts are kept in memory");

            Arc::new(UserService::new(
                Arc::new(InMemoryUserRepository::new()),
                Arc::clone(&authenticator),
                hashing_permits,
            ))
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(user_service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited successfully");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
