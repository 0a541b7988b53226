use std::sync::Arc;

use auth::Authenticator;
use auth::SessionCookieManager;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use user_service::config::Config;
use user_service::domain::user::service::UserService;
use user_service::inbound::http::router::create_router;
use user_service::outbound::repositories::PostgresUserRepository;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "user_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "user-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        jwt_issuer = %config.jwt.issuer,
        token_expiration_hours = config.jwt.expiration_hours,
        cookie_name = %config.cookie.name,
        cookie_secure = config.cookie.secure,
        store_timeout_secs = config.store.timeout_secs,
        "Configuration loaded"
    );

    if !config.cookie.secure {
        tracing::warn!("Session cookie is sent without the Secure attribute");
    }

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(config.store.timeout())
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let authenticator = Arc::new(
        Authenticator::with_issuer(config.jwt.secret.as_bytes(), config.jwt.issuer.as_str())
            .with_token_lifetime(chrono::Duration::hours(config.jwt.expiration_hours)),
    );
    let cookies = SessionCookieManager::new(config.cookie.name.as_str())
        .with_secure(config.cookie.secure)
        .with_lifetime(time::Duration::hours(config.cookie.expiration_hours));
    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool));

    let user_service = Arc::new(
        UserService::new(user_repository, Arc::clone(&authenticator), cookies)
            .with_store_timeout(config.store.timeout()),
    );

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(user_service, authenticator);

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");
    Ok(())
}
