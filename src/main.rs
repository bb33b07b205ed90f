use std::sync::Arc;

use axum::http::HeaderValue;
use filebox_service::{
    adapters::{
        create_app,
        repositories::{PgFileRepository, PgSessionRepository, PgUserRepository},
        state::AppState,
    },
    application::{
        repositories::{
            file_repository::FileRepository, session_repository::SessionRepository,
            user_repository::UserRepository,
        },
        services::AccessGuard,
    },
    domain::config::AppConfig,
    services,
};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // A missing .env file is fine; the real environment still applies.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("filebox_service=info,tower_http=info")),
        )
        .init();

    // Must be installed before the S3 client or reqwest open a TLS connection.
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let config = AppConfig::from_env().unwrap_or_else(|e| panic!("ERROR: {}", e));
    let port = config.server.port;

    let cors = match &config.server.cors_allowed_origins {
        Some(allowed_origins) => {
            let origins: Vec<HeaderValue> = allowed_origins
                .iter()
                .map(|s| s.parse().expect("Invalid CORS origin"))
                .collect();
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any)
        }
        // Development only.
        None => CorsLayer::permissive(),
    };

    tracing::info!("Connecting to database...");
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.server.database_max_connections)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&config.server.database_url)
        .await
        .expect("ERROR: Failed to connect to PostgreSQL database. Check DATABASE_URL and network connectivity.");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("ERROR: Failed to apply database migrations");
    tracing::info!("Database ready");

    let session_repo =
        Arc::new(PgSessionRepository::new(pool.clone())) as Arc<dyn SessionRepository>;
    let session_resolver = services::create_session_resolver(&config.auth, session_repo)
        .await
        .expect("ERROR: Failed to initialise the auth provider");
    let storage_service = services::create_storage_service(&config.storage);

    tracing::info!(
        "Using {} storage (bucket '{}') with {} sessions",
        storage_service.provider_name(),
        config.storage.bucket_name,
        session_resolver.provider_name()
    );

    let app_state = AppState {
        access_guard: AccessGuard::new(session_resolver),
        storage_service,
        file_repository: Arc::new(PgFileRepository::new(pool.clone())) as Arc<dyn FileRepository>,
        user_repository: Arc::new(PgUserRepository::new(pool)) as Arc<dyn UserRepository>,
        upload_settings: config.storage.upload_settings(),
    };

    let router = create_app(app_state).layer(cors);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .expect("Failed to bind to port");

    tracing::info!("Server listening on 0.0.0.0:{}", port);

    axum::serve(listener, router)
        .await
        .expect("Failed to start server");
}
