//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{InMemoryBookRepository, PgBookRepository},
    config::{Config, StorageBackend},
    error::ApiError,
    seed::seed_if_empty,
    web::{self, rest::ApiDoc, state::AppState},
};
use axum::http::{header::{ACCEPT, CONTENT_TYPE}, Method};
use axum::Router;
use reading_list_core::ports::BookRepository;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Builds the storage backend selected in the configuration.
async fn build_repository(config: &Config) -> Result<Arc<dyn BookRepository>, ApiError> {
    match config.storage_backend {
        StorageBackend::Postgres => {
            info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(&config.database_url)
                .await?;
            let repository = PgBookRepository::new(db_pool);
            info!("Running database migrations...");
            repository.run_migrations().await?;
            info!("Database migrations complete.");
            Ok(Arc::new(repository))
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage; books are lost on restart.");
            Ok(Arc::new(InMemoryBookRepository::new()))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Build the Storage Backend ---
    let books = build_repository(&config).await?;
    if config.seed_sample_data {
        seed_if_empty(books.as_ref()).await?;
    }

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState::new(books));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    // --- 4. Create the Web Router ---
    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(web::router(app_state))
        .layer(cors);

    // --- 5. Start the Server ---
    info!("Starting Reading List Service on {}", config.bind_address);
    info!("Available endpoints:");
    info!("  GET    /health       - Health check");
    info!("  GET    /books        - Get all books");
    info!("  GET    /books/{{id}}   - Get specific book");
    info!("  POST   /books        - Add new book");
    info!("  PUT    /books/{{id}}   - Update book");
    info!("  DELETE /books/{{id}}   - Delete book");
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
