use axum::{
    Router,
    extract::Extension,
    routing::{get, post},
};
use std::{path::PathBuf, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

mod config;
mod errors;
mod handlers;
mod storage;

use config::AppConfig;
use handlers::PublicBase;
use storage::{InMemoryStorage, LocalFileStorage, Storage};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    let config = AppConfig::from_env();

    let storage: Arc<dyn Storage> = match config.storage_type.as_str() {
        "memory" => Arc::new(InMemoryStorage::new()),
        "local" => Arc::new(
            LocalFileStorage::new(PathBuf::from(&config.storage_path))
                .expect("Failed to initialize local storage"),
        ),
        _ => panic!("Invalid storage type"),
    };

    let app = app(storage, PublicBase(config.public_url.clone())).fallback_service(
        ServeDir::new(&config.frontend_dir).append_index_html_on_directories(true),
    );

    let addr = config.socket_addr();
    tracing::info!("Server running on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

fn app(storage: Arc<dyn Storage>, base: PublicBase) -> Router {
    Router::new()
        .route("/upload", post(handlers::upload))
        .route("/images", get(handlers::list_images))
        .route(
            "/images/{filename}",
            get(handlers::get_image)
                .put(handlers::rename_image)
                .delete(handlers::delete_image),
        )
        // The upload directory doubles as the public image prefix; routing it
        // through the storage trait keeps the backing store substitutable.
        .route("/uploads/{filename}", get(handlers::get_image))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(storage))
        .layer(Extension(base))
}
