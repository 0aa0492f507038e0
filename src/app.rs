use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
};
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::{
    config::AppConfig,
    database,
    error::{AppError, Result},
    routes,
    services::{ImageStore, pending_images},
    store::{CatalogStore, MemoryCatalogStore, PgCatalogStore},
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
    pub images: ImageStore,
}

/// Connects the store, prepares the image folder and assembles the router.
pub async fn build(config: &AppConfig) -> Result<Router> {
    let store: Arc<dyn CatalogStore> = if config.database.is_in_memory() {
        tracing::warn!("Using in-memory catalog store, data will not survive a restart");
        Arc::new(MemoryCatalogStore::new())
    } else {
        let pool = database::create_pool(&config.database).await?;
        Arc::new(PgCatalogStore::new(pool))
    };

    let images = ImageStore::new(config.images.clone());
    images.ensure_folder().await?;

    let default_image = images.default_image_path();
    if !tokio::fs::try_exists(&default_image).await.unwrap_or(false) {
        tracing::warn!(
            "Default product image {} is missing, products created without an upload will fail",
            default_image.display()
        );
    } else {
        let repaired = pending_images::repair_pending_images(store.as_ref(), &images).await?;
        if repaired > 0 {
            tracing::info!("Repaired {} product(s) with a pending image", repaired);
        }
    }

    build_router(AppState { store, images }, config)
}

pub fn build_router(state: AppState, config: &AppConfig) -> Result<Router> {
    let allowed_origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| AppError::ConfigError(format!("Invalid CORS origin: {}", origin)))
        })
        .collect::<Result<Vec<_>>>()?;

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_origin(allowed_origins);

    let mut router = routes::create_router();

    let folder = state.images.folder();
    if !folder.is_empty() {
        router = router.nest_service(
            &format!("/{}", folder),
            ServeDir::new(state.images.folder_path()),
        );
    }

    let app = router
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(cors)
        .with_state(state);

    Ok(app)
}
