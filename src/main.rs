mod config;
mod error;
mod ingest;
mod models;
mod repository;
mod routes;
mod templates;

use std::sync::{Arc, RwLock};

use axum::{Router, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{config::Config, repository::CatalogueRepository};

pub struct AppState {
    pub config: Arc<Config>,
    pub repo: Arc<RwLock<CatalogueRepository>>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,filmshelf=debug".to_string()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);

    // One-shot load; a malformed dataset aborts startup here.
    let mut repo = CatalogueRepository::new();
    ingest::populate(&config.data_path, &mut repo)?;

    let state =
        Arc::new(AppState { config: config.clone(), repo: Arc::new(RwLock::new(repo)) });

    let app = Router::new()
        .route("/", get(routes::list_movies))
        .route("/movies", get(routes::list_movies))
        .route("/movie", get(routes::movie_detail).post(routes::submit_review))
        .route("/search", get(routes::search).post(routes::submit_search))
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
