use std::collections::HashMap;
use axum::{
    body::Body,
    extract::Query,
    http::Method,
    response::Response,
    routing::any,
    Extension, Router,
};
use counts_core::{Config, CountsService};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;


type GenericError = Box<dyn std::error::Error + Send + Sync + 'static>;


#[tokio::main]
async fn main() -> Result<(), GenericError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    if config.credentials().is_none() {
        tracing::warn!("NOTION_TOKEN or DATABASE_ID is not set, every request will fail");
    }

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());

    let app = Router::new()
        .route("/", any(counts_handler))
        .route("/api/notion-counts", any(counts_handler))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(CountsService::new(config)));

    let listener = tokio::net::TcpListener::bind(format!("{host}:{port}")).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn counts_handler(
    Extension(service): Extension<CountsService>,
    method: Method,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let key = params.get("key").map(String::as_str);
    service.handle(&method, key).await.map(Body::from)
}
