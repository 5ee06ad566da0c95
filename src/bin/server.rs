use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use natega_engine::{DatasetStats, NategaError, SearchEngine, SearchHit, ServerConfig};

#[derive(Clone)]
struct AppState {
    engine: Arc<SearchEngine>,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "natega_server=debug,natega_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    tracing::info!("Starting Natega search server");
    tracing::info!("Database: {}", config.db_path);
    tracing::info!("Port: {}", config.port);

    // served from memory so concurrent searches never wait on the connection
    let engine = SearchEngine::open_snapshot(&config.db_path).await?;
    let stats = engine.stats().await?;
    tracing::info!("Serving {} records", stats.total_records);

    let state = AppState {
        engine: Arc::new(engine),
    };

    let app = router(state);

    let addr = config.bind_addr();
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/search", get(search_handler))
        .route("/stats", get(stats_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: natega_engine::VERSION.to_string(),
    })
}

async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchHit>>, AppError> {
    let hits = state.engine.search(params.q.as_deref()).await?;

    tracing::info!("{:?} → {} hits", params.q.as_deref().unwrap_or(""), hits.len());

    Ok(Json(hits))
}

async fn stats_handler(State(state): State<AppState>) -> Result<Json<DatasetStats>, AppError> {
    Ok(Json(state.engine.stats().await?))
}

// Error handling
struct AppError(NategaError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            NategaError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = self.0.to_string();

        tracing::error!("Error: {} - {}", status, message);

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<NategaError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
