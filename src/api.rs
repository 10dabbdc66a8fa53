//! HTTP API Server for Recommendations
//!
//! Provides REST endpoints for the delivery layer to fetch ranked suggestions.
//! Unknown users are not an error: they get `200` with an empty list.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderValue, Method},
    response::Json,
    routing::get,
    Router,
};
use chrono::Timelike;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::recommendation::{
    ContextStrategy, RecommendationEngine, RecommendationRecord, Strategy, UserDigest,
};

/// Shared application state
pub struct AppState {
    pub engine: RecommendationEngine,
}

/// Query params for the smart endpoint
#[derive(Debug, Deserialize)]
pub struct SmartQuery {
    /// Hour of day (0-23); defaults to the server's local hour
    pub hour: Option<u32>,
}

/// Query params for the digest endpoint
#[derive(Debug, Deserialize)]
pub struct DigestQuery {
    pub limit: Option<usize>,
}

/// Response for every list endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub items: Vec<RecommendationRecord>,
    pub total: usize,
    pub strategy: Strategy,
    /// Mood picked by the smart endpoint, absent when it went personalized
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mood: Option<String>,
}

impl RecommendationsResponse {
    fn new(strategy: Strategy, items: Vec<RecommendationRecord>) -> Self {
        Self {
            total: items.len(),
            items,
            strategy,
            mood: None,
        }
    }
}

/// Response for the digest endpoint
#[derive(Debug, Serialize)]
pub struct DigestResponse {
    pub users: Vec<UserDigest>,
    pub total: usize,
    pub limit: usize,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub movies: usize,
    pub series: usize,
    pub users: usize,
}

/// Build the router with all routes and middleware
pub fn create_router(engine: RecommendationEngine, config: &ApiConfig) -> Router {
    let state = Arc::new(AppState { engine });

    let router = Router::new()
        // Health check
        .route("/health", get(health_check))
        // Personalized endpoints
        .route("/api/v1/recommendations/:user_id", get(get_recommendations))
        .route("/api/v1/recommendations/:user_id/hybrid", get(get_hybrid))
        .route(
            "/api/v1/recommendations/:user_id/collaborative",
            get(get_collaborative),
        )
        .route("/api/v1/recommendations/:user_id/smart", get(get_smart))
        // Non-personalized endpoints
        .route("/api/v1/trending", get(get_trending))
        .route("/api/v1/genres/:genre", get(get_by_genre))
        // Batch
        .route("/api/v1/digest", get(get_digest))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(config.request_timeout)),
        );

    if config.cors_enabled {
        router.layer(cors_layer(&config.cors_origins))
    } else {
        router
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() || origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any)
}

/// Start the API server, draining in-flight requests once `shutdown` resolves
pub async fn start_server<F>(
    engine: RecommendationEngine,
    config: &ApiConfig,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(engine, config);

    let addr = format!("{}:{}", config.host, config.port);
    info!("🚀 Starting recommendation API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let catalog = state.engine.catalog_snapshot();
    let movies = catalog.items(crate::catalog::MediaType::Movie).len();
    let series = catalog.items(crate::catalog::MediaType::Series).len();

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        movies,
        series,
        users: state.engine.user_profiles().len(),
    })
}

/// Run CPU-bound engine work off the async runtime
async fn blocking<F>(state: Arc<AppState>, f: F) -> Result<Vec<RecommendationRecord>>
where
    F: FnOnce(&RecommendationEngine) -> Vec<RecommendationRecord> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&state.engine))
        .await
        .map_err(Error::internal)
}

/// Content-based recommendations for a user
async fn get_recommendations(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<RecommendationsResponse>> {
    let items = blocking(state, move |engine| engine.recommend_for_user(&user_id)).await?;
    Ok(Json(RecommendationsResponse::new(Strategy::ContentBased, items)))
}

/// Hybrid recommendations for a user
async fn get_hybrid(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<RecommendationsResponse>> {
    let items = blocking(state, move |engine| engine.hybrid_for_user(&user_id)).await?;
    Ok(Json(RecommendationsResponse::new(Strategy::Hybrid, items)))
}

/// Collaborative recommendations for a user
async fn get_collaborative(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<RecommendationsResponse>> {
    let items = blocking(state, move |engine| engine.collaborative_for_user(&user_id)).await?;
    Ok(Json(RecommendationsResponse::new(
        Strategy::Collaborative,
        items,
    )))
}

/// Time-of-day aware recommendations for a user
async fn get_smart(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<SmartQuery>,
) -> Result<Json<RecommendationsResponse>> {
    let hour = query.hour.unwrap_or_else(|| chrono::Local::now().hour());
    if hour > 23 {
        return Err(Error::bad_request(format!(
            "hour must be between 0 and 23, got {}",
            hour
        )));
    }

    let mood = match state.engine.mood_for_hour(hour) {
        ContextStrategy::Mood(mood) => Some(mood.as_str().to_string()),
        ContextStrategy::Personalized => None,
    };

    let items = blocking(state, move |engine| engine.smart_for_user(&user_id, hour)).await?;
    let mut response = RecommendationsResponse::new(Strategy::Smart, items);
    response.mood = mood;
    Ok(Json(response))
}

/// Trending items across both media types
async fn get_trending(State(state): State<Arc<AppState>>) -> Result<Json<RecommendationsResponse>> {
    let items = blocking(state, |engine| engine.trending()).await?;
    Ok(Json(RecommendationsResponse::new(Strategy::Trending, items)))
}

/// Best rated items of one genre
async fn get_by_genre(
    State(state): State<Arc<AppState>>,
    Path(genre): Path<String>,
) -> Result<Json<RecommendationsResponse>> {
    let genre = genre.trim().to_string();
    if genre.is_empty() {
        return Err(Error::bad_request("genre must not be empty"));
    }
    let items = blocking(state, move |engine| engine.by_genre(&genre)).await?;
    Ok(Json(RecommendationsResponse::new(Strategy::Genre, items)))
}

/// Hybrid digest for every user
async fn get_digest(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DigestQuery>,
) -> Result<Json<DigestResponse>> {
    let limit = query
        .limit
        .unwrap_or(state.engine.config().digest_limit);
    if limit == 0 {
        return Err(Error::bad_request("limit must be greater than zero"));
    }

    let users = state.engine.digest(limit).await?;
    Ok(Json(DigestResponse {
        total: users.len(),
        users,
        limit,
    }))
}
