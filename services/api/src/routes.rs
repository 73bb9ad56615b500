//! API service routes

use axum::{
    Extension, Json, Router,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use common::forecast::ForecastMethod;
use common::models::NewSale;

use crate::{
    error::ApiError,
    middleware::{SessionId, session_middleware},
    models::{
        AiMapRequest, CreateSaleRequest, ForecastResponse, GenerateForecastRequest, SaleResponse,
    },
    state::AppState,
};

/// Largest accepted request body; bulk CSV imports get big
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Horizon bounds accepted over the wire
const MAX_FORECAST_MONTHS: u32 = 24;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let session_routes = Router::new()
        .route("/api/sales", get(get_sales).post(create_sale))
        .route("/api/sales/bulk", post(bulk_create_sales))
        .route("/api/sales/clear", post(clear_sales))
        .route("/api/sales/ai-map", post(ai_map_headers))
        .route("/api/forecasts", get(get_forecasts))
        .route("/api/forecasts/generate", post(generate_forecasts))
        .route("/api/forecasts/clear", post(clear_forecasts))
        .route_layer(middleware::from_fn(session_middleware));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .merge(session_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api-service"
    }))
}

/// Get the session's sales, most recent first
pub async fn get_sales(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
) -> impl IntoResponse {
    let sales = state.store.get_sales(session.as_str()).await;
    let body: Vec<SaleResponse> = sales.into_iter().map(SaleResponse::from).collect();
    Json(body)
}

/// Record a single sale
pub async fn create_sale(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Json(payload): Json<CreateSaleRequest>,
) -> impl IntoResponse {
    let sale = state
        .store
        .create_sale(session.as_str(), payload.into())
        .await;

    (StatusCode::CREATED, Json(SaleResponse::from(sale)))
}

/// Import a batch of sales, replacing the session's current data
pub async fn bulk_create_sales(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Json(payload): Json<Vec<CreateSaleRequest>>,
) -> impl IntoResponse {
    let batch: Vec<NewSale> = payload.into_iter().map(Into::into).collect();
    let count = state.store.create_sales_bulk(session.as_str(), batch).await;
    tracing::info!("imported {} sale(s) via bulk upload", count);

    (StatusCode::CREATED, Json(json!({ "count": count })))
}

/// Drop the session's sales and forecasts
pub async fn clear_sales(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
) -> impl IntoResponse {
    state.store.clear_sales(session.as_str()).await;
    tracing::info!("cleared session data");

    Json(json!({ "message": "Data cleared successfully" }))
}

/// Get the session's forecasts, most recent forecast month first
pub async fn get_forecasts(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
) -> impl IntoResponse {
    let forecasts = state.store.get_forecasts(session.as_str()).await;
    let body: Vec<ForecastResponse> = forecasts.into_iter().map(ForecastResponse::from).collect();
    Json(body)
}

/// Generate forecasts from the session's sales, replacing the stored set
pub async fn generate_forecasts(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Json(payload): Json<GenerateForecastRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.months < 1 || payload.months > MAX_FORECAST_MONTHS {
        return Err(ApiError::BadRequest(format!(
            "months must be between 1 and {}",
            MAX_FORECAST_MONTHS
        )));
    }

    let method = ForecastMethod::parse(&payload.method);
    let forecasts = state
        .forecast_service
        .generate(session.as_str(), payload.months, method)
        .await?;

    let body: Vec<ForecastResponse> = forecasts.into_iter().map(ForecastResponse::from).collect();
    Ok(Json(body))
}

/// Drop the session's forecasts, keeping its sales
pub async fn clear_forecasts(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
) -> impl IntoResponse {
    state.store.clear_forecasts(session.as_str()).await;

    Json(json!({ "message": "Forecasts cleared successfully" }))
}

/// Map CSV headers onto the sale schema with the AI integration
pub async fn ai_map_headers(
    State(state): State<AppState>,
    Json(payload): Json<AiMapRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mapping = state
        .ai
        .map_headers(&payload.headers, &payload.sample_rows)
        .await
        .map_err(|e| {
            tracing::error!("Failed to map headers: {}", e);
            ApiError::AiMapping("Failed to map headers with AI".to_string())
        })?;

    Ok(Json(mapping))
}
