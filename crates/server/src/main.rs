use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{SessionId, SessionResponse, SubmitRequest, SubmitResponse},
};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod api;
mod app_state;
mod config;
mod sessions;

use api::{ApiContext, SubmitFailure};
use app_state::AppState;
use config::load_settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings()?;
    let api = ApiContext::new(
        settings.max_sessions,
        settings.display_precision,
        settings.calendar_year,
    );
    let state = AppState { api };
    let app = build_router(Arc::new(state), settings.body_limit_bytes);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, max_sessions = settings.max_sessions, "form host listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, body_limit_bytes: usize) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/sessions", post(http_open_session))
        .route(
            "/sessions/:session_id",
            get(http_view_session).delete(http_close_session),
        )
        .route("/sessions/:session_id/tables", post(http_add_table))
        .route("/sessions/:session_id/years", post(http_add_year))
        .route("/sessions/:session_id/submit", post(http_submit))
        .layer(RequestBodyLimitLayer::new(body_limit_bytes))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_open_session(State(state): State<Arc<AppState>>) -> Json<SessionResponse> {
    Json(api::open_session(&state.api).await)
}

async fn http_view_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionResponse>, (StatusCode, Json<ApiError>)> {
    api::view_session(&state.api, SessionId(session_id))
        .await
        .map(Json)
        .map_err(api_error)
}

async fn http_add_table(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionResponse>, (StatusCode, Json<ApiError>)> {
    api::add_table(&state.api, SessionId(session_id))
        .await
        .map(Json)
        .map_err(api_error)
}

async fn http_add_year(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionResponse>, (StatusCode, Json<ApiError>)> {
    api::add_year(&state.api, SessionId(session_id))
        .await
        .map(Json)
        .map_err(api_error)
}

async fn http_submit(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    body: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<Json<SubmitResponse>, Response> {
    let Json(req) = body.map_err(|rejection| {
        warn!(%session_id, error = %rejection.body_text(), "malformed form submission");
        let status = match rejection {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                StatusCode::BAD_REQUEST
            }
            ref other => other.status(),
        };
        (
            status,
            Json(ApiError::new(ErrorCode::Validation, rejection.body_text())),
        )
            .into_response()
    })?;

    api::submit_values(&state.api, SessionId(session_id), req.values)
        .await
        .map(Json)
        .map_err(|failure| match failure {
            SubmitFailure::Api(e) => api_error(e).into_response(),
            SubmitFailure::Rejected(rejected) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(rejected)).into_response()
            }
        })
}

async fn http_close_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    api::close_session(&state.api, SessionId(session_id))
        .await
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(api_error)
}

fn api_error(err: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match err.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(err))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
