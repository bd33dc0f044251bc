use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::query::DEFAULT_PER_PAGE;
use crate::server::AppState;
use crate::state::JobStatus;
use crate::storage::Record;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// Raw `/api/data` parameters; unparseable values fall back to defaults
#[derive(Debug, Default, Deserialize)]
pub struct DataParams {
    page: Option<String>,
    per_page: Option<String>,
}

impl DataParams {
    fn page(&self) -> u64 {
        parse_positive(self.page.as_deref()).unwrap_or(1)
    }

    fn per_page(&self) -> u64 {
        parse_positive(self.per_page.as_deref()).unwrap_or(DEFAULT_PER_PAGE)
    }
}

fn parse_positive(value: Option<&str>) -> Option<u64> {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v >= 1)
}

#[derive(Debug, Serialize)]
pub struct StatusMessage {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
}

pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Paginated records; store errors degrade to an empty page
pub async fn data_handler(
    State(state): State<AppState>,
    Query(params): Query<DataParams>,
) -> Json<Vec<Record>> {
    match state.query.list(params.page(), params.per_page()) {
        Ok(records) => Json(records),
        Err(e) => {
            tracing::warn!("Serving an empty page, record store unavailable: {}", e);
            Json(Vec::new())
        }
    }
}

pub async fn status_handler(State(state): State<AppState>) -> Json<JobStatus> {
    Json(state.controller.status())
}

/// Fire-and-forget; the reply is the same whether or not a run was launched
pub async fn start_handler(State(state): State<AppState>) -> Json<StatusMessage> {
    let outcome = state.controller.start();
    tracing::debug!("Start request handled: {:?}", outcome);
    Json(StatusMessage { status: "started" })
}

pub async fn clear_handler(
    State(state): State<AppState>,
) -> Result<Json<StatusMessage>, ApiError> {
    state.controller.clear().map_err(|e| {
        tracing::error!("Clear failed: {}", e);
        ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: e.to_string(),
        }
    })?;

    Ok(Json(StatusMessage { status: "cleared" }))
}

/// Returns 200 OK if the record store answers, 503 Service Unavailable otherwise
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.query.ping() {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                database: "ok",
            }),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unhealthy",
                    database: "error",
                }),
            )
        }
    }
}
