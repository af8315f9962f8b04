use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::analyze::{AnalysisClient, AnalysisOutcome};
use crate::models::ResumeAnalysis;

/// Shared state for the proxy. `analysis` is None when OPENAI_API_KEY was
/// not configured at startup; the routes report that instead of failing.
#[derive(Clone)]
pub struct AppState {
    pub analysis: Option<AnalysisClient>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("resumeText is required")]
    MissingResumeText,

    #[error("OpenAI API key not configured")]
    NotConfigured,

    #[error("{0}")]
    Upstream(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MissingResumeText => StatusCode::BAD_REQUEST,
            ApiError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Upstream(msg) => {
                error!("analyze-resume failed: {msg}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRequest {
    resume_text: Option<String>,
    #[serde(default)]
    job_description: String,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/analyze-resume", post(analyze_handler))
        .with_state(state)
}

/// GET /health — always 200, reports whether the AI credential is present.
async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "ok": true,
        "openaiConfigured": state.analysis.is_some(),
    }))
}

/// POST /api/analyze-resume — thin proxy over the OpenAI call. An upstream
/// response we cannot parse is not an error: it comes back as 200 with
/// empty arrays.
async fn analyze_handler(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<ResumeAnalysis>, ApiError> {
    let resume_text = request
        .resume_text
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();
    if resume_text.is_empty() {
        return Err(ApiError::MissingResumeText);
    }

    let client = state.analysis.as_ref().ok_or(ApiError::NotConfigured)?;

    let outcome = client
        .analyze(resume_text, &request.job_description)
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    let analysis = match outcome {
        AnalysisOutcome::Ready(analysis) => analysis,
        AnalysisOutcome::Unavailable => ResumeAnalysis::default(),
    };
    Ok(Json(analysis))
}

/// Runs the proxy until interrupted.
pub async fn serve(port: u16) -> Result<()> {
    let state = AppState {
        analysis: AnalysisClient::from_env(),
    };
    if state.analysis.is_none() {
        info!("OPENAI_API_KEY not set; analyze-resume will answer 503");
    }

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    info!("Listening on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
