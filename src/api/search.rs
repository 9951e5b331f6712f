use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::models::{AwesomeSearchRequest, ProcessResponse, SearchMode, SearchRequest};
use crate::state::AppState;

/// POST /api/awesome_search - run the deterministic standard workflow.
pub async fn awesome_search(
    State(state): State<AppState>,
    Json(req): Json<AwesomeSearchRequest>,
) -> (StatusCode, Json<ProcessResponse>) {
    run_pipeline(state, req, SearchMode::Standard).await
}

/// POST /api/awesome_search_logic - run the LLM-driven logic workflow.
pub async fn awesome_search_logic(
    State(state): State<AppState>,
    Json(req): Json<AwesomeSearchRequest>,
) -> (StatusCode, Json<ProcessResponse>) {
    run_pipeline(state, req, SearchMode::Logic).await
}

async fn run_pipeline(
    state: AppState,
    req: AwesomeSearchRequest,
    mode: SearchMode,
) -> (StatusCode, Json<ProcessResponse>) {
    let request = SearchRequest {
        domain: req.domain,
        mode,
    };
    tracing::info!("API search ({mode}): domain '{}'", request.domain);

    let timeout = std::time::Duration::from_secs(state.config.request_timeout_secs);
    let result = tokio::time::timeout(timeout, state.pipeline.run(request)).await;

    match result {
        Ok(Ok(report)) => (
            StatusCode::OK,
            Json(ProcessResponse {
                code: 200,
                message: report.markdown,
            }),
        ),
        Ok(Err(e)) => {
            tracing::error!("Pipeline failed ({mode}): {e}");
            let code = e.status_code();
            let status =
                StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (
                status,
                Json(ProcessResponse {
                    code,
                    message: e.to_string(),
                }),
            )
        }
        Err(_) => {
            // Timing out drops the pipeline future, aborting in-flight searches.
            tracing::error!(
                "Pipeline timed out after {}s ({mode})",
                state.config.request_timeout_secs
            );
            (
                StatusCode::GATEWAY_TIMEOUT,
                Json(ProcessResponse {
                    code: 504,
                    message: format!(
                        "search timed out after {}s",
                        state.config.request_timeout_secs
                    ),
                }),
            )
        }
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: i64,
}

/// GET /api/health - liveness probe.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: chrono::Utc::now().timestamp(),
    })
}
