//! Route definitions and handlers for the gateway.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::analysis::{AnalysisRequest, Analyzer};
use crate::error::AnalysisError;

/// Largest accepted request body (50 MiB).
pub const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

const NO_DATA_MESSAGE: &str = "No data provided. Please include data in the request body.";

/// Creates the router with all routes configured.
pub fn create_router(analyzer: Arc<Analyzer>) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/models", get(models))
        .route("/summarize", post(summarize))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(analyzer)
}

// ============================================================================
// Bodies
// ============================================================================

#[derive(Debug, Deserialize)]
struct SummarizeBody {
    #[serde(default)]
    data: Value,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryMetadata {
    data_type: &'static str,
    record_count: usize,
    processed_at: String,
    model: String,
    truncated: bool,
}

#[derive(Debug, Serialize)]
struct SummaryResponse {
    success: bool,
    summary: String,
    metadata: SummaryMetadata,
}

/// Error response body.
///
/// `details` is the translated message; `providerDetails` is the provider's
/// own wording (credential redacted) when the failure came from upstream.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    provider_details: Option<String>,
}

fn bad_request(error: impl Into<String>, details: Option<String>) -> Response {
    let body = ErrorBody {
        error: error.into(),
        kind: None,
        details,
        provider_details: None,
    };
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

fn analysis_failure(err: AnalysisError) -> Response {
    let status =
        StatusCode::from_u16(err.kind.http_status()).unwrap_or(StatusCode::BAD_GATEWAY);
    let body = ErrorBody {
        error: "Failed to generate analysis".to_string(),
        kind: Some(err.kind.as_str()),
        details: Some(err.message),
        provider_details: err.detail,
    };
    (status, Json(body)).into_response()
}

// ============================================================================
// Handlers
// ============================================================================

async fn status(State(analyzer): State<Arc<Analyzer>>) -> Json<Value> {
    Json(json!({
        "message": "ScanBrief analysis API is running",
        "version": env!("CARGO_PKG_VERSION"),
        "defaultModel": analyzer.catalog().default_key(),
        "models": analyzer.catalog().keys(),
    }))
}

async fn models(State(analyzer): State<Arc<Analyzer>>) -> Json<Value> {
    let catalog = analyzer.catalog();
    let rows: Vec<Value> = catalog
        .models()
        .iter()
        .map(|m| {
            json!({
                "key": m.key,
                "family": m.family,
                "wireName": m.wire_name,
                "capabilities": m.capabilities,
                "default": m.key == catalog.default_key(),
            })
        })
        .collect();
    Json(json!({ "models": rows }))
}

/// Null and blank strings count as no data.
fn has_data(data: &Value) -> bool {
    match data {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

async fn summarize(
    State(analyzer): State<Arc<Analyzer>>,
    body: Result<Json<SummarizeBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(error = %rejection, "Rejected summarize body");
            return bad_request("Invalid request body", Some(rejection.body_text()));
        }
    };

    if !has_data(&body.data) {
        return bad_request(NO_DATA_MESSAGE, None);
    }

    let request = AnalysisRequest {
        data: body.data,
        model: body.model,
    };

    match analyzer.analyze(request).await {
        Ok(report) => {
            let response = SummaryResponse {
                success: true,
                summary: report.summary,
                metadata: SummaryMetadata {
                    data_type: report.metadata.data_type,
                    record_count: report.metadata.record_count,
                    processed_at: report.metadata.processed_at,
                    model: report.model_key,
                    truncated: report.truncated,
                },
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => analysis_failure(err),
    }
}
