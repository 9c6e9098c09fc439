//! HTTP front-end: `GET /?url=&lang=` and `GET /health`.

use crate::{log_error_card, log_summary_card, Summarizer, SummaryOptions};
use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    pub log_level: String,
    pub log_json: bool,
    /// Defaults applied to every request.
    pub options: SummaryOptions,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenvy::dotenv();

        let mut options = SummaryOptions::default();
        options.lang = env::var("SUMMARY_LANG").ok();
        options.user_agent = env::var("SUMMARY_USER_AGENT").ok();
        options.response_timeout = optional_millis("SUMMARY_RESPONSE_TIMEOUT_MS")?;
        options.operation_timeout = optional_millis("SUMMARY_OPERATION_TIMEOUT_MS")?;
        options.content_length_limit = env::var("SUMMARY_CONTENT_LENGTH_LIMIT")
            .ok()
            .map(|v| v.parse())
            .transpose()
            .context("SUMMARY_CONTENT_LENGTH_LIMIT must be a byte count")?;
        options.content_length_required = env::var("SUMMARY_CONTENT_LENGTH_REQUIRED")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        options.agent.proxy = env::var("SUMMARY_PROXY").ok();

        Ok(Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_json: env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")),
            options,
        })
    }
}

fn optional_millis(key: &str) -> Result<Option<Duration>> {
    env::var(key)
        .ok()
        .map(|v| v.parse::<u64>().map(Duration::from_millis))
        .transpose()
        .with_context(|| format!("{key} must be a number of milliseconds"))
}

#[derive(Clone)]
pub struct AppState {
    summarizer: Arc<Summarizer>,
    defaults: SummaryOptions,
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    url: Option<String>,
    lang: Option<String>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    timestamp: String,
}

pub fn build_app(summarizer: Summarizer, defaults: SummaryOptions) -> Router {
    let state = AppState {
        summarizer: Arc::new(summarizer),
        defaults,
    };

    Router::new()
        .route("/", get(summary_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

async fn summary_handler(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();
    let started = Instant::now();
    info!(request_id = %request_id, url = ?query.url, lang = ?query.lang, "Request received");

    let response = match query.url {
        None => {
            warn!(request_id = %request_id, "Missing required URL parameter");
            (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": "url is required" })),
            )
                .into_response()
        }
        Some(url) => {
            let mut options = state.defaults.clone().with_request_id(request_id.clone());
            if options.lang.is_none() {
                options.lang = query.lang;
            }

            let report = state.summarizer.summarize_with_report(&url, options).await;
            match report.result {
                Ok(summary) => {
                    log_summary_card(&summary, &report.diagnostics);
                    (StatusCode::OK, Json(summary)).into_response()
                }
                Err(e) => {
                    e.log();
                    log_error_card(&e, &report.diagnostics);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(serde_json::json!({
                            "error": { "message": e.to_string(), "name": e.kind() }
                        })),
                    )
                        .into_response()
                }
            }
        }
    };

    info!(
        request_id = %request_id,
        status = response.status().as_u16(),
        response_time_ms = started.elapsed().as_millis() as u64,
        "Response sent"
    );
    response
}

async fn health_handler() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            timestamp: chrono::Utc::now().to_rfc3339(),
        }),
    )
}
