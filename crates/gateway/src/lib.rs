//! HTTP API gateway for MirrorMind.
//!
//! Exposes the contemplation loop over REST:
//!
//! - `POST /contemplate` — run a recursion, return the full thought sequence
//! - `GET  /status`      — model, thought count, uptime, available modes
//! - `GET  /modes`       — every mode with description and temperature
//! - `GET  /health`      — liveness probe
//!
//! Built on Axum. Requests are validated at the boundary (depth bounds,
//! known mode) before the loop runs; each request drives its own
//! independent recursion.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{Html, Json},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::info;

use mirrormind_config::AppConfig;
use mirrormind_core::error::EngineError;
use mirrormind_core::mode::RecursionMode;
use mirrormind_core::provider::Provider;
use mirrormind_core::thought::ThoughtRecord;
use mirrormind_engine::{ContemplationEngine, FailurePolicy, ThoughtJournal};

/// Shared application state for the gateway.
pub struct GatewayState {
    pub engine: Arc<ContemplationEngine>,
    pub default_depth: u32,
    pub max_depth: u32,
}

pub type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    // Match the original deployment: any origin may read the API.
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(landing_handler))
        .route("/contemplate", post(contemplate_handler))
        .route("/status", get(status_handler))
        .route("/modes", get(modes_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1 MB body limit
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Build a contemplation engine from configuration.
///
/// Shared by the gateway and the daemon so both facades drive the same
/// engine instance.
pub fn build_engine(
    config: &AppConfig,
    provider: Arc<dyn Provider>,
) -> Result<ContemplationEngine, EngineError> {
    let journal = ThoughtJournal::new(&config.journal.dir)?;
    Ok(ContemplationEngine::new(provider, &config.model, journal)
        .with_failure_policy(FailurePolicy::from_config(&config.engine.failure_policy))
        .with_max_depth(config.engine.max_depth)
        .with_max_tokens(config.engine.max_tokens))
}

/// Start the gateway HTTP server with a freshly built engine.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let router = mirrormind_providers::router::build_from_config(&config);
    let provider = router
        .default()
        .ok_or("No default provider configured")?;

    let engine = Arc::new(build_engine(&config, provider)?);
    serve(engine, &config).await
}

/// Serve the gateway over an existing engine (shared with other facades).
pub async fn serve(
    engine: Arc<ContemplationEngine>,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(GatewayState {
        engine,
        default_depth: config.engine.default_depth,
        max_depth: config.engine.max_depth,
    });

    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let app = build_router(state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ── Request / Response types ──────────────────────────────────────────────

#[derive(Deserialize)]
struct ContemplateRequest {
    /// The initial thought seed to begin recursion.
    prompt: String,
    /// Depth of recursion (1 to max_depth, default from config).
    #[serde(default)]
    depth: Option<u32>,
    /// Thinking mode to use (default "standard").
    #[serde(default)]
    mode: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct ThoughtDto {
    depth: u32,
    input: String,
    output: String,
    mode: String,
    timestamp: String,
}

impl From<&ThoughtRecord> for ThoughtDto {
    fn from(record: &ThoughtRecord) -> Self {
        Self {
            depth: record.depth,
            input: record.input.clone(),
            output: record.output.clone(),
            mode: record.mode.to_string(),
            timestamp: record.timestamp.to_rfc3339(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct StatusResponse {
    status: String,
    model: String,
    thoughts_processed: usize,
    /// Seconds since process start.
    uptime: u64,
    modes_available: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct ModeInfo {
    mode: String,
    description: String,
    temperature: f32,
}

#[derive(Serialize, Deserialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Serialize, Deserialize)]
struct ErrorResponse {
    error: String,
}

fn bad_request(message: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn contemplate_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ContemplateRequest>,
) -> Result<Json<Vec<ThoughtDto>>, (StatusCode, Json<ErrorResponse>)> {
    let depth = payload.depth.unwrap_or(state.default_depth);
    if depth == 0 || depth > state.max_depth {
        return Err(bad_request(format!(
            "depth must be between 1 and {}",
            state.max_depth
        )));
    }

    let mode = payload
        .mode
        .as_deref()
        .unwrap_or("standard")
        .parse::<RecursionMode>()
        .map_err(|e| bad_request(e.to_string()))?;

    info!(mode = %mode, depth, "contemplate request");

    let records = state
        .engine
        .contemplate(&payload.prompt, depth, mode)
        .await
        .map_err(|e| match e {
            EngineError::InvalidDepth { .. } => bad_request(e.to_string()),
            other => (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: other.to_string(),
                }),
            ),
        })?;

    Ok(Json(records.iter().map(ThoughtDto::from).collect()))
}

async fn status_handler(State(state): State<SharedState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "active".into(),
        model: state.engine.model().to_string(),
        thoughts_processed: state.engine.thoughts_processed().await,
        uptime: state.engine.uptime_secs(),
        modes_available: state.engine.modes_available(),
    })
}

async fn modes_handler() -> Json<Vec<ModeInfo>> {
    Json(
        RecursionMode::ALL
            .iter()
            .map(|mode| ModeInfo {
                mode: mode.to_string(),
                description: mode.description().to_string(),
                temperature: mode.temperature(),
            })
            .collect(),
    )
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

async fn landing_handler() -> Html<&'static str> {
    Html(concat!(
        "<html><head><title>MirrorMind API</title></head><body>",
        "<h1>MirrorMind</h1>",
        "<p>Recursive self-dialogue runtime.</p>",
        "<ul>",
        "<li><b>POST /contemplate</b> — generate recursive thoughts</li>",
        "<li><b>GET /status</b> — system status</li>",
        "<li><b>GET /modes</b> — available thinking modes</li>",
        "</ul>",
        "</body></html>",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use mirrormind_core::error::ProviderError;
    use mirrormind_core::message::Message;
    use mirrormind_core::provider::{ProviderRequest, ProviderResponse};
    use tower::ServiceExt;

    struct MockProvider {
        fail: bool,
    }

    #[async_trait]
    impl Provider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        async fn complete(
            &self,
            request: ProviderRequest,
        ) -> Result<ProviderResponse, ProviderError> {
            if self.fail {
                return Err(ProviderError::Network("connection refused".into()));
            }
            let prompt = &request.messages[0].content;
            Ok(ProviderResponse {
                message: Message::assistant(format!("thought on [{prompt}]")),
                model: request.model.clone(),
                usage: None,
            })
        }
    }

    fn test_state(fail: bool) -> (SharedState, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let journal = ThoughtJournal::new(tmp.path()).unwrap();
        let engine = Arc::new(ContemplationEngine::new(
            Arc::new(MockProvider { fail }),
            "tinyllama",
            journal,
        ));
        let state = Arc::new(GatewayState {
            engine,
            default_depth: 3,
            max_depth: 10,
        });
        (state, tmp)
    }

    async fn post_contemplate(
        state: SharedState,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let app = build_router(state);
        let req = Request::builder()
            .method("POST")
            .uri("/contemplate")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn contemplate_returns_chained_records() {
        let (state, _tmp) = test_state(false);
        let (status, body) = post_contemplate(
            state,
            serde_json::json!({
                "prompt": "What is consciousness?",
                "depth": 3,
                "mode": "philosophical"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let records: Vec<ThoughtDto> = serde_json::from_value(body).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].input, "What is consciousness?");
        for k in 1..records.len() {
            assert_eq!(records[k].input, records[k - 1].output);
        }
        for record in &records {
            assert_eq!(record.mode, "philosophical");
        }
    }

    #[tokio::test]
    async fn contemplate_defaults_depth_and_mode() {
        let (state, _tmp) = test_state(false);
        let (status, body) =
            post_contemplate(state, serde_json::json!({"prompt": "seed"})).await;

        assert_eq!(status, StatusCode::OK);
        let records: Vec<ThoughtDto> = serde_json::from_value(body).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].mode, "standard");
    }

    #[tokio::test]
    async fn depth_out_of_bounds_is_rejected() {
        let (state, _tmp) = test_state(false);

        let (status, body) = post_contemplate(
            state.clone(),
            serde_json::json!({"prompt": "seed", "depth": 0}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("depth"));

        let (status, _) = post_contemplate(
            state.clone(),
            serde_json::json!({"prompt": "seed", "depth": 11}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        // Boundary rejection happens before the loop runs
        assert_eq!(state.engine.thoughts_processed().await, 0);
    }

    #[tokio::test]
    async fn unknown_mode_is_rejected() {
        let (state, _tmp) = test_state(false);
        let (status, body) = post_contemplate(
            state,
            serde_json::json!({"prompt": "seed", "mode": "quantum"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("quantum"));
    }

    #[tokio::test]
    async fn provider_failure_maps_to_bad_gateway() {
        let (state, _tmp) = test_state(true);
        let (status, body) =
            post_contemplate(state, serde_json::json!({"prompt": "seed"})).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"].as_str().unwrap().contains("depth 1"));
    }

    #[tokio::test]
    async fn modes_endpoint_lists_all_modes() {
        let (state, _tmp) = test_state(false);
        let app = build_router(state);

        let req = Request::builder()
            .uri("/modes")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let modes: Vec<ModeInfo> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(modes.len(), 6);

        let mystical = modes.iter().find(|m| m.mode == "mystical").unwrap();
        assert_eq!(mystical.temperature, 1.0);
        let scientific = modes.iter().find(|m| m.mode == "scientific").unwrap();
        assert_eq!(scientific.temperature, 0.5);
    }

    #[tokio::test]
    async fn status_endpoint_reports_counters() {
        let (state, _tmp) = test_state(false);

        let (post_status, _) = post_contemplate(
            state.clone(),
            serde_json::json!({"prompt": "seed", "depth": 2}),
        )
        .await;
        assert_eq!(post_status, StatusCode::OK);

        let app = build_router(state);
        let req = Request::builder()
            .uri("/status")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let status: StatusResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(status.status, "active");
        assert_eq!(status.model, "tinyllama");
        assert_eq!(status.thoughts_processed, 2);
        assert_eq!(status.modes_available.len(), 6);
    }

    #[tokio::test]
    async fn landing_page_lists_endpoints() {
        let (state, _tmp) = test_state(false);
        let app = build_router(state);

        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("/contemplate"));
    }

    #[tokio::test]
    async fn health_endpoint() {
        let (state, _tmp) = test_state(false);
        let app = build_router(state);

        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
