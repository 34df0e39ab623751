//! HTTP API gateway for Medizap.
//!
//! Exposes the chat endpoints (`/predict-disease`,
//! `/predict-disease-by-symptoms`), the direct disease lookup
//! (`/predict-symptoms`), a symptom-list ranking (`/symptom-matches`), a
//! retrieval debugging endpoint (`/context`), and knowledge-base status and
//! reload.
//!
//! Built on Axum for high performance async HTTP.

pub mod api;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::{
    Router,
    extract::State,
    middleware::{self, Next},
    response::Json,
    routing::{get, post},
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use medizap_agent::MedicalAssistant;
use medizap_config::AppConfig;
use medizap_retrieval::{KnowledgeStore, SharedKnowledge};

/// Shared application state for the gateway.
pub struct GatewayState {
    pub config: AppConfig,
    pub knowledge: Arc<SharedKnowledge>,
    pub assistant: Arc<MedicalAssistant>,
    pub start_time: chrono::DateTime<chrono::Utc>,
}

impl GatewayState {
    pub fn new(
        config: AppConfig,
        knowledge: Arc<SharedKnowledge>,
        assistant: Arc<MedicalAssistant>,
    ) -> Self {
        Self {
            config,
            knowledge,
            assistant,
            start_time: chrono::Utc::now(),
        }
    }
}

pub type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
///
/// Layers applied:
/// - Bearer token authentication (open when no tokens are configured)
/// - CORS for the configured frontend origins
/// - Request body size limit (1 MB)
/// - HTTP trace logging
pub fn build_router(state: SharedState) -> Router {
    let cors = cors_layer(&state.config.gateway.allowed_origins);

    let protected = Router::new()
        .route("/predict-disease", post(api::predict_disease_handler))
        .route(
            "/predict-disease-by-symptoms",
            post(api::predict_by_symptoms_handler),
        )
        .route("/predict-symptoms", post(api::predict_symptoms_handler))
        .route("/symptom-matches", post(api::symptom_matches_handler))
        .route("/context", post(api::context_handler))
        .route("/knowledge", get(api::knowledge_handler))
        .route("/knowledge/reload", post(api::reload_knowledge_handler))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .merge(protected)
        .with_state(state)
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1 MB body limit
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::HeaderName::from_static(api::USER_ID_HEADER),
        ])
        .max_age(std::time::Duration::from_secs(3600))
}

/// Start the gateway HTTP server.
///
/// Loads the knowledge base once, builds the default provider, and serves
/// until the process is stopped.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let router = medizap_providers::build_from_config(&config);
    let provider = router
        .default()
        .ok_or("No default provider configured: set `default_provider` in config.toml")?;
    let model = medizap_providers::default_model(&config);

    let (disease_path, drug_path) = (
        config.knowledge.disease_path.clone(),
        config.knowledge.drug_path.clone(),
    );
    let store =
        tokio::task::spawn_blocking(move || KnowledgeStore::load(&disease_path, &drug_path))
            .await?;
    let stats = store.stats();

    let assistant = Arc::new(MedicalAssistant::from_config(provider, &model, &config));
    let state = Arc::new(GatewayState::new(
        config,
        Arc::new(SharedKnowledge::new(store)),
        assistant,
    ));

    if state.config.gateway.bearer_tokens.is_empty() {
        warn!("No bearer tokens configured, API is open to any caller");
    }

    let app = build_router(state.clone());

    info!(
        addr = %addr,
        provider = %state.assistant.provider_name(),
        model = %state.assistant.model(),
        diseases = stats.diseases,
        drugs = stats.drugs,
        "Gateway starting"
    );
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct RootResponse {
    message: String,
}

async fn root_handler(State(state): State<SharedState>) -> Json<RootResponse> {
    let stats = state.knowledge.snapshot().stats();
    let knowledge_status = if stats.diseases == 0 && stats.drugs == 0 {
        "Knowledge base is EMPTY.".to_string()
    } else {
        format!(
            "Knowledge base loaded: {} diseases, {} drugs.",
            stats.diseases, stats.drugs
        )
    };

    Json(RootResponse {
        message: format!(
            "Medizap API is running. {knowledge_status} Generation provider: {}.",
            state.assistant.provider_name()
        ),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_secs: u64,
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    let uptime = chrono::Utc::now()
        .signed_duration_since(state.start_time)
        .num_seconds()
        .max(0) as u64;

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: uptime,
    })
}

/// Authentication middleware for the API routes.
///
/// Requires a valid `Authorization: Bearer <token>` header once any tokens
/// are configured. With an empty token list every request is let through.
async fn auth_middleware(
    State(state): State<SharedState>,
    req: axum::extract::Request,
    next: Next,
) -> Result<axum::response::Response, StatusCode> {
    let tokens = &state.config.gateway.bearer_tokens;
    if tokens.is_empty() {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match auth_header {
        Some(token) if tokens.iter().any(|t| t == token) => Ok(next.run(req).await),
        _ => {
            warn!(
                path = %req.uri().path(),
                "Unauthorized request: missing or invalid bearer token"
            );
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use medizap_core::error::ProviderError;
    use medizap_core::provider::{CompletionRequest, CompletionResponse, Provider};
    use medizap_core::record::{DiseaseRecord, DrugRecord};
    use std::io::Write;
    use tower::ServiceExt;

    /// Lightweight mock provider for gateway tests.
    struct MockProvider {
        response: Result<String, ProviderError>,
    }

    impl MockProvider {
        fn new(text: &str) -> Self {
            Self {
                response: Ok(text.to_string()),
            }
        }

        fn failing(err: ProviderError) -> Self {
            Self { response: Err(err) }
        }
    }

    #[async_trait::async_trait]
    impl Provider for MockProvider {
        fn name(&self) -> &str {
            "gateway_mock"
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, ProviderError> {
            let text = self.response.clone()?;
            Ok(CompletionResponse {
                text,
                usage: None,
                model: request.model,
            })
        }
    }

    fn test_store() -> KnowledgeStore {
        KnowledgeStore::new(
            vec![DiseaseRecord {
                disease: "flu".into(),
                description: "A contagious respiratory illness.".into(),
                symptoms: vec!["fever".into(), "cough".into()],
                medicines: vec!["paracetamol".into()],
            }],
            vec![DrugRecord {
                name: "Paracetamol".into(),
                indication: "fever and pain".into(),
                category: "analgesic".into(),
                ..DrugRecord::default()
            }],
        )
    }

    fn state_with(provider: MockProvider, config: AppConfig) -> SharedState {
        let assistant = Arc::new(MedicalAssistant::from_config(
            Arc::new(provider),
            "mock-model",
            &config,
        ));
        Arc::new(GatewayState::new(
            config,
            Arc::new(SharedKnowledge::new(test_store())),
            assistant,
        ))
    }

    fn test_state() -> SharedState {
        state_with(
            MockProvider::new("  Flu usually passes in a week. Consult a doctor.  "),
            AppConfig::default(),
        )
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let app = build_router(test_state());

        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn root_reports_store_sizes() {
        let app = build_router(test_state());
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();

        let json = body_json(app.oneshot(req).await.unwrap()).await;
        let message = json["message"].as_str().unwrap();
        assert!(message.contains("1 diseases, 1 drugs"));
        assert!(message.contains("gateway_mock"));
    }

    #[tokio::test]
    async fn predict_disease_returns_trimmed_answer() {
        let app = build_router(test_state());
        let req = post_json("/predict-disease", serde_json::json!({"text": "fever and cough"}));

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(
            json["response_text"],
            "Flu usually passes in a week. Consult a doctor."
        );
        assert_eq!(json["disclaimer"], medizap_agent::DISCLAIMER);
    }

    #[tokio::test]
    async fn blank_question_gets_apology() {
        let app = build_router(test_state());
        let req = post_json(
            "/predict-disease-by-symptoms",
            serde_json::json!({"text": "   "}),
        );

        let json = body_json(app.oneshot(req).await.unwrap()).await;
        assert_eq!(json["response_text"], medizap_agent::APOLOGY);
    }

    #[tokio::test]
    async fn generation_failure_maps_status() {
        let state = state_with(
            MockProvider::failing(ProviderError::Network("connection refused".into())),
            AppConfig::default(),
        );
        let app = build_router(state);
        let req = post_json("/predict-disease", serde_json::json!({"text": "fever"}));

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn context_endpoint_exposes_ranking() {
        let app = build_router(test_state());
        let req = post_json("/context", serde_json::json!({"text": "fever and cough"}));

        let json = body_json(app.oneshot(req).await.unwrap()).await;
        assert_eq!(json["keywords"], serde_json::json!(["fever", "cough"]));
        assert_eq!(json["candidates"][0]["kind"], "disease");
        assert_eq!(json["candidates"][0]["name"], "flu");
        assert_eq!(json["candidates"][0]["score"], 4);
        assert_eq!(json["candidates"][1]["kind"], "drug");
        assert_eq!(json["candidates"][1]["score"], 3);
        assert!(json["prompt"].as_str().unwrap().ends_with("ASSISTANT:"));
    }

    #[tokio::test]
    async fn predict_symptoms_looks_up_by_name() {
        let app = build_router(test_state());
        let req = post_json("/predict-symptoms", serde_json::json!({"text": "Flu"}));

        let json = body_json(app.oneshot(req).await.unwrap()).await;
        assert_eq!(json["results"][0]["Disease"], "Flu");
        assert_eq!(json["results"][0]["Symptoms"], "Fever, cough");
        assert_eq!(json["message"], "Found information related to 'Flu':");
    }

    #[tokio::test]
    async fn symptom_matches_lists_without_generating() {
        let state = state_with(
            MockProvider::failing(ProviderError::Network("unused".into())),
            AppConfig::default(),
        );
        let req = post_json("/symptom-matches", serde_json::json!({"text": "cough, fever"}));

        let response = build_router(state).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["results"][0]["Disease"], "Flu");
        assert_eq!(json["message"], "Diseases potentially related to 'cough, fever':");
    }

    #[tokio::test]
    async fn bearer_tokens_are_enforced_when_configured() {
        let mut config = AppConfig::default();
        config.gateway.bearer_tokens = vec!["secret-token".into()];
        let state = state_with(MockProvider::new("ok"), config);

        let denied = build_router(state.clone())
            .oneshot(post_json("/context", serde_json::json!({"text": "fever"})))
            .await
            .unwrap();
        assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);

        let mut req = post_json("/context", serde_json::json!({"text": "fever"}));
        req.headers_mut()
            .insert("authorization", "Bearer secret-token".parse().unwrap());
        let allowed = build_router(state.clone()).oneshot(req).await.unwrap();
        assert_eq!(allowed.status(), StatusCode::OK);

        let health = build_router(state)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(health.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let app = build_router(test_state());
        let huge = "a".repeat(2 * 1024 * 1024);
        let req = post_json("/predict-disease", serde_json::json!({"text": huge}));

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn reload_swaps_in_new_store() {
        let dir = tempfile::tempdir().unwrap();
        let disease_path = dir.path().join("diseases.json");
        let drug_path = dir.path().join("drugs.json");
        std::fs::File::create(&disease_path)
            .unwrap()
            .write_all(
                br#"[{"disease":"asthma","symptoms":["wheezing"]},{"disease":"migraine"}]"#,
            )
            .unwrap();
        std::fs::write(&drug_path, "[]").unwrap();

        let mut config = AppConfig::default();
        config.knowledge.disease_path = disease_path;
        config.knowledge.drug_path = drug_path;
        let state = state_with(MockProvider::new("ok"), config);

        let before = state.knowledge.snapshot();
        let response = build_router(state.clone())
            .oneshot(post_json("/knowledge/reload", serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["diseases"], 2);
        assert_eq!(json["drugs"], 0);

        // Old snapshots stay intact; new ones see the reloaded data.
        assert_eq!(before.stats().diseases, 1);
        assert_eq!(state.knowledge.snapshot().stats().diseases, 2);

        let stats = build_router(state)
            .oneshot(Request::builder().uri("/knowledge").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json = body_json(stats).await;
        assert_eq!(json["diseases"], 2);
    }

    #[tokio::test]
    async fn failed_reload_keeps_current_store() {
        let dir = tempfile::tempdir().unwrap();
        let disease_path = dir.path().join("diseases.json");
        std::fs::write(&disease_path, "{ broken").unwrap();

        let mut config = AppConfig::default();
        config.knowledge.disease_path = disease_path;
        config.knowledge.drug_path = dir.path().join("missing.json");
        let state = state_with(MockProvider::new("ok"), config);

        let response = build_router(state.clone())
            .oneshot(post_json("/knowledge/reload", serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert!(
            json["error"]
                .as_str()
                .unwrap()
                .starts_with("Knowledge reload failed:")
        );

        let stats = state.knowledge.snapshot().stats();
        assert_eq!(stats.diseases, 1);
        assert_eq!(stats.drugs, 1);
    }
}
