//! Chat, lookup, and knowledge-base endpoints.
//!
//! Every chat-style handler reads one snapshot of the knowledge store at the
//! start of the request, so a concurrent reload never changes the records a
//! request is ranking mid-flight.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{error, info, warn};

use medizap_agent::DISCLAIMER;
use medizap_core::error::ProviderError;
use medizap_core::record::DiseaseRecord;
use medizap_retrieval::lookup::{capitalize, title_case};
use medizap_retrieval::{
    DEFAULT_LOOKUP_LIMIT, KnowledgeStore, RetrievedCandidate, StoreStats, lookup_diseases,
    parse_symptoms, rank_by_symptoms,
};

use crate::SharedState;

/// Header carrying the caller's user id, recorded with each interaction.
pub const USER_ID_HEADER: &str = "x-user-id";

// ── DTOs ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TextInput {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response_text: String,
    pub disclaimer: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DiseaseInfo {
    pub disease: String,
    pub description: String,
    pub symptoms: String,
    pub medicines: String,
}

impl From<&DiseaseRecord> for DiseaseInfo {
    fn from(d: &DiseaseRecord) -> Self {
        Self {
            disease: title_case(&d.disease),
            description: capitalize(&d.description),
            symptoms: capitalize(&d.symptoms.join(", ")),
            medicines: capitalize(&d.medicines.join(", ")),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LookupResponse {
    pub results: Vec<DiseaseInfo>,
    pub message: String,
    pub disclaimer: String,
}

#[derive(Debug, Serialize)]
pub struct ContextResponse {
    pub keywords: Vec<String>,
    pub candidates: Vec<RetrievedCandidate>,
    pub context: String,
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct KnowledgeResponse {
    #[serde(flatten)]
    pub stats: StoreStats,
    pub disease_path: PathBuf,
    pub drug_path: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

// ── Handlers ──────────────────────────────────────────────────────────────

/// `POST /predict-disease`
pub async fn predict_disease_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<TextInput>,
) -> Result<Json<ChatResponse>, ApiError> {
    chat(&state, &headers, "/predict-disease", &payload.text).await
}

/// `POST /predict-disease-by-symptoms`
pub async fn predict_by_symptoms_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<TextInput>,
) -> Result<Json<ChatResponse>, ApiError> {
    chat(&state, &headers, "/predict-disease-by-symptoms", &payload.text).await
}

async fn chat(
    state: &SharedState,
    headers: &HeaderMap,
    endpoint: &str,
    query: &str,
) -> Result<Json<ChatResponse>, ApiError> {
    let store = state.knowledge.snapshot();

    let answer = state
        .assistant
        .answer(&store, query)
        .await
        .map_err(|e| {
            error!(endpoint, error = %e, "Answer generation failed");
            error_response(e)
        })?;

    record_interaction(headers, endpoint, query, &answer.text);

    Ok(Json(ChatResponse {
        response_text: answer.text,
        disclaimer: DISCLAIMER.to_string(),
    }))
}

/// `POST /predict-symptoms`: direct lookup by disease name, no generation.
pub async fn predict_symptoms_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<TextInput>,
) -> Json<LookupResponse> {
    let store = state.knowledge.snapshot();
    let response = lookup(&store, &payload.text);

    record_interaction(
        &headers,
        "/predict-symptoms",
        &payload.text,
        &response.message,
    );

    Json(response)
}

fn lookup(store: &KnowledgeStore, text: &str) -> LookupResponse {
    let query = text.trim();
    if query.is_empty() {
        return LookupResponse {
            results: Vec::new(),
            message: "Please enter a disease name or keyword.".into(),
            disclaimer: DISCLAIMER.into(),
        };
    }

    let results: Vec<DiseaseInfo> = lookup_diseases(store, query, DEFAULT_LOOKUP_LIMIT)
        .into_iter()
        .map(DiseaseInfo::from)
        .collect();

    let message = if results.is_empty() {
        format!(
            "No information found for '{query}'. Please try a different disease name or keyword."
        )
    } else {
        format!("Found information related to '{query}':")
    };

    LookupResponse {
        results,
        message,
        disclaimer: DISCLAIMER.into(),
    }
}

/// `POST /symptom-matches`: diseases ranked by how many of the given
/// comma-separated symptoms they list, no generation.
pub async fn symptom_matches_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<TextInput>,
) -> Json<LookupResponse> {
    let store = state.knowledge.snapshot();
    let response = symptom_matches(&store, &payload.text);

    record_interaction(
        &headers,
        "/symptom-matches",
        &payload.text,
        &response.message,
    );

    Json(response)
}

fn symptom_matches(store: &KnowledgeStore, text: &str) -> LookupResponse {
    let symptoms = parse_symptoms(text);
    if symptoms.is_empty() {
        return LookupResponse {
            results: Vec::new(),
            message: "Please provide some symptoms to search for diseases.".into(),
            disclaimer: DISCLAIMER.into(),
        };
    }

    let results: Vec<DiseaseInfo> = rank_by_symptoms(store, &symptoms, DEFAULT_LOOKUP_LIMIT)
        .into_iter()
        .map(|m| DiseaseInfo::from(m.record))
        .collect();

    let message = if results.is_empty() {
        format!(
            "No diseases found matching the symptoms: '{text}'. Please try different symptoms or keywords."
        )
    } else {
        format!("Diseases potentially related to '{text}':")
    };

    LookupResponse {
        results,
        message,
        disclaimer: DISCLAIMER.into(),
    }
}

/// `POST /context`: show what retrieval would send, without generating.
pub async fn context_handler(
    State(state): State<SharedState>,
    Json(payload): Json<TextInput>,
) -> Json<ContextResponse> {
    let store = state.knowledge.snapshot();
    let (retrieval, prompt) = state.assistant.retriever().prompt(&store, &payload.text);

    Json(ContextResponse {
        keywords: retrieval.keywords,
        candidates: retrieval.candidates,
        context: retrieval.context,
        prompt,
    })
}

/// `GET /knowledge`
pub async fn knowledge_handler(State(state): State<SharedState>) -> Json<KnowledgeResponse> {
    Json(KnowledgeResponse {
        stats: state.knowledge.snapshot().stats(),
        disease_path: state.config.knowledge.disease_path.clone(),
        drug_path: state.config.knowledge.drug_path.clone(),
    })
}

/// `POST /knowledge/reload`: re-read both files and swap the store in.
///
/// Unlike startup, a reload never degrades to an empty store: if either
/// file cannot be read or parsed, the current store stays in place.
pub async fn reload_knowledge_handler(
    State(state): State<SharedState>,
) -> Result<Json<KnowledgeResponse>, ApiError> {
    let disease_path = state.config.knowledge.disease_path.clone();
    let drug_path = state.config.knowledge.drug_path.clone();

    let (d, p) = (disease_path.clone(), drug_path.clone());
    let loaded = tokio::task::spawn_blocking(move || KnowledgeStore::try_load(&d, &p))
        .await
        .map_err(|e| {
            error!(error = %e, "Knowledge reload task failed");
            reload_failed(e.to_string())
        })?;

    let store = loaded.map_err(|e| {
        warn!(error = %e, "Knowledge reload rejected, keeping current store");
        reload_failed(e.to_string())
    })?;

    let stats = store.stats();
    state.knowledge.replace(store);
    info!(
        diseases = stats.diseases,
        drugs = stats.drugs,
        "Knowledge base reloaded"
    );

    Ok(Json(KnowledgeResponse {
        stats,
        disease_path,
        drug_path,
    }))
}

fn reload_failed(reason: String) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: format!("Knowledge reload failed: {reason}"),
        }),
    )
}

// ── Helpers ───────────────────────────────────────────────────────────────

fn record_interaction(headers: &HeaderMap, endpoint: &str, query: &str, response: &str) {
    let user_id = headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("anonymous");

    info!(
        target: "medizap::interaction",
        user_id,
        endpoint,
        query_len = query.len(),
        response_len = response.len(),
        "Interaction handled"
    );
}

/// Map an assistant failure to an HTTP status and JSON body.
pub(crate) fn error_response(err: medizap_core::Error) -> ApiError {
    let status = match &err {
        medizap_core::Error::Provider(provider_err) => match provider_err {
            ProviderError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ProviderError::AuthenticationFailed(_) => StatusCode::BAD_GATEWAY,
            ProviderError::Network(_)
            | ProviderError::Timeout(_)
            | ProviderError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            ProviderError::ApiError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        },
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status != StatusCode::INTERNAL_SERVER_ERROR {
        warn!(status = status.as_u16(), "Generation backend unavailable");
    }

    (
        status,
        Json(ErrorResponse {
            error: format!("Error generating response: {err}"),
        }),
    )
}
