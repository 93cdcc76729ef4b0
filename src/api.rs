use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use std::time::Instant;
use uuid::Uuid;

use crate::{
    backend::OllamaClient,
    errors::{ErrorContext, FlashcardError},
    models::{ErrorBody, Flashcard, FlashcardRequest, HealthStatus},
    prompt::build_flashcard_prompt,
    validator::parse_flashcard,
};

// Import logging macros
use crate::{log_api_error, log_api_start, log_api_success, log_api_warn, log_validation};

#[derive(Clone)]
pub struct AppState {
    pub backend: OllamaClient,
}

impl AppState {
    pub fn new(backend: OllamaClient) -> Self {
        Self { backend }
    }
}

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    log_api_start!("health_check");

    let ready = state.backend.is_ready().await;
    if ready {
        log_api_success!("health_check", "backend ready");
        (StatusCode::OK, Json(HealthStatus::from_readiness(true)))
    } else {
        log_api_warn!("health_check", "backend not ready");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthStatus::from_readiness(false)),
        )
    }
}

pub async fn create_flashcard(
    State(state): State<AppState>,
    payload: Result<Json<FlashcardRequest>, JsonRejection>,
) -> Result<Json<Flashcard>, (StatusCode, Json<ErrorBody>)> {
    let request_id = Uuid::new_v4();
    let started = Instant::now();
    log_api_start!("create_flashcard", request_id = request_id);

    match generate_flashcard(&state.backend, payload, request_id).await {
        Ok(card) => {
            log_api_success!(
                "create_flashcard",
                request_id = request_id,
                duration_ms = started.elapsed().as_millis() as u64,
                "flashcard generated"
            );
            Ok(Json(card))
        }
        Err(e) => {
            let context = ErrorContext::new("create_flashcard").with_request_id(request_id);
            Err(e.to_response_with_context(context))
        }
    }
}

async fn generate_flashcard(
    backend: &OllamaClient,
    payload: Result<Json<FlashcardRequest>, JsonRejection>,
    request_id: Uuid,
) -> Result<Flashcard, FlashcardError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            log_api_warn!("create_flashcard", request_id = request_id, rejection.body_text());
            FlashcardRequest::default()
        }
    };
    let fact = request.fact().ok_or(FlashcardError::MissingFact)?;

    let prompt = build_flashcard_prompt(fact);

    let generated = backend.generate(&prompt).await.map_err(|e| {
        log_api_error!("create_flashcard", request_id = request_id, error = e, "generation failed");
        FlashcardError::from(e)
    })?;

    if generated.text().is_empty() {
        return Err(FlashcardError::EmptyModelOutput);
    }

    match parse_flashcard(generated.text()) {
        Ok(card) => {
            log_validation!(success, "model_output", "flashcard validated");
            Ok(card)
        }
        Err(e) => {
            log_validation!(failure, "model_output", error = e);
            Err(e.into())
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/flashcard", post(create_flashcard))
        .with_state(state)
}
