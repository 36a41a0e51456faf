use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chatbot::resolver::IntentResolver;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

/// POST /api/v1/chatbot/ask
pub async fn handle_ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, AppError> {
    if req.message.trim().is_empty() {
        return Err(AppError::Validation("message must not be empty".to_string()));
    }

    let resolver = IntentResolver::new(
        state.store.as_ref(),
        state.classifier.as_deref(),
        state.config.llm_timeout,
    );
    let response = resolver.process_message(&req.message).await;

    Ok(Json(AskResponse {
        response,
        timestamp: Utc::now(),
    }))
}
