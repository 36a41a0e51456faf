use std::sync::Arc;

use sqlx::PgPool;

use crate::chatbot::intent::IntentClassifier;
use crate::config::Config;
use crate::store::EmployeeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Used directly by the CRUD handlers and the export query.
    pub db: PgPool,
    /// Import pipeline and chatbot go through this seam.
    pub store: Arc<dyn EmployeeStore>,
    /// `None` when no LLM key is configured.
    pub classifier: Option<Arc<dyn IntentClassifier>>,
    pub config: Config,
}
