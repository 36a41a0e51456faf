//! Tier 2: free-text → `QueryIntent` through an external classifier.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use crate::chatbot::prompts::build_intent_prompt;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{LlmClient, LlmError};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QueryParameters {
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub timeframe: Option<String>,
}

/// A classified question. Each variant keeps only the parameter it uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryIntent {
    CountByPosition { position: Option<String> },
    CountByDepartment { department: Option<String> },
    CountByStatus { status: Option<String> },
    SalaryStats,
    /// The timeframe is accepted but does not narrow the result.
    RecentHires { timeframe: Option<String> },
    GeneralStats,
    Unknown,
}

impl QueryIntent {
    pub fn from_tag(tag: &str, parameters: QueryParameters) -> Self {
        match tag.trim() {
            "count_by_position" => QueryIntent::CountByPosition {
                position: parameters.position,
            },
            "count_by_department" => QueryIntent::CountByDepartment {
                department: parameters.department,
            },
            "count_by_status" => QueryIntent::CountByStatus {
                status: parameters.status,
            },
            "salary_stats" => QueryIntent::SalaryStats,
            "recent_hires" => QueryIntent::RecentHires {
                timeframe: parameters.timeframe,
            },
            "general_stats" => QueryIntent::GeneralStats,
            _ => QueryIntent::Unknown,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            QueryIntent::CountByPosition { .. } => "count_by_position",
            QueryIntent::CountByDepartment { .. } => "count_by_department",
            QueryIntent::CountByStatus { .. } => "count_by_status",
            QueryIntent::SalaryStats => "salary_stats",
            QueryIntent::RecentHires { .. } => "recent_hires",
            QueryIntent::GeneralStats => "general_stats",
            QueryIntent::Unknown => "unknown",
        }
    }
}

/// Wire shape returned by the model.
#[derive(Debug, Deserialize)]
struct IntentPayload {
    intent: String,
    #[serde(default)]
    parameters: Option<QueryParameters>,
}

impl From<IntentPayload> for QueryIntent {
    fn from(payload: IntentPayload) -> Self {
        QueryIntent::from_tag(&payload.intent, payload.parameters.unwrap_or_default())
    }
}

/// Classifies a question that no local rule recognised.
///
/// Carried in `AppState` as `Option<Arc<dyn IntentClassifier>>`; `None` means
/// unmatched messages go straight to the help text.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn interpret_query(&self, text: &str) -> Result<QueryIntent, LlmError>;
}

pub struct LlmIntentClassifier {
    llm: LlmClient,
}

impl LlmIntentClassifier {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl IntentClassifier for LlmIntentClassifier {
    async fn interpret_query(&self, text: &str) -> Result<QueryIntent, LlmError> {
        let prompt = build_intent_prompt(text);
        let payload: IntentPayload = self.llm.call_json(&prompt, JSON_ONLY_SYSTEM).await?;
        let intent = QueryIntent::from(payload);
        info!("Classified question as {}", intent.tag());
        Ok(intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> QueryIntent {
        serde_json::from_str::<IntentPayload>(json).unwrap().into()
    }

    #[test]
    fn test_payload_with_parameters() {
        let intent = parse(
            r#"{"intent": "count_by_department",
                "parameters": {"position": null, "department": "Ventas", "status": null, "timeframe": null}}"#,
        );
        assert_eq!(
            intent,
            QueryIntent::CountByDepartment {
                department: Some("Ventas".to_string())
            }
        );
    }

    #[test]
    fn test_payload_without_parameters() {
        assert_eq!(parse(r#"{"intent": "salary_stats"}"#), QueryIntent::SalaryStats);
        assert_eq!(
            parse(r#"{"intent": "count_by_status", "parameters": {}}"#),
            QueryIntent::CountByStatus { status: None }
        );
    }

    #[test]
    fn test_unknown_tag() {
        assert_eq!(parse(r#"{"intent": "weather"}"#), QueryIntent::Unknown);
        assert_eq!(QueryIntent::Unknown.tag(), "unknown");
    }

    #[test]
    fn test_tag_round_trips() {
        for tag in [
            "count_by_position",
            "count_by_department",
            "count_by_status",
            "salary_stats",
            "recent_hires",
            "general_stats",
        ] {
            assert_eq!(QueryIntent::from_tag(tag, QueryParameters::default()).tag(), tag);
        }
    }

    #[test]
    fn test_prompt_embeds_question() {
        let prompt = build_intent_prompt("¿quién gana más?");
        assert!(prompt.ends_with("Question: ¿quién gana más?"));
    }
}
