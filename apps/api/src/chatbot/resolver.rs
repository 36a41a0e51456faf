//! `process_message`: local rules first, then the classifier, then help text.

use std::time::Duration;

use tracing::{error, info, warn};

use crate::chatbot::answers::{self, HELP_MESSAGE, PROCESSING_ERROR};
use crate::chatbot::intent::{IntentClassifier, QueryIntent};
use crate::chatbot::patterns::{match_message, LocalQuery};
use crate::chatbot::queries::{self, RECENT_HIRES_LIMIT};
use crate::models::employee::{EmployeeStatus, RosterEntry};
use crate::store::{EmployeeStore, StoreError};

pub struct IntentResolver<'a> {
    store: &'a dyn EmployeeStore,
    classifier: Option<&'a dyn IntentClassifier>,
    classifier_timeout: Duration,
}

impl<'a> IntentResolver<'a> {
    pub fn new(
        store: &'a dyn EmployeeStore,
        classifier: Option<&'a dyn IntentClassifier>,
        classifier_timeout: Duration,
    ) -> Self {
        Self {
            store,
            classifier,
            classifier_timeout,
        }
    }

    /// Answers a free-text question in markdown. Never fails.
    pub async fn process_message(&self, message: &str) -> String {
        info!("Processing chat message: {message}");
        match self.resolve(message).await {
            Ok(answer) => answer,
            Err(err) => {
                error!("Chat message failed: {err}");
                PROCESSING_ERROR.to_string()
            }
        }
    }

    async fn resolve(&self, message: &str) -> Result<String, StoreError> {
        if let Some(query) = match_message(message) {
            let roster = self.store.active_roster().await?;
            return Ok(answer_local(query, &roster));
        }

        let Some(classifier) = self.classifier else {
            return Ok(HELP_MESSAGE.to_string());
        };

        let intent =
            match tokio::time::timeout(self.classifier_timeout, classifier.interpret_query(message))
                .await
            {
                Ok(Ok(intent)) => intent,
                Ok(Err(err)) => {
                    warn!("Intent classifier unavailable, using help text: {err}");
                    return Ok(HELP_MESSAGE.to_string());
                }
                Err(_) => {
                    warn!(
                        "Intent classifier timed out after {}ms",
                        self.classifier_timeout.as_millis()
                    );
                    return Ok(HELP_MESSAGE.to_string());
                }
            };

        if intent == QueryIntent::Unknown {
            return Ok(HELP_MESSAGE.to_string());
        }

        let roster = self.store.active_roster().await?;
        Ok(answer_intent(intent, &roster))
    }
}

fn answer_local(query: LocalQuery, roster: &[RosterEntry]) -> String {
    match query {
        LocalQuery::PositionCount {
            needles,
            label,
            emoji,
        } => answers::position_count(queries::count_by_any_position(roster, needles), label, emoji),
        LocalQuery::DepartmentCount(department) => {
            answers::department_count(queries::count_by_department(roster, department), department)
        }
        LocalQuery::StatusCount(status) => {
            answers::status_count(queries::count_by_status(roster, status), status)
        }
        LocalQuery::SalaryStats => answers::salary_stats(queries::salary_stats(roster).as_ref()),
        LocalQuery::GeneralStats => answers::general_stats(&queries::general_stats(roster)),
        LocalQuery::DepartmentBreakdown => {
            answers::department_breakdown(&queries::department_breakdown(roster))
        }
        LocalQuery::RecentHires => {
            answers::recent_hires(&queries::recent_hires(roster, RECENT_HIRES_LIMIT))
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn answer_intent(intent: QueryIntent, roster: &[RosterEntry]) -> String {
    let general = || answers::general_stats(&queries::general_stats(roster));

    match intent {
        QueryIntent::CountByPosition { position } => match non_blank(position) {
            Some(position) => answers::position_match_count(
                queries::count_by_position(roster, &position),
                &position,
            ),
            None => general(),
        },
        QueryIntent::CountByDepartment { department } => match non_blank(department) {
            Some(department) => answers::department_count(
                queries::count_by_department(roster, &department),
                &department,
            ),
            None => general(),
        },
        QueryIntent::CountByStatus { status } => match non_blank(status) {
            Some(token) => match EmployeeStatus::from_vocabulary(&token) {
                Some(status) => {
                    answers::status_count(queries::count_by_status(roster, status), status)
                }
                None => answers::unknown_status(&token),
            },
            None => general(),
        },
        QueryIntent::SalaryStats => answers::salary_stats(queries::salary_stats(roster).as_ref()),
        QueryIntent::RecentHires { .. } => {
            answers::recent_hires(&queries::recent_hires(roster, RECENT_HIRES_LIMIT))
        }
        QueryIntent::GeneralStats => general(),
        QueryIntent::Unknown => HELP_MESSAGE.to_string(),
    }
}
