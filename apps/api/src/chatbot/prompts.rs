// Prompts for the chatbot's intent classifier.

/// Intent extraction prompt. Replace `{question}` before sending.
pub const INTENT_PROMPT_TEMPLATE: &str = r#"You interpret questions about the employees of a company.
The question may be in Spanish or English.

Return a JSON object with this EXACT schema:
{
  "intent": "count_by_position | count_by_department | count_by_status | salary_stats | recent_hires | general_stats | unknown",
  "parameters": {
    "position": "position name, or null",
    "department": "department name, or null",
    "status": "activo | inactivo | vacaciones | licencia, or null",
    "timeframe": "time frame if one is mentioned, or null"
  }
}

Rules:
- How many people hold a specific position → count_by_position with parameters.position
- Questions about one department → count_by_department with parameters.department
- Questions about an employment status → count_by_status with parameters.status
- General statistics or headcount → general_stats
- Salaries → salary_stats
- Recently hired people → recent_hires
- Anything else → unknown

Question: {question}"#;

pub fn build_intent_prompt(question: &str) -> String {
    INTENT_PROMPT_TEMPLATE.replace("{question}", question)
}
