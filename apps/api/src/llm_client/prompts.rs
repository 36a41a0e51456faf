// Prompt fragments shared by every caller of the LLM client. Feature-specific
// prompts live next to the feature (see `chatbot::prompts`).

/// System prompt that keeps replies machine-readable.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    Respond with a single valid JSON object and nothing else. \
    Do not use markdown code fences. \
    Do not add explanations.";
