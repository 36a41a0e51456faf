//! Chatbot answering aggregate questions about the workforce.
//!
//! Tier 1 is `patterns` (ordered keyword rules, always available). Tier 2 is
//! `intent` (an external classifier, optional and time-boxed). Both end in the
//! same `queries` over one roster snapshot, rendered by `answers`.

pub mod answers;
pub mod handlers;
pub mod intent;
pub mod patterns;
pub mod prompts;
pub mod queries;
pub mod resolver;
