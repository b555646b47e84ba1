// src/models/chat.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// DTO for asking the tutor for a hint on the current question.
#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1, max = 2000, message = "user_query must not be empty."))]
    pub user_query: String,
    #[serde(default)]
    pub question_text: String,
    #[serde(default = "default_topic")]
    pub topic: String,
}

fn default_topic() -> String {
    "General".to_string()
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
}
