// src/models/question.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A generated multiple-choice question.
///
/// Decoded from model output, so every field is validated before a
/// question is accepted. `topic` is not produced by the model; it is
/// attached after a successful parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Question {
    #[validate(length(min = 1))]
    pub question: String,

    /// Exactly four answer choices, in display order.
    #[validate(length(equal = 4))]
    pub options: Vec<String>,

    /// Index into `options` of the correct choice.
    #[validate(range(min = 0, max = 3))]
    pub correct_answer_index: i64,

    #[serde(default)]
    pub explanation: String,

    #[serde(default)]
    pub topic: String,
}
