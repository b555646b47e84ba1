// src/models/test_spec.rs

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::config::GenerationSettings;

/// Kind of test requested by the client.
///
/// Only `"topic-wise"` changes behavior; every other label (e.g. `"mock"`)
/// takes the single-call path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TestType {
    #[default]
    TopicWise,
    #[serde(other)]
    Other,
}

/// Inbound payload for `POST /api/generate-test`.
///
/// Validated against the configured [`GenerationSettings`].
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(context = GenerationSettings)]
pub struct TestSpec {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub topic: String,
    /// Values <= 0 mean "no questions requested".
    #[serde(default = "default_num_questions")]
    #[validate(custom(function = validate_num_questions, use_context))]
    pub num_questions: i64,
    #[serde(default)]
    pub test_type: TestType,
    /// Sent by older front-ends, unused.
    #[serde(default)]
    pub unit: Option<String>,
}

fn default_num_questions() -> i64 {
    10
}

fn validate_num_questions(
    num_questions: i64,
    settings: &GenerationSettings,
) -> Result<(), ValidationError> {
    if num_questions > settings.max_questions_per_request {
        return Err(ValidationError::new("num_questions_above_limit").with_message(
            format!(
                "num_questions must be at most {}",
                settings.max_questions_per_request
            )
            .into(),
        ));
    }
    Ok(())
}
