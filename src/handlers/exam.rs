// src/handlers/exam.rs

use axum::{Json, extract::State, response::IntoResponse};
use validator::ValidateArgs;

use crate::{
    error::AppError,
    models::{question::Question, test_spec::TestSpec},
    state::AppState,
};

/// Generates a test for one subject/topic.
///
/// * Loads the topic's source material when it exists.
/// * Topic-wise tests with context are split 70/30 between grounded and
///   general questions (ratio configurable); everything else is one call.
/// * Zero questions requested yields `200 []`; an empty result for a
///   non-zero request is a 500.
pub async fn generate_test(
    State(state): State<AppState>,
    Json(spec): Json<TestSpec>,
) -> Result<impl IntoResponse, AppError> {
    let assembler = state.assembler()?;

    spec.validate_with_args(&state.config.generation)?;

    if spec.num_questions <= 0 {
        return Ok(Json(Vec::<Question>::new()));
    }

    let context = state.catalog.load_context(&spec.subject, &spec.topic).await;
    if context.is_none() {
        tracing::debug!(
            "No source material for {}/{}, using generic context",
            spec.subject,
            spec.topic
        );
    }

    let questions = assembler
        .assemble(
            spec.test_type,
            context.as_deref(),
            &spec.topic,
            spec.num_questions,
        )
        .await;

    if questions.is_empty() {
        tracing::error!("No questions generated for '{}'", spec.topic);
        return Err(AppError::GenerationFailed(spec.topic));
    }

    Ok(Json(questions))
}
