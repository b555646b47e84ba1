// src/generation/quota.rs

use rand::seq::SliceRandom;

use super::{GenerationRequest, orchestrator::QuestionGenerator};
use crate::{
    config::GenerationSettings,
    models::{question::Question, test_spec::TestType},
};

/// Context sent when no source material could be found.
pub const NO_CONTEXT: &str = "No specific context provided.";
/// Context sent for the general-knowledge share of a topic-wise test.
pub const GENERAL_CONTEXT: &str = "General knowledge based.";

/// How many questions come from source material and how many from general knowledge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaSplit {
    pub from_context: i64,
    pub from_general: i64,
}

/// `from_context = ceil(ratio * n)`, the rest is general.
pub fn split_quota(num_questions: i64, context_ratio: f64) -> QuotaSplit {
    let total = num_questions.max(0);
    let from_context = ((total as f64) * context_ratio).ceil() as i64;
    let from_context = from_context.clamp(0, total);

    QuotaSplit {
        from_context,
        from_general: total - from_context,
    }
}

/// Builds a full test out of one or two generation calls.
#[derive(Clone)]
pub struct TestAssembler {
    generator: QuestionGenerator,
    context_ratio: f64,
}

impl TestAssembler {
    pub fn new(generator: QuestionGenerator, settings: &GenerationSettings) -> Self {
        Self {
            generator,
            context_ratio: settings.context_ratio,
        }
    }

    /// Produces the shuffled question set for a test.
    ///
    /// `context` is `None` when no source material exists for the topic; in
    /// that case the split is skipped whatever the test type.
    pub async fn assemble(
        &self,
        test_type: TestType,
        context: Option<&str>,
        topic: &str,
        num_questions: i64,
    ) -> Vec<Question> {
        let mut questions = match (test_type, context) {
            (TestType::TopicWise, Some(context)) => {
                let split = split_quota(num_questions, self.context_ratio);
                tracing::debug!(
                    "Splitting '{}' into {} context and {} general questions",
                    topic,
                    split.from_context,
                    split.from_general
                );

                let mut merged = Vec::with_capacity(num_questions.max(0) as usize);
                if split.from_context > 0 {
                    merged.extend(
                        self.generator
                            .generate(&GenerationRequest::new(topic, split.from_context, context))
                            .await,
                    );
                }
                if split.from_general > 0 {
                    merged.extend(
                        self.generator
                            .generate(&GenerationRequest::new(
                                topic,
                                split.from_general,
                                GENERAL_CONTEXT,
                            ))
                            .await,
                    );
                }
                merged
            }
            _ => {
                self.generator
                    .generate(&GenerationRequest::new(
                        topic,
                        num_questions,
                        context.unwrap_or(NO_CONTEXT),
                    ))
                    .await
            }
        };

        shuffle(&mut questions);
        questions
    }
}

fn shuffle(questions: &mut [Question]) {
    questions.shuffle(&mut rand::thread_rng());
}
