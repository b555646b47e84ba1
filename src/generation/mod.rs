// src/generation/mod.rs

pub mod orchestrator;
pub mod prompt;
pub mod quota;
pub mod sanitizer;

pub use orchestrator::QuestionGenerator;
pub use quota::TestAssembler;

/// One call's worth of generation input.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub topic: String,
    pub num_questions: i64,
    pub context: String,
}

impl GenerationRequest {
    pub fn new(topic: &str, num_questions: i64, context: &str) -> Self {
        Self {
            topic: topic.to_string(),
            num_questions,
            context: context.to_string(),
        }
    }
}
