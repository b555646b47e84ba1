// src/generation/orchestrator.rs

use std::{fmt, time::Duration};

use validator::Validate;

use super::{
    GenerationRequest,
    prompt::{PromptVariant, build_prompt},
    sanitizer::sanitize,
};
use crate::{
    config::GenerationSettings,
    llm::{LlmError, SharedGenerator},
    models::question::Question,
};

/// Why a single attempt was discarded.
#[derive(Debug)]
pub enum GenerationError {
    Remote(LlmError),
    Parse(serde_json::Error),
    /// Decoded, but item `index` broke the question schema.
    Invalid { index: usize, reason: String },
    Empty,
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::Remote(e) => write!(f, "remote call failed: {}", e),
            GenerationError::Parse(e) => write!(f, "response is not a JSON array of questions: {}", e),
            GenerationError::Invalid { index, reason } => {
                write!(f, "question #{} is malformed: {}", index, reason)
            }
            GenerationError::Empty => write!(f, "model returned an empty array"),
        }
    }
}

impl std::error::Error for GenerationError {}

impl From<LlmError> for GenerationError {
    fn from(err: LlmError) -> Self {
        GenerationError::Remote(err)
    }
}

impl From<serde_json::Error> for GenerationError {
    fn from(err: serde_json::Error) -> Self {
        GenerationError::Parse(err)
    }
}

/// Position in the retry sequence.
///
/// `Attempt(0, Primary) -> Attempt(1, Fallback) -> ... -> Failed`; success
/// at any attempt leaves the sequence immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    Attempt { index: u32, variant: PromptVariant },
    Failed,
}

impl AttemptState {
    pub fn start(max_attempts: u32) -> Self {
        if max_attempts == 0 {
            AttemptState::Failed
        } else {
            AttemptState::Attempt {
                index: 0,
                variant: PromptVariant::Primary,
            }
        }
    }

    /// Transition taken after a failed attempt.
    pub fn after_failure(self, max_attempts: u32) -> Self {
        match self {
            AttemptState::Attempt { index, .. } if index + 1 < max_attempts => {
                AttemptState::Attempt {
                    index: index + 1,
                    variant: PromptVariant::Fallback,
                }
            }
            _ => AttemptState::Failed,
        }
    }
}

/// Drives prompt -> remote call -> sanitize -> decode -> validate, with a
/// fallback prompt on retry.
#[derive(Clone)]
pub struct QuestionGenerator {
    llm: SharedGenerator,
    max_attempts: u32,
    retry_delay: Duration,
}

impl QuestionGenerator {
    pub fn new(llm: SharedGenerator, settings: &GenerationSettings) -> Self {
        Self {
            llm,
            max_attempts: settings.max_attempts,
            retry_delay: settings.retry_delay,
        }
    }

    /// Generates questions for one request.
    ///
    /// Never fails: an empty vector means no attempt produced a usable
    /// array (or nothing was requested).
    pub async fn generate(&self, request: &GenerationRequest) -> Vec<Question> {
        if request.num_questions <= 0 {
            return Vec::new();
        }
        let count = request.num_questions as usize;

        let mut state = AttemptState::start(self.max_attempts);
        while let AttemptState::Attempt { index, variant } = state {
            match self.attempt(count, request, variant).await {
                Ok(questions) => {
                    tracing::info!(
                        "Generated {} questions for '{}' on attempt {} ({})",
                        questions.len(),
                        request.topic,
                        index + 1,
                        variant
                    );
                    return questions;
                }
                Err(e) => {
                    tracing::warn!(
                        "Attempt {} ({}) failed for '{}': {}",
                        index + 1,
                        variant,
                        request.topic,
                        e
                    );
                }
            }

            state = state.after_failure(self.max_attempts);
            if matches!(state, AttemptState::Attempt { .. }) {
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        tracing::error!(
            "Giving up on '{}' after {} attempts",
            request.topic,
            self.max_attempts
        );
        Vec::new()
    }

    async fn attempt(
        &self,
        count: usize,
        request: &GenerationRequest,
        variant: PromptVariant,
    ) -> Result<Vec<Question>, GenerationError> {
        let prompt = build_prompt(count, &request.topic, &request.context, variant);
        let raw = self.llm.generate_text(&prompt).await?;
        parse_questions(&sanitize(&raw), &request.topic)
    }
}

/// Decodes a sanitized response and tags every question with `topic`.
///
/// One malformed item rejects the whole batch.
pub fn parse_questions(cleaned: &str, topic: &str) -> Result<Vec<Question>, GenerationError> {
    let mut questions: Vec<Question> = serde_json::from_str(cleaned)?;

    if questions.is_empty() {
        return Err(GenerationError::Empty);
    }

    for (index, question) in questions.iter_mut().enumerate() {
        question
            .validate()
            .map_err(|e| GenerationError::Invalid {
                index,
                reason: e.to_string(),
            })?;
        question.topic = topic.to_string();
    }

    Ok(questions)
}

#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        sync::{Arc, Mutex},
    };

    use async_trait::async_trait;

    use super::*;
    use crate::llm::TextGenerator;

    /// Replays canned responses and records every prompt it receives.
    struct Scripted {
        responses: Mutex<VecDeque<Result<String, LlmError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn new(responses: Vec<Result<String, LlmError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TextGenerator for Scripted {
        async fn generate_text(&self, prompt: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok("no more scripted output".to_string()))
        }
    }

    fn questions_json(n: usize) -> String {
        let items: Vec<serde_json::Value> = (0..n)
            .map(|i| {
                serde_json::json!({
                    "question": format!("Question {}", i),
                    "options": ["A", "B", "C", "D"],
                    "correct_answer_index": i % 4,
                    "explanation": "Because."
                })
            })
            .collect();
        serde_json::to_string(&items).unwrap()
    }

    fn generator(llm: Arc<Scripted>) -> QuestionGenerator {
        let settings = GenerationSettings {
            retry_delay: Duration::ZERO,
            ..Default::default()
        };
        QuestionGenerator::new(llm, &settings)
    }

    fn request(n: i64) -> GenerationRequest {
        GenerationRequest {
            topic: "Percentage".to_string(),
            num_questions: n,
            context: "Percent means per hundred.".to_string(),
        }
    }

    #[test]
    fn state_machine_runs_primary_then_fallback_then_fails() {
        let s = AttemptState::start(2);
        assert_eq!(
            s,
            AttemptState::Attempt {
                index: 0,
                variant: PromptVariant::Primary
            }
        );
        let s = s.after_failure(2);
        assert_eq!(
            s,
            AttemptState::Attempt {
                index: 1,
                variant: PromptVariant::Fallback
            }
        );
        assert_eq!(s.after_failure(2), AttemptState::Failed);
        assert_eq!(AttemptState::start(0), AttemptState::Failed);
    }

    #[tokio::test]
    async fn zero_or_negative_request_makes_no_calls() {
        let llm = Scripted::new(vec![]);
        let generator = generator(llm.clone());

        assert!(generator.generate(&request(0)).await.is_empty());
        assert!(generator.generate(&request(-3)).await.is_empty());
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn first_success_short_circuits() {
        let fenced = format!("```json\n{}\n```", questions_json(3));
        let llm = Scripted::new(vec![Ok(fenced)]);
        let questions = generator(llm.clone()).generate(&request(3)).await;

        assert_eq!(questions.len(), 3);
        assert_eq!(llm.calls(), 1);
        assert!(questions.iter().all(|q| q.topic == "Percentage"));
        assert!(questions.iter().all(|q| q.options.len() == 4));
    }

    #[tokio::test]
    async fn fallback_prompt_is_used_after_parse_failure() {
        let llm = Scripted::new(vec![
            Ok("Sorry, I can't do that.".to_string()),
            Ok(questions_json(2)),
        ]);
        let questions = generator(llm.clone()).generate(&request(2)).await;

        assert_eq!(questions.len(), 2);
        let prompts = llm.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].contains("Source Context"));
        assert!(!prompts[1].contains("Source Context"));
        assert!(prompts[1].contains("Output STRICT JSON array only."));
    }

    #[tokio::test]
    async fn non_json_output_gives_up_after_two_calls() {
        let llm = Scripted::new(vec![
            Ok("not json".to_string()),
            Ok("still not json".to_string()),
            Ok(questions_json(1)),
        ]);
        let questions = generator(llm.clone()).generate(&request(1)).await;

        assert!(questions.is_empty());
        assert_eq!(llm.calls(), 2);
    }

    #[tokio::test]
    async fn remote_errors_and_empty_arrays_count_as_failures() {
        let llm = Scripted::new(vec![
            Err(LlmError::Status {
                code: 429,
                body: "quota".to_string(),
            }),
            Ok("[]".to_string()),
        ]);
        assert!(generator(llm.clone()).generate(&request(5)).await.is_empty());
        assert_eq!(llm.calls(), 2);
    }

    #[tokio::test]
    async fn attempt_count_is_configurable() {
        let llm = Scripted::new(vec![]);
        let settings = GenerationSettings {
            max_attempts: 3,
            retry_delay: Duration::ZERO,
            ..Default::default()
        };
        let generator = QuestionGenerator::new(llm.clone(), &settings);

        assert!(generator.generate(&request(1)).await.is_empty());
        assert_eq!(llm.calls(), 3);
    }

    fn delayed_generator(llm: Arc<Scripted>, delay: Duration) -> QuestionGenerator {
        let settings = GenerationSettings {
            retry_delay: delay,
            ..Default::default()
        };
        QuestionGenerator::new(llm, &settings)
    }

    #[tokio::test(start_paused = true)]
    async fn failed_attempt_pauses_once_before_retrying() {
        let delay = Duration::from_millis(300);
        let llm = Scripted::new(vec![Ok("nope".to_string()), Ok("still nope".to_string())]);
        let generator = delayed_generator(llm.clone(), delay);

        let started = tokio::time::Instant::now();
        assert!(generator.generate(&request(2)).await.is_empty());
        let elapsed = started.elapsed();

        assert_eq!(llm.calls(), 2);
        // One pause between the two attempts, none after the last one.
        assert!(elapsed >= delay, "elapsed {:?}", elapsed);
        assert!(elapsed < delay * 2, "elapsed {:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_success_does_not_pause() {
        let delay = Duration::from_millis(300);
        let llm = Scripted::new(vec![Ok(questions_json(2))]);
        let generator = delayed_generator(llm.clone(), delay);

        let started = tokio::time::Instant::now();
        assert_eq!(generator.generate(&request(2)).await.len(), 2);

        assert!(started.elapsed() < delay);
        assert_eq!(llm.calls(), 1);
    }

    #[test]
    fn one_malformed_item_rejects_the_batch() {
        let raw = r#"[
            {"question": "ok", "options": ["a","b","c","d"], "correct_answer_index": 0, "explanation": ""},
            {"question": "bad", "options": ["a","b"], "correct_answer_index": 0, "explanation": ""}
        ]"#;
        let err = parse_questions(raw, "t").unwrap_err();
        assert!(matches!(err, GenerationError::Invalid { index: 1, .. }));
    }

    #[test]
    fn object_instead_of_array_is_a_parse_error() {
        let err = parse_questions(r#"{"questions": []}"#, "t").unwrap_err();
        assert!(matches!(err, GenerationError::Parse(_)));
    }

    #[test]
    fn topic_from_model_is_overwritten() {
        let raw = r#"[{"question": "q", "options": ["a","b","c","d"], "correct_answer_index": 2, "explanation": "e", "topic": "wrong"}]"#;
        let questions = parse_questions(raw, "Ratio").unwrap();
        assert_eq!(questions[0].topic, "Ratio");
    }
}
