// src/generation/prompt.rs

use std::fmt;

/// Which instruction set to send to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptVariant {
    /// Full instructions: persona, schema, formatting rules and source context.
    Primary,
    /// Short, schema-only instructions used after the primary output failed to parse.
    Fallback,
}

impl fmt::Display for PromptVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptVariant::Primary => write!(f, "primary"),
            PromptVariant::Fallback => write!(f, "fallback"),
        }
    }
}

/// Renders the prompt for `num_questions` MCQs on `topic`.
///
/// Pure string rendering; nothing is validated here.
pub fn build_prompt(num_questions: usize, topic: &str, context: &str, variant: PromptVariant) -> String {
    match variant {
        PromptVariant::Primary => primary_prompt(num_questions, topic, context),
        PromptVariant::Fallback => fallback_prompt(num_questions, topic),
    }
}

fn primary_prompt(num_questions: usize, topic: &str, context: &str) -> String {
    format!(
        r#"
You are an expert Bank Exam (IBPS, SBI PO/Clerk level) question creator. Your task is to generate {num_questions} high-quality multiple-choice questions (MCQs) for the topic: '{topic}'.

**Source Context:**
"""
{context}
"""

**INSTRUCTIONS:**
1.  **OUTPUT:** Strict JSON array of objects. No markdown, no intro text.
2.  **FORMAT:**
    [
      {{
        "question": "Question text here...",
        "options": ["Option A", "Option B", "Option C", "Option D"],
        "correct_answer_index": 0,
        "explanation": "Explanation here..."
      }}
    ]
3.  **NO LATEX:** Use plain text for math.
4.  **DIFFICULTY:** Competitive exam level.

Generate exactly {num_questions} questions now.
"#
    )
}

fn fallback_prompt(num_questions: usize, topic: &str) -> String {
    format!(
        r#"
Generate {num_questions} MCQs for Bank Exams on '{topic}'.
Output STRICT JSON array only.
Structure: {{"question": "...", "options": ["A","B","C","D"], "correct_answer_index": 0, "explanation": "..."}}
No Markdown. No LaTeX.
"#
    )
}

/// Prompt for the chat-support hint endpoint.
pub fn build_hint_prompt(question_text: &str, user_query: &str, topic: &str) -> String {
    format!(
        r#"
Provide a hint for this Bank Exam question on '{topic}' without revealing the answer.
Q: "{question_text}"
Student asks: "{user_query}"
"#
    )
}
