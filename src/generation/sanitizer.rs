// src/generation/sanitizer.rs

//! Best-effort recovery of a JSON array from free-form model output.
//!
//! Every step is a pure `&str -> String` transform. None of them fail: on
//! input they cannot make sense of they return their best guess, and the
//! caller's JSON decode is what decides whether the attempt succeeded.

use std::sync::LazyLock;

use regex::Regex;

static OUTERMOST_ARRAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*\]").expect("valid regex"));

static CHATTER: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)Here are the questions in JSON format:?\n*",
        r"(?i)\n*Please find the questions below in JSON format\.?\n*",
        r"(?i)\n*\[START JSON\]\n*",
        r"(?i)\n*\[END JSON\]\n*",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid regex"))
    .collect()
});

const MATH_DELIMITERS: [&str; 6] = ["$$", "$", "\\(", "\\)", "\\[", "\\]"];

/// Runs the full cleanup pipeline on a raw model response.
pub fn sanitize(raw: &str) -> String {
    let text = strip_code_fences(raw);
    let text = isolate_array(&text);
    let text = strip_math_delimiters(&text);
    let text = strip_chatter(&text);
    text.trim().to_string()
}

/// Removes ```` ```json ```` and bare ```` ``` ```` fence markers.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Keeps the span from the first `[` to the last `]`, newlines included.
///
/// Without such a span the whole text is returned unchanged.
pub fn isolate_array(text: &str) -> String {
    match OUTERMOST_ARRAY.find(text) {
        Some(m) => m.as_str().to_string(),
        None => {
            tracing::warn!("No outermost JSON array found, keeping cleaned text as is");
            text.to_string()
        }
    }
}

/// Drops LaTeX delimiters (`$$`, `$`, `\(`, `\)`, `\[`, `\]`) but keeps
/// whatever they enclosed.
pub fn strip_math_delimiters(text: &str) -> String {
    MATH_DELIMITERS
        .iter()
        .fold(text.to_string(), |acc, delimiter| acc.replace(delimiter, ""))
}

/// Removes the stock phrases models like to wrap their JSON in.
pub fn strip_chatter(text: &str) -> String {
    CHATTER
        .iter()
        .fold(text.to_string(), |acc, re| re.replace_all(&acc, "").into_owned())
}
