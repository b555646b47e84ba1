// src/config.rs

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use dotenvy::dotenv;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/";
pub const DEFAULT_PORT: u16 = 8080;

/// Tunables for the question-generation pipeline.
///
/// The defaults reproduce the historical behavior: two attempts (primary
/// prompt, then fallback prompt), a one second pause after a failed attempt,
/// and a 70/30 split between context-grounded and general questions.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub context_ratio: f64,
    pub max_questions_per_request: i64,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            retry_delay: Duration::from_millis(1000),
            context_ratio: 0.7,
            max_questions_per_request: 100,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Missing key is not fatal: generation and chat endpoints report it.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub gemini_timeout: Duration,
    pub source_material_dir: PathBuf,
    pub static_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
    pub generation: GenerationSettings,
    /// Rejected values found while loading; logged once tracing is up.
    pub load_warnings: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key -> value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut vars = EnvReader {
            lookup,
            warnings: Vec::new(),
        };
        let defaults = GenerationSettings::default();

        let gemini_api_key = (vars.lookup)("GEMINI_API_KEY").filter(|key| !key.trim().is_empty());

        let generation = GenerationSettings {
            max_attempts: vars.parse_or("GENERATION_MAX_ATTEMPTS", defaults.max_attempts),
            retry_delay: Duration::from_millis(vars.parse_or(
                "GENERATION_RETRY_DELAY_MS",
                defaults.retry_delay.as_millis() as u64,
            )),
            context_ratio: vars.ratio_or("GENERATION_CONTEXT_RATIO", defaults.context_ratio),
            max_questions_per_request: vars.parse_or(
                "MAX_QUESTIONS_PER_REQUEST",
                defaults.max_questions_per_request,
            ),
        };

        Self {
            gemini_api_key,
            gemini_model: vars.string_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            gemini_api_base: vars.string_or("GEMINI_API_BASE", DEFAULT_GEMINI_API_BASE),
            gemini_timeout: Duration::from_secs(vars.parse_or("GEMINI_TIMEOUT_SECS", 120)),
            source_material_dir: vars.string_or("SOURCE_MATERIAL_DIR", "source_material").into(),
            static_dir: vars.string_or("STATIC_DIR", "static").into(),
            port: vars.parse_or("PORT", DEFAULT_PORT),
            rust_log: vars.string_or("RUST_LOG", "info"),
            generation,
            load_warnings: vars.warnings,
        }
    }
}

struct EnvReader<F> {
    lookup: F,
    warnings: Vec<String>,
}

impl<F: Fn(&str) -> Option<String>> EnvReader<F> {
    fn string_or(&self, key: &str, default: &str) -> String {
        (self.lookup)(key).unwrap_or_else(|| default.to_string())
    }

    /// Parses `key`, keeping `default` when it is unset or unparsable.
    fn parse_or<T: FromStr>(&mut self, key: &str, default: T) -> T {
        match (self.lookup)(key) {
            Some(raw) => match raw.trim().parse() {
                Ok(value) => value,
                Err(_) => {
                    self.warnings
                        .push(format!("Ignoring unparsable {}={:?}, using default", key, raw));
                    default
                }
            },
            None => default,
        }
    }

    /// A finite ratio clamped to [0, 1]; NaN and infinities keep `default`.
    fn ratio_or(&mut self, key: &str, default: f64) -> f64 {
        let value: f64 = self.parse_or(key, default);
        if value.is_finite() {
            value.clamp(0.0, 1.0)
        } else {
            self.warnings
                .push(format!("Ignoring non-finite {}={}, using default", key, value));
            default
        }
    }
}
