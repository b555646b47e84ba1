// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    catalog::Catalog,
    config::Config,
    error::AppError,
    generation::{QuestionGenerator, TestAssembler},
    llm::{GeminiClient, LlmError, SharedGenerator},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub catalog: Catalog,
    /// Outcome of client initialization at startup.
    pub llm: Result<SharedGenerator, LlmError>,
}

impl AppState {
    /// Builds state with the Gemini client described by `config`.
    pub fn from_config(config: Config) -> Self {
        let llm = GeminiClient::from_config(&config)
            .map(|client| Arc::new(client) as SharedGenerator);
        Self::with_generator(config, llm)
    }

    /// Builds state around an already constructed (or failed) model client.
    pub fn with_generator(config: Config, llm: Result<SharedGenerator, LlmError>) -> Self {
        let catalog = Catalog::new(config.source_material_dir.clone());
        Self {
            config,
            catalog,
            llm,
        }
    }

    pub fn llm(&self) -> Result<SharedGenerator, AppError> {
        self.llm.clone().map_err(AppError::NotConfigured)
    }

    pub fn assembler(&self) -> Result<TestAssembler, AppError> {
        let settings = &self.config.generation;
        let generator = QuestionGenerator::new(self.llm()?, settings);
        Ok(TestAssembler::new(generator, settings))
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Catalog {
    fn from_ref(state: &AppState) -> Self {
        state.catalog.clone()
    }
}
