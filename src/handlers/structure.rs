// src/handlers/structure.rs

use axum::{Json, extract::State, response::IntoResponse};

use crate::{catalog::Catalog, error::AppError};

/// Lists subjects and their topics from the source-material tree.
///
/// Returns 404 when the source-material root does not exist.
pub async fn get_structure(State(catalog): State<Catalog>) -> Result<impl IntoResponse, AppError> {
    let structure = catalog.structure().await.map_err(|e| {
        tracing::warn!("Failed to list source material: {}", e);
        AppError::from(e)
    })?;

    Ok(Json(structure))
}
