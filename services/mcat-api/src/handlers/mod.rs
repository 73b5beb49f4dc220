//! HTTP handlers mapping query parameters onto core calls.

pub mod classification;
pub mod forcing;
pub mod geospatial;
pub mod ping;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use ras_common::RasError;
use ras_model::RasModel;

use crate::state::AppState;

/// The one query parameter every model endpoint takes.
#[derive(Debug, Deserialize)]
pub struct DefinitionFileQuery {
    /// Project key, e.g. `models/ras/CHURCH HOUSE GULLY/CHURCH HOUSE GULLY.prj`
    pub definition_file: Option<String>,
}

/// Plain status/message error body.
#[derive(Debug, Serialize)]
pub struct SimpleResponse {
    pub status: u16,
    pub message: String,
}

/// Map a core error onto its HTTP response.
pub fn error_response(err: RasError) -> axum::response::Response {
    let status =
        StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = SimpleResponse {
        status: status.as_u16(),
        message: err.to_string(),
    };
    (status, Json(body)).into_response()
}

/// Extract the definition file parameter or fail with a 400.
pub fn require_definition_file(query: &DefinitionFileQuery) -> Result<String, RasError> {
    match &query.definition_file {
        Some(key) if !key.trim().is_empty() => Ok(key.clone()),
        _ => Err(RasError::MissingParameter("definition_file".to_string())),
    }
}

/// Build a model for the key, requiring it to pass the is-a-model check.
pub async fn load_model(state: &AppState, key: &str) -> Result<RasModel, RasError> {
    let model = RasModel::new(key, state.store.clone()).await?;
    if !model.is_a_model() {
        return Err(RasError::NotAProject(key.to_string()));
    }
    Ok(model)
}
