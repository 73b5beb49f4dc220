//! Model classification endpoints: is-a-model, is-geospatial, type,
//! version, and the consolidated index.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};

use ras_model::{build_index, RasModel};

use super::{error_response, require_definition_file, DefinitionFileQuery};
use crate::state::AppState;

/// GET /isamodel
pub async fn is_a_model_handler(
    State(state): State<AppState>,
    Query(query): Query<DefinitionFileQuery>,
) -> Response {
    let key = match require_definition_file(&query) {
        Ok(key) => key,
        Err(err) => return error_response(err),
    };

    let verdict = match RasModel::new(&key, state.store.clone()).await {
        Ok(model) => model.is_a_model(),
        Err(_) => false,
    };
    Json(verdict).into_response()
}

/// GET /isgeospatial
pub async fn is_geospatial_handler(
    State(state): State<AppState>,
    Query(query): Query<DefinitionFileQuery>,
) -> Response {
    let key = match require_definition_file(&query) {
        Ok(key) => key,
        Err(err) => return error_response(err),
    };

    let model = match super::load_model(&state, &key).await {
        Ok(model) => model,
        Err(err) => return error_response(err),
    };
    Json(model.is_geospatial()).into_response()
}

/// GET /modeltype
pub async fn model_type_handler(
    State(state): State<AppState>,
    Query(query): Query<DefinitionFileQuery>,
) -> Response {
    let key = match require_definition_file(&query) {
        Ok(key) => key,
        Err(err) => return error_response(err),
    };

    let model = match super::load_model(&state, &key).await {
        Ok(model) => model,
        Err(err) => return error_response(err),
    };
    Json(model.model_type()).into_response()
}

/// GET /modelversion
pub async fn model_version_handler(
    State(state): State<AppState>,
    Query(query): Query<DefinitionFileQuery>,
) -> Response {
    let key = match require_definition_file(&query) {
        Ok(key) => key,
        Err(err) => return error_response(err),
    };

    let model = match super::load_model(&state, &key).await {
        Ok(model) => model,
        Err(err) => return error_response(err),
    };
    Json(model.model_version().to_string()).into_response()
}

/// GET /index
pub async fn index_handler(
    State(state): State<AppState>,
    Query(query): Query<DefinitionFileQuery>,
) -> Response {
    let key = match require_definition_file(&query) {
        Ok(key) => key,
        Err(err) => return error_response(err),
    };

    let model = match super::load_model(&state, &key).await {
        Ok(model) => model,
        Err(err) => return error_response(err),
    };
    Json(build_index(&model)).into_response()
}
