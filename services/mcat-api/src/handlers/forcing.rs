//! Forcing data endpoint.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};

use ras_model::build_forcing_data;

use super::{error_response, load_model, require_definition_file, DefinitionFileQuery};
use crate::state::AppState;

/// GET /forcingdata
pub async fn forcing_data_handler(
    State(state): State<AppState>,
    Query(query): Query<DefinitionFileQuery>,
) -> Response {
    let key = match require_definition_file(&query) {
        Ok(key) => key,
        Err(err) => return error_response(err),
    };

    let model = match load_model(&state, &key).await {
        Ok(model) => model,
        Err(err) => return error_response(err),
    };

    Json(build_forcing_data(&model)).into_response()
}
