//! Geospatial extraction endpoint.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};

use super::{error_response, load_model, require_definition_file, DefinitionFileQuery};
use crate::state::AppState;

/// GET /geospatialdata
pub async fn geospatial_data_handler(
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

    match model.geospatial_data(state.destination_crs).await {
        Ok(gd) => Json(gd).into_response(),
        Err(err) => error_response(err),
    }
}
