//! Shared application state.

use storage::ModelStore;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// The store holding model file sets.
    pub store: ModelStore,
    /// Destination EPSG code for geospatial extraction.
    pub destination_crs: i32,
}
