//! Helpers that load a complete fixture model into a store.

use bytes::Bytes;
use storage::ModelStore;

use crate::fixtures;

/// Load the fixture model under `<dir>/<stem>.*` including the projection
/// sidecar. Returns the project key.
pub async fn seed_model(store: &ModelStore, dir: &str, stem: &str) -> String {
    let key = |ext: &str| format!("{}/{}.{}", dir, stem, ext);

    let files: Vec<(String, String)> = vec![
        (key("prj"), fixtures::project_file()),
        (key("p01"), fixtures::plan_file()),
        (key("g01"), fixtures::geom_file()),
        (key("f01"), fixtures::steady_flow_file()),
        (key("u01"), fixtures::unsteady_flow_file()),
        (key("projection"), fixtures::wkt::TX_SOUTH_CENTRAL.to_string()),
    ];

    for (path, contents) in files {
        store
            .put(&path, Bytes::from(contents))
            .await
            .expect("fixture upload");
    }

    key("prj")
}
