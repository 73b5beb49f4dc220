//! Project driver, classifier, and model index for RAS file sets.
//!
//! The entry point is [`RasModel::new`], which verifies a project key,
//! discovers its companions, parses them in parallel, and merges the
//! results. Classification, the model index, and the forcing view build on
//! the merged record.

pub mod classify;
pub mod forcing;
pub mod index;
pub mod model;

pub use classify::{classify, FileKind};
pub use forcing::{build_forcing_data, ForcingData};
pub use index::{build_index, Model};
pub use model::{ProjectMetadata, RasModel, MODEL_TYPE};
