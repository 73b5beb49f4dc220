//! Parsers for the RAS plain-text model file formats.
//!
//! Each file type gets a line-oriented, state-driven parser over a peekable
//! [`scan::LineScanner`]. Fixed-width numeric blocks are decoded by the
//! readers in [`block`]. The geometry format is parsed twice: a metadata
//! pass ([`geom`]) and a geospatial feature pass ([`geospatial`]).

pub mod areas;
pub mod block;
pub mod connections;
pub mod flow;
pub mod geom;
pub mod geospatial;
pub mod plan;
pub mod project;
pub mod scan;
pub mod steady;
pub mod structures;
pub mod unsteady;

pub use areas::{StorageArea, TwoDArea};
pub use connections::Connection;
pub use flow::{parse_flow, FlowData, FlowFile};
pub use geom::{parse_geom, GeomFile};
pub use geospatial::{extract_geometry, Features, GeoData, VectorFeature};
pub use plan::{parse_plan, PlanFile};
pub use project::{parse_project, ProjectFile};
pub use steady::SteadyData;
pub use unsteady::UnsteadyData;
