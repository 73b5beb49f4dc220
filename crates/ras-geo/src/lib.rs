//! Coordinate reference systems, transforms, interpolation, and WKB
//! encoding for RAS geometry extraction.

pub mod crs;
pub mod error;
pub mod geometry;
pub mod interpolate;
pub mod transform;
pub mod wkb;

pub use crs::SpatialRef;
pub use error::{GeoError, GeoResult};
pub use geometry::{distance, polyline_length, Geometry, Xy, Xyz};
pub use interpolate::{attribute_z, interp_xy};
pub use transform::CoordinateTransform;
