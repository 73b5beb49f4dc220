//! Shared types for the RAS extraction services.

pub mod error;
pub mod path;
pub mod units;

pub use error::{RasError, RasResult};
pub use units::check_unit_consistency;
