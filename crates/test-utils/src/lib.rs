//! Shared fixtures for RAS extraction tests.

pub mod fixtures;
pub mod seed;

pub use fixtures::{geom_file, plan_file, project_file, steady_flow_file, unsteady_flow_file};
pub use seed::seed_model;
