//! Table registry - filtered views over the floor

pub mod registry;

pub use registry::{AreaSummary, TableQuery, summarize_areas};
