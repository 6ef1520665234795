//! Data types flowing through the extraction pipeline.

pub mod candidate;
pub mod draft;
pub mod generation;
