//! Abstractions over external collaborators of the pipeline.

pub mod generation;
