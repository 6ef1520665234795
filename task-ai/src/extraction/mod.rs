//! The extraction pipeline, leaves first.
//!
//! `chunker` → `gateway` → `normalizer` → `cleaner`, composed by `orchestrator`.

pub mod chunker;
pub mod cleaner;
pub mod gateway;
pub mod normalizer;
pub mod orchestrator;
