//! This module re-exports the entity models from the `entity_api` crate.
//!
//! Consumers of the `domain` crate (namely `web`) work with these types without depending on
//! `entity_api` or `entity` directly.
pub use entity_api::{priority, status, tasks, users, Id};

pub mod error;
pub mod jwt;
pub mod task;
pub mod user;

pub mod gateway;
