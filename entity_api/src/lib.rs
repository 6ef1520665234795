pub use entity::{priority, status, tasks, users, Id};

pub mod error;
pub mod task;
pub mod user;
