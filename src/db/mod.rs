//! Database module for the task-list server
//!
//! Holds the persisted models and the data access layer over the
//! Postgres connection pool.

pub mod models;
pub mod operations;

pub use models::{Task, User};
pub use operations::DbOperations;
