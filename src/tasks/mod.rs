//! Task module for the task-list server
//!
//! CRUD over stored tasks plus the external-todo-API fetch and sync job.

pub mod handlers;
mod service;

pub use service::{GroupedTasks, RemoteTodo, TaskPage, TaskService};
