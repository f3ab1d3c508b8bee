//! todo-core - Core library for the todo reminders app
//!
//! This crate contains the shared models, the remote document store, auth
//! session handling, and the optimistic list manager used by every interface.

pub mod auth;
pub mod config;
pub mod error;
pub mod manager;
pub mod models;
pub mod notify;
pub mod push;
pub mod services;
pub mod state;
pub mod store;
pub mod util;
pub mod view;

pub use error::{Error, Result};
pub use manager::TodoListManager;
pub use models::{TodoId, TodoItem};
