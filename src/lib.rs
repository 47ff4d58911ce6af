//! Biblio Library Lending Tracker
//!
//! A Rust implementation of a library lending tracker, providing a REST JSON
//! API for managing a book catalog, a user roster, and the loans linking
//! them, with borrowing limits and late-return fees.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
