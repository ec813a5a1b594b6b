#![forbid(unsafe_code)]

//! Core record model and persistence for the wtrack workout log.
//!
//! This crate provides:
//! - Domain types (workouts, create/update inputs)
//! - The built-in workout type catalog
//! - Identifier generation
//! - Persistence (text block and JSONL formats, CSV export)
//! - The in-memory record store and its CRUD operations

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod ids;
pub mod storage;
pub mod store;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{Catalog, WorkoutType};
pub use config::{Config, IdStrategy, StorageFormat};
pub use ids::{IdGenerator, RandomIdGenerator, SequentialIdGenerator};
pub use storage::WorkoutFile;
pub use store::WorkoutStore;
pub use export::export_csv;
