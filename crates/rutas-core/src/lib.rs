//! Rutas Core Library
//!
//! This crate provides the domain models, field validators, error types,
//! configuration and collaborator traits shared by the Rutas form engine,
//! the HTTP client and the CLI.

pub mod config;
pub mod directory;
pub mod error;
pub mod hooks;
pub mod models;
pub mod storage;
pub mod validation;

// Re-export commonly used types
pub use config::FormsConfig;
pub use error::{
    ErrorCategory, ErrorMetadata, FieldError, FormError, LogLevel, RemovalError, ResolverError,
    SubmissionError, UploadError,
};
pub use hooks::{EntityBackend, PlaceSearch};
pub use storage::{KeyValueStore, MemoryStore, ScopedStorage};
