//! Core types shared across Toonify.
//!
//! This module contains:
//! - Data URI and image format types
//! - Error types
//! - Configuration
//! - Diagnostics for recovered failures

pub mod types;
pub mod error;
pub mod config;
pub mod diagnostics;

// Re-export commonly used types
pub use types::{DataUri, ImageFormat};
pub use error::{
    CatalogError, ConfigError, GalleryError, StorageError, ToonifyError, TransformError,
};
pub use config::ToonifyConfig;
pub use diagnostics::{Diagnostic, DiagnosticLog, DiagnosticSink};
