//! # Toonify - Cartoon-style image transforms
//!
//! Toonify applies named style presets ("Anime", "Pencil Sketch", ...) to
//! images and keeps a gallery of the results in local storage.
//!
//! ## Features
//!
//! - **Style Catalog**: Ordered, read-only presets, each a recipe of color steps
//! - **Async Transforms**: Decoding and filtering run off the caller's thread,
//!   bounded by a timeout, and fall back to the original image on failure
//! - **Gallery**: Newest-first collection persisted as one JSON array behind a
//!   pluggable storage port, with serialized read-modify-write cycles
//! - **Diagnostics**: Every silently recovered failure is also logged and
//!   reported to an optional sink
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use toonify::prelude::*;
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(StyleCatalog::with_builtins());
//! let app = Toonify::new(catalog, EngineOptions::new(), MemoryStorage::new());
//!
//! let original = DataUri::from_path("photo.png")?.to_string();
//! let output = app.transform(&original, "anime").await;
//! if let Some(notice) = output.notice() {
//!     eprintln!("{}", notice);
//! }
//!
//! let item = app.save_transformed_image(&original, &output.image, "anime")?;
//! app.download_image(&item.transformed, "anime.jpg")?;
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: Data URIs, errors, configuration, diagnostics
//! - [`filters`]: Style catalog, filter recipes, pixel operations
//! - [`execution`]: The asynchronous transform engine
//! - [`gallery`]: Storage ports and the gallery store
//! - [`api`]: The collaborator-facing [`api::Toonify`] facade

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod core;
pub mod execution;
pub mod filters;
pub mod gallery;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use toonify::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::types::{DataUri, ImageFormat};
    pub use crate::core::config::ToonifyConfig;
    pub use crate::core::diagnostics::{Diagnostic, DiagnosticLog, DiagnosticSink};

    // Errors
    pub use crate::core::error::{
        CatalogError, ConfigError, GalleryError, StorageError, ToonifyError, ToonifyResult,
        TransformError,
    };

    // Filters
    pub use crate::filters::catalog::{CatalogBuilder, StyleCatalog, StylePreset};
    pub use crate::filters::recipe::{FilterOp, FilterRecipe};

    // Execution
    pub use crate::execution::engine::{
        EngineOptions, TransformEngine, TransformOutput, TransformStatus,
    };

    // Gallery
    pub use crate::gallery::{FileStorage, GalleryItem, GalleryStore, MemoryStorage, StoragePort};

    // Facade
    pub use crate::api::{download_image, Toonify};
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
