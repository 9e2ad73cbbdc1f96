//! Collaborator-facing interface.
//!
//! [`Toonify`] bundles the catalog, the engine and the gallery behind the
//! handful of calls screens need: list styles, transform, save, list, delete
//! and download.

use crate::core::config::{ToonifyConfig, DEFAULT_DOWNLOAD_NAME};
use crate::core::diagnostics::DiagnosticSink;
use crate::core::error::{GalleryResult, ToonifyResult};
use crate::core::types::DataUri;
use crate::execution::engine::{EngineOptions, TransformEngine, TransformOutput};
use crate::filters::catalog::{StyleCatalog, StylePreset};
use crate::gallery::item::GalleryItem;
use crate::gallery::storage::{FileStorage, StoragePort};
use crate::gallery::store::GalleryStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Catalog, engine and gallery wired together.
pub struct Toonify {
    catalog: Arc<StyleCatalog>,
    engine: TransformEngine,
    gallery: GalleryStore,
    download_dir: PathBuf,
    default_download_name: String,
}

impl Toonify {
    /// Wire the parts over an explicit storage port.
    pub fn new<S>(catalog: Arc<StyleCatalog>, options: EngineOptions, storage: S) -> Self
    where
        S: StoragePort + 'static,
    {
        let diagnostics = options.diagnostics.clone();
        Self {
            engine: TransformEngine::new(Arc::clone(&catalog), options),
            gallery: GalleryStore::new(storage, Arc::clone(&catalog)).with_diagnostics(diagnostics),
            catalog,
            download_dir: PathBuf::from("."),
            default_download_name: DEFAULT_DOWNLOAD_NAME.to_string(),
        }
    }

    /// Built-in styles with file-backed storage, as described by `config`.
    pub fn from_config(config: &ToonifyConfig, diagnostics: DiagnosticSink) -> Self {
        let catalog = Arc::new(StyleCatalog::with_builtins());
        let options = EngineOptions::from_config(config).with_diagnostics(diagnostics.clone());

        let mut storage = FileStorage::new(&config.data_dir);
        if let Some(quota) = config.storage_quota_bytes {
            storage = storage.with_quota(quota);
        }

        Self {
            engine: TransformEngine::new(Arc::clone(&catalog), options),
            gallery: GalleryStore::new(storage, Arc::clone(&catalog))
                .with_key(config.gallery_key.clone())
                .with_diagnostics(diagnostics),
            catalog,
            download_dir: config.download_dir.clone(),
            default_download_name: config.default_download_name.clone(),
        }
    }

    /// Write downloads to `dir`.
    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    /// The style catalog.
    pub fn catalog(&self) -> &StyleCatalog {
        &self.catalog
    }

    /// The transform engine.
    pub fn engine(&self) -> &TransformEngine {
        &self.engine
    }

    /// The gallery store.
    pub fn gallery(&self) -> &GalleryStore {
        &self.gallery
    }

    /// All styles in catalog order.
    pub fn list_styles(&self) -> Vec<StylePreset> {
        self.catalog.iter().cloned().collect()
    }

    /// Apply a style to a data-URI image. Always resolves.
    pub async fn transform(&self, image_data_uri: &str, style_id: &str) -> TransformOutput {
        self.engine.transform(image_data_uri, style_id).await
    }

    /// Save a finished transform to the gallery.
    pub fn save_transformed_image(
        &self,
        original: &str,
        transformed: &str,
        style_id: &str,
    ) -> GalleryResult<GalleryItem> {
        self.gallery.append(original, transformed, style_id)
    }

    /// Gallery contents, newest first.
    pub fn get_gallery_items(&self) -> Vec<GalleryItem> {
        self.gallery.list()
    }

    /// Delete a gallery item; unknown ids are ignored.
    pub fn delete_gallery_item(&self, id: &str) -> GalleryResult<()> {
        self.gallery.remove(id)
    }

    /// Save a data-URI image into the download directory.
    pub fn download_image(&self, image_data_uri: &str, filename: &str) -> ToonifyResult<PathBuf> {
        let name = if filename.trim().is_empty() {
            self.default_download_name.as_str()
        } else {
            filename
        };
        download_image(image_data_uri, name, &self.download_dir)
    }
}

impl std::fmt::Debug for Toonify {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toonify")
            .field("styles", &self.catalog.len())
            .field("gallery", &self.gallery)
            .field("download_dir", &self.download_dir)
            .finish()
    }
}

/// Decode a data URI and write its bytes to `dir/filename`.
///
/// Only the final component of `filename` is used; an empty name becomes
/// `toonify-image.jpg`. Returns the written path.
pub fn download_image(image_data_uri: &str, filename: &str, dir: &Path) -> ToonifyResult<PathBuf> {
    let uri = DataUri::parse(image_data_uri)?;
    let name = Path::new(filename.trim())
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| DEFAULT_DOWNLOAD_NAME.into());

    std::fs::create_dir_all(dir)?;
    let path = dir.join(name);
    std::fs::write(&path, uri.bytes())?;
    log::info!("downloaded {} bytes to {}", uri.bytes().len(), path.display());
    Ok(path)
}
