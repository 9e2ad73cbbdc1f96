//! Gallery store.
//!
//! The whole collection lives under a single storage key as one JSON array,
//! newest first. Every mutation reads, modifies and rewrites the full array
//! while holding the store's lock, so concurrent callers never overwrite
//! each other's changes.

use crate::core::config::DEFAULT_GALLERY_KEY;
use crate::core::diagnostics::{Diagnostic, DiagnosticSink};
use crate::core::error::GalleryResult;
use crate::filters::catalog::StyleCatalog;
use crate::gallery::item::GalleryItem;
use crate::gallery::storage::StoragePort;
use parking_lot::Mutex;
use std::sync::Arc;

/// Persistent collection of [`GalleryItem`]s.
pub struct GalleryStore {
    storage: Mutex<Box<dyn StoragePort>>,
    catalog: Arc<StyleCatalog>,
    key: String,
    diagnostics: DiagnosticSink,
}

impl GalleryStore {
    /// Create a store over `storage` using the default key.
    pub fn new<S>(storage: S, catalog: Arc<StyleCatalog>) -> Self
    where
        S: StoragePort + 'static,
    {
        Self {
            storage: Mutex::new(Box::new(storage)),
            catalog,
            key: DEFAULT_GALLERY_KEY.to_string(),
            diagnostics: DiagnosticSink::none(),
        }
    }

    /// Use a different storage key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Report recovered read failures to `diagnostics`.
    pub fn with_diagnostics(mut self, diagnostics: DiagnosticSink) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Storage key in use.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Record a finished transform.
    ///
    /// The style name is resolved now and stored as text, so later catalog
    /// changes do not rename existing items. Unknown styles are recorded as
    /// "Custom". If the stored collection cannot be read, or the write
    /// fails, nothing is written and the item is not kept.
    pub fn append(
        &self,
        original: &str,
        transformed: &str,
        style_id: &str,
    ) -> GalleryResult<GalleryItem> {
        let item = GalleryItem::new(original, transformed, self.catalog.display_name(style_id));

        let mut storage = self.storage.lock();
        let mut items = self.read_items(&**storage)?;
        items.insert(0, item.clone());
        self.save(&mut **storage, &items)?;

        log::debug!(
            "saved gallery item {} ({}), {} total",
            item.id,
            item.style_name,
            items.len()
        );
        Ok(item)
    }

    /// All items, newest first.
    ///
    /// A missing collection is empty. An unreadable or corrupt one is also
    /// reported as empty, with a diagnostic.
    pub fn list(&self) -> Vec<GalleryItem> {
        let storage = self.storage.lock();
        match self.read_items(&**storage) {
            Ok(items) => items,
            Err(e) => {
                self.diagnostics.emit(Diagnostic::StorageUnavailable {
                    key: self.key.clone(),
                    reason: e.to_string(),
                });
                Vec::new()
            }
        }
    }

    /// Look up an item by id.
    pub fn get(&self, id: &str) -> Option<GalleryItem> {
        self.list().into_iter().find(|item| item.id == id)
    }

    /// Delete an item. Unknown ids are ignored and nothing is written.
    /// Fails without writing if the stored collection cannot be read.
    pub fn remove(&self, id: &str) -> GalleryResult<()> {
        let mut storage = self.storage.lock();
        let mut items = self.read_items(&**storage)?;
        let before = items.len();
        items.retain(|item| item.id != id);

        if items.len() == before {
            log::debug!("gallery item {} not found, nothing to delete", id);
            return Ok(());
        }

        self.save(&mut **storage, &items)?;
        log::debug!("deleted gallery item {}, {} remaining", id, items.len());
        Ok(())
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.list().len()
    }

    /// Check if the gallery is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read the stored collection. A missing or corrupt value is empty;
    /// a failing port is an error.
    fn read_items(&self, storage: &dyn StoragePort) -> GalleryResult<Vec<GalleryItem>> {
        let Some(raw) = storage.get(&self.key)? else {
            return Ok(Vec::new());
        };

        Ok(match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(e) => {
                self.diagnostics.emit(Diagnostic::StorageCorrupt {
                    key: self.key.clone(),
                    reason: e.to_string(),
                });
                Vec::new()
            }
        })
    }

    fn save(&self, storage: &mut dyn StoragePort, items: &[GalleryItem]) -> GalleryResult<()> {
        let json = serde_json::to_string(items)?;
        storage.set(&self.key, &json)?;
        Ok(())
    }
}

impl std::fmt::Debug for GalleryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GalleryStore")
            .field("key", &self.key)
            .field("styles", &self.catalog.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::diagnostics::DiagnosticLog;
    use crate::core::error::{GalleryError, StorageError};
    use crate::filters::catalog::StylePreset;
    use crate::core::error::StorageResult;
    use crate::gallery::storage::MemoryStorage;
    use std::io;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    /// Memory storage whose next read can be made to fail.
    struct FlakyStorage {
        inner: MemoryStorage,
        fail_next_get: Arc<AtomicBool>,
    }

    impl StoragePort for FlakyStorage {
        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            if self.fail_next_get.swap(false, Ordering::SeqCst) {
                return Err(io::Error::new(io::ErrorKind::Other, "disk offline").into());
            }
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
            self.inner.set(key, value)
        }
    }

    fn flaky_store(log: &DiagnosticLog) -> (GalleryStore, Arc<AtomicBool>) {
        let fail = Arc::new(AtomicBool::new(false));
        let storage = FlakyStorage {
            inner: MemoryStorage::new(),
            fail_next_get: Arc::clone(&fail),
        };
        let store = GalleryStore::new(storage, Arc::new(StyleCatalog::with_builtins()))
            .with_diagnostics(log.sink());
        (store, fail)
    }

    fn store() -> GalleryStore {
        GalleryStore::new(MemoryStorage::new(), Arc::new(StyleCatalog::with_builtins()))
    }

    #[test]
    fn test_empty_when_never_written() {
        let store = store();
        assert!(store.list().is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_append_prepends() {
        let store = store();
        let first = store.append("o1", "t1", "anime").unwrap();
        let second = store.append("o2", "t2", "sketch").unwrap();

        let items = store.list();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], second);
        assert_eq!(items[1], first);
        assert_eq!(items[0].style_name, "Pencil Sketch");
    }

    #[test]
    fn test_unknown_style_is_custom() {
        let store = store();
        let item = store.append("o", "t", "not-a-style").unwrap();
        assert_eq!(item.style_name, "Custom");
    }

    #[test]
    fn test_roundtrip_fields() {
        let store = store();
        let created = store.append("orig-uri", "trans-uri", "oil").unwrap();

        let found = store.get(&created.id).unwrap();
        assert_eq!(found, created);
        assert_eq!(found.original, "orig-uri");
        assert_eq!(found.transformed, "trans-uri");
        assert_eq!(found.style_name, "Oil Painting");
    }

    #[test]
    fn test_remove() {
        let store = store();
        let keep = store.append("a", "a", "pixar").unwrap();
        let gone = store.append("b", "b", "pixar").unwrap();

        store.remove(&gone.id).unwrap();
        let items = store.list();
        assert_eq!(items, vec![keep]);
        assert!(store.get(&gone.id).is_none());
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let store = store();
        store.append("a", "a", "3d").unwrap();
        let before = store.list();

        store.remove("missing").unwrap();
        assert_eq!(store.list(), before);
    }

    #[test]
    fn test_remove_unknown_does_not_write() {
        // A zero quota makes any write fail, so success proves no write.
        let store = GalleryStore::new(
            MemoryStorage::new().with_quota(0),
            Arc::new(StyleCatalog::with_builtins()),
        );
        assert!(store.remove("missing").is_ok());
    }

    #[test]
    fn test_corrupt_collection_is_empty_with_diagnostic() {
        let mut storage = MemoryStorage::new();
        storage.insert_raw(DEFAULT_GALLERY_KEY, "{not json");
        let log = DiagnosticLog::new();
        let store = GalleryStore::new(storage, Arc::new(StyleCatalog::with_builtins()))
            .with_diagnostics(log.sink());

        assert!(store.list().is_empty());
        assert!(matches!(log.events()[0], Diagnostic::StorageCorrupt { .. }));

        // The next write replaces the corrupt blob.
        store.append("o", "t", "comic").unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_append_after_read_failure_keeps_existing_items() {
        let log = DiagnosticLog::new();
        let (store, fail) = flaky_store(&log);
        for _ in 0..5 {
            store.append("o", "t", "anime").unwrap();
        }

        fail.store(true, Ordering::SeqCst);
        let err = store.append("o", "t", "anime").unwrap_err();
        assert!(matches!(err, GalleryError::Storage(StorageError::Io(_))));

        assert_eq!(store.len(), 5);
        assert!(log.is_empty());
    }

    #[test]
    fn test_remove_after_read_failure_keeps_existing_items() {
        let log = DiagnosticLog::new();
        let (store, fail) = flaky_store(&log);
        let item = store.append("o", "t", "comic").unwrap();
        store.append("o", "t", "comic").unwrap();

        fail.store(true, Ordering::SeqCst);
        assert!(store.remove(&item.id).is_err());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_list_read_failure_is_empty_with_diagnostic() {
        let log = DiagnosticLog::new();
        let (store, fail) = flaky_store(&log);
        store.append("o", "t", "oil").unwrap();

        fail.store(true, Ordering::SeqCst);
        assert!(store.list().is_empty());
        assert!(matches!(
            log.events()[0],
            Diagnostic::StorageUnavailable { .. }
        ));

        // The failure was transient; the data is still there.
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_quota_failure_propagates_and_loses_item() {
        let store = GalleryStore::new(
            MemoryStorage::new().with_quota(64),
            Arc::new(StyleCatalog::with_builtins()),
        );
        let big = "x".repeat(128);
        let err = store.append(&big, &big, "anime").unwrap_err();
        assert!(matches!(
            err,
            GalleryError::Storage(StorageError::QuotaExceeded { .. })
        ));
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_style_name_is_snapshot() {
        let storage = MemoryStorage::new();
        let old = Arc::new(
            StyleCatalog::builder()
                .style(StylePreset::new("toon", "Toon v1"))
                .build()
                .unwrap(),
        );
        let store = GalleryStore::new(storage, old);
        let item = store.append("o", "t", "toon").unwrap();

        // Rebuild the store over the same data with a renamed preset.
        let raw = serde_json::to_string(&store.list()).unwrap();
        let mut reopened_storage = MemoryStorage::new();
        reopened_storage.insert_raw(DEFAULT_GALLERY_KEY, raw);
        let renamed = Arc::new(
            StyleCatalog::builder()
                .style(StylePreset::new("toon", "Toon v2"))
                .build()
                .unwrap(),
        );
        let reopened = GalleryStore::new(reopened_storage, renamed);

        assert_eq!(reopened.get(&item.id).unwrap().style_name, "Toon v1");
        assert_eq!(reopened.append("o", "t", "toon").unwrap().style_name, "Toon v2");
    }

    #[test]
    fn test_custom_key() {
        let store = store().with_key("other-gallery");
        assert_eq!(store.key(), "other-gallery");
        store.append("o", "t", "mosaic").unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_concurrent_appends_all_survive() {
        let store = Arc::new(store());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for j in 0..10 {
                        store
                            .append(&format!("o{}-{}", i, j), "t", "watercolor")
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let items = store.list();
        assert_eq!(items.len(), 80);
        let mut ids: Vec<_> = items.iter().map(|i| i.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 80);
    }
}
