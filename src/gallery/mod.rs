//! Gallery module.
//!
//! Persists finished transforms through a pluggable [`StoragePort`].

pub mod item;
pub mod storage;
pub mod store;

pub use item::GalleryItem;
pub use storage::{FileStorage, MemoryStorage, StoragePort};
pub use store::GalleryStore;
