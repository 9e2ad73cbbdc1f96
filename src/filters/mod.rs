//! Filter module.
//!
//! Contains the style catalog, filter recipes and the built-in pixel
//! operations that render them.

pub mod builtin;
pub mod catalog;
pub mod recipe;

pub use builtin::apply_recipe;
pub use catalog::{CatalogBuilder, StyleCatalog, StylePreset, CUSTOM_STYLE_NAME};
pub use recipe::{FilterOp, FilterRecipe};
