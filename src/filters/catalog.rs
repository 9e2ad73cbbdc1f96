//! Style catalog: the named presets offered to users.

use crate::core::error::CatalogError;
use crate::filters::recipe::FilterRecipe;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Display name recorded for styles the catalog does not know.
pub const CUSTOM_STYLE_NAME: &str = "Custom";

/// A named filter preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StylePreset {
    /// Unique, stable key (e.g., "anime")
    pub id: String,
    /// Human-readable name (e.g., "Anime")
    pub name: String,
    /// Short description
    pub description: String,
    /// Preview image URI
    pub thumbnail: String,
    /// Adjustments applied by this style
    pub recipe: FilterRecipe,
}

impl StylePreset {
    /// Create a preset with an empty recipe.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            thumbnail: String::new(),
            recipe: FilterRecipe::identity(),
        }
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the thumbnail URI.
    pub fn thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = thumbnail.into();
        self
    }

    /// Set the recipe.
    pub fn recipe(mut self, recipe: FilterRecipe) -> Self {
        self.recipe = recipe;
        self
    }
}

/// Read-only, ordered collection of style presets.
///
/// There are no mutation methods; build a new catalog with
/// [`CatalogBuilder`] to change it.
#[derive(Debug, Clone)]
pub struct StyleCatalog {
    styles: IndexMap<String, StylePreset>,
}

impl StyleCatalog {
    /// The built-in presets.
    pub fn with_builtins() -> Self {
        let mut styles = IndexMap::new();
        for preset in builtin_presets() {
            styles.insert(preset.id.clone(), preset);
        }
        Self { styles }
    }

    /// Start building a custom catalog.
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    /// All presets in catalog order.
    pub fn list_styles(&self) -> Vec<&StylePreset> {
        self.styles.values().collect()
    }

    /// Iterate presets in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &StylePreset> {
        self.styles.values()
    }

    /// Look up a preset.
    pub fn get(&self, id: &str) -> Option<&StylePreset> {
        self.styles.get(id)
    }

    /// Check if a style is known.
    pub fn contains(&self, id: &str) -> bool {
        self.styles.contains_key(id)
    }

    /// Display name for a style, if known.
    pub fn name_of(&self, id: &str) -> Option<&str> {
        self.styles.get(id).map(|s| s.name.as_str())
    }

    /// Display name for a style, or [`CUSTOM_STYLE_NAME`].
    pub fn display_name(&self, id: &str) -> &str {
        self.name_of(id).unwrap_or(CUSTOM_STYLE_NAME)
    }

    /// Recipe for a style; the identity recipe when unknown.
    pub fn recipe_for(&self, id: &str) -> FilterRecipe {
        self.styles
            .get(id)
            .map(|s| s.recipe.clone())
            .unwrap_or_default()
    }

    /// CSS filter string for a style; empty when unknown.
    pub fn filter_string(&self, id: &str) -> String {
        self.recipe_for(id).to_string()
    }

    /// Number of presets.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

impl Default for StyleCatalog {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Builder for creating a customized catalog.
pub struct CatalogBuilder {
    styles: IndexMap<String, StylePreset>,
    include_builtins: bool,
    error: Option<CatalogError>,
}

impl CatalogBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            styles: IndexMap::new(),
            include_builtins: false,
            error: None,
        }
    }

    /// Start from the built-in presets.
    pub fn with_builtins(mut self, include: bool) -> Self {
        self.include_builtins = include;
        self
    }

    /// Add a preset. Duplicate or empty ids fail at [`build`](Self::build).
    pub fn style(mut self, preset: StylePreset) -> Self {
        if self.error.is_some() {
            return self;
        }
        if preset.id.trim().is_empty() {
            self.error = Some(CatalogError::EmptyId);
        } else if self.styles.contains_key(&preset.id) {
            self.error = Some(CatalogError::DuplicateStyle(preset.id));
        } else {
            self.styles.insert(preset.id.clone(), preset);
        }
        self
    }

    /// Build the catalog.
    pub fn build(self) -> Result<StyleCatalog, CatalogError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if !self.include_builtins {
            return Ok(StyleCatalog {
                styles: self.styles,
            });
        }

        let mut styles = StyleCatalog::with_builtins().styles;
        for (id, preset) in self.styles {
            if styles.contains_key(&id) {
                return Err(CatalogError::DuplicateStyle(id));
            }
            styles.insert(id, preset);
        }
        Ok(StyleCatalog { styles })
    }
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn builtin_presets() -> Vec<StylePreset> {
    vec![
        StylePreset::new("pixar", "Pixar")
            .description("Transform your image in Pixar animation style")
            .thumbnail("https://images.unsplash.com/photo-1535268647677-300dbf3d78d1?auto=format&fit=crop&w=800&q=80")
            .recipe(FilterRecipe::identity().saturate(1.5).contrast(1.2).brightness(1.1)),
        StylePreset::new("anime", "Anime")
            .description("Transform your image in Japanese anime style")
            .thumbnail("https://images.unsplash.com/photo-1472396961693-142e6e269027?auto=format&fit=crop&w=800&q=80")
            .recipe(
                FilterRecipe::identity()
                    .saturate(1.8)
                    .contrast(1.4)
                    .brightness(1.1)
                    .hue_rotate(5.0),
            ),
        StylePreset::new("comic", "Comic Book")
            .description("Transform your image in comic book style")
            .thumbnail("https://images.unsplash.com/photo-1485833077593-4278bba3f11f?auto=format&fit=crop&w=800&q=80")
            .recipe(FilterRecipe::identity().saturate(1.5).contrast(1.5).brightness(1.2)),
        StylePreset::new("watercolor", "Watercolor")
            .description("Transform your image in watercolor painting style")
            .thumbnail("https://images.unsplash.com/photo-1466721591366-2d5fba72006d?auto=format&fit=crop&w=800&q=80")
            .recipe(
                FilterRecipe::identity()
                    .saturate(0.8)
                    .contrast(0.9)
                    .brightness(1.05)
                    .blur(0.5),
            ),
        StylePreset::new("3d", "3D Render")
            .description("Transform your image in 3D rendered style")
            .thumbnail("https://images.unsplash.com/photo-1582562124811-c09040d0a901?auto=format&fit=crop&w=800&q=80")
            .recipe(FilterRecipe::identity().saturate(1.3).contrast(1.2).brightness(1.1)),
        StylePreset::new("mosaic", "Mosaic")
            .description("Transform your image in mosaic tile style")
            .thumbnail("https://images.unsplash.com/photo-1472396961693-142e6e269027?auto=format&fit=crop&w=800&q=80")
            .recipe(FilterRecipe::identity().saturate(1.1).contrast(1.15).brightness(1.05)),
        StylePreset::new("sketch", "Pencil Sketch")
            .description("Transform your image in pencil sketch style")
            .thumbnail("https://images.unsplash.com/photo-1485833077593-4278bba3f11f?auto=format&fit=crop&w=800&q=80")
            .recipe(
                FilterRecipe::identity()
                    .saturate(0.0)
                    .contrast(2.0)
                    .brightness(0.9)
                    .invert(0.02),
            ),
        StylePreset::new("oil", "Oil Painting")
            .description("Transform your image in oil painting style")
            .thumbnail("https://images.unsplash.com/photo-1466721591366-2d5fba72006d?auto=format&fit=crop&w=800&q=80")
            .recipe(
                FilterRecipe::identity()
                    .saturate(1.3)
                    .contrast(1.15)
                    .brightness(1.05)
                    .sepia(0.2),
            ),
    ]
}
