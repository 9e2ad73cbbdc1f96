//! Built-in pixel operations.
//!
//! This module turns a [`FilterRecipe`] into pixels. Steps run one after the
//! other over the whole buffer, with values quantized back to 8 bits between
//! steps, so the output is deterministic for a given input and recipe.

mod blur;
mod color;

use crate::filters::recipe::{FilterOp, FilterRecipe};
use image::{DynamicImage, RgbaImage};

pub use blur::gaussian_blur;
pub use color::ColorTransform;

/// Apply a single step in place.
pub fn apply_op(image: &mut RgbaImage, op: FilterOp) {
    if op.is_noop() {
        return;
    }
    match ColorTransform::from_op(op) {
        Some(transform) => transform.apply_to(image),
        None => {
            if let FilterOp::Blur(sigma) = op {
                *image = gaussian_blur(image, sigma);
            }
        }
    }
}

/// Render `recipe` over `image`.
///
/// The output always has the input's dimensions. An identity recipe returns
/// the input's pixels unchanged.
pub fn apply_recipe(image: &DynamicImage, recipe: &FilterRecipe) -> RgbaImage {
    let mut buffer = image.to_rgba8();
    for op in recipe.ops() {
        log::trace!("applying {}", op);
        apply_op(&mut buffer, *op);
    }
    buffer
}
