//! Color adjustment steps.
//!
//! Every step maps each RGB triple independently, working in 0..1 and
//! clamping the result. Coefficients follow the CSS Filter Effects
//! definitions so a recipe written as a CSS filter string renders the same
//! way here. Alpha is never touched.

use crate::filters::recipe::FilterOp;
use image::RgbaImage;
use rayon::prelude::*;

/// A per-pixel color step reduced to its math.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorTransform {
    /// `out = M * rgb`
    Matrix([[f32; 3]; 3]),
    /// `out = v * slope + intercept`, per channel.
    Linear { slope: f32, intercept: f32 },
}

impl ColorTransform {
    /// Reduce a filter step to its color math. Returns `None` for steps
    /// that are not per-pixel (blur).
    pub fn from_op(op: FilterOp) -> Option<Self> {
        match op {
            FilterOp::Saturate(s) => Some(ColorTransform::Matrix(saturate_matrix(s))),
            FilterOp::HueRotate(deg) => Some(ColorTransform::Matrix(hue_rotate_matrix(deg))),
            FilterOp::Sepia(a) => Some(ColorTransform::Matrix(sepia_matrix(a))),
            FilterOp::Contrast(c) => Some(ColorTransform::Linear {
                slope: c,
                intercept: 0.5 - 0.5 * c,
            }),
            FilterOp::Brightness(b) => Some(ColorTransform::Linear {
                slope: b,
                intercept: 0.0,
            }),
            FilterOp::Invert(a) => {
                let a = a.clamp(0.0, 1.0);
                Some(ColorTransform::Linear {
                    slope: 1.0 - 2.0 * a,
                    intercept: a,
                })
            }
            FilterOp::Blur(_) => None,
        }
    }

    /// Apply to one normalized RGB triple.
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        let out = match self {
            ColorTransform::Matrix(m) => [
                m[0][0] * rgb[0] + m[0][1] * rgb[1] + m[0][2] * rgb[2],
                m[1][0] * rgb[0] + m[1][1] * rgb[1] + m[1][2] * rgb[2],
                m[2][0] * rgb[0] + m[2][1] * rgb[1] + m[2][2] * rgb[2],
            ],
            ColorTransform::Linear { slope, intercept } => [
                rgb[0] * slope + intercept,
                rgb[1] * slope + intercept,
                rgb[2] * slope + intercept,
            ],
        };
        [
            out[0].clamp(0.0, 1.0),
            out[1].clamp(0.0, 1.0),
            out[2].clamp(0.0, 1.0),
        ]
    }

    /// Apply to every pixel of `image` in place.
    pub fn apply_to(&self, image: &mut RgbaImage) {
        let buffer: &mut [u8] = image;
        buffer.par_chunks_mut(4).for_each(|px| {
            let rgb = [to_unit(px[0]), to_unit(px[1]), to_unit(px[2])];
            let out = self.apply(rgb);
            px[0] = from_unit(out[0]);
            px[1] = from_unit(out[1]);
            px[2] = from_unit(out[2]);
        });
    }
}

fn to_unit(v: u8) -> f32 {
    v as f32 / 255.0
}

fn from_unit(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

fn saturate_matrix(s: f32) -> [[f32; 3]; 3] {
    [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ]
}

fn hue_rotate_matrix(degrees: f32) -> [[f32; 3]; 3] {
    let (sin, cos) = degrees.to_radians().sin_cos();
    [
        [
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
        ],
        [
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
        ],
        [
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
        ],
    ]
}

fn sepia_matrix(amount: f32) -> [[f32; 3]; 3] {
    let k = 1.0 - amount.clamp(0.0, 1.0);
    [
        [0.393 + 0.607 * k, 0.769 - 0.769 * k, 0.189 - 0.189 * k],
        [0.349 - 0.349 * k, 0.686 + 0.314 * k, 0.168 - 0.168 * k],
        [0.272 - 0.272 * k, 0.534 - 0.534 * k, 0.131 + 0.869 * k],
    ]
}
