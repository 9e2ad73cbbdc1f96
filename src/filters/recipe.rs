//! Filter recipes: ordered lists of pixel adjustments.
//!
//! A recipe renders to, and parses from, the CSS filter-string form
//! (`saturate(1.5) contrast(1.2) blur(0.5px)`). The empty recipe renders as
//! an empty string and leaves pixels untouched.

use crate::core::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single adjustment step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "amount", rename_all = "snake_case")]
pub enum FilterOp {
    /// Saturation multiplier (0 = grayscale, 1 = unchanged).
    Saturate(f32),
    /// Contrast multiplier around mid-gray.
    Contrast(f32),
    /// Brightness multiplier.
    Brightness(f32),
    /// Hue rotation in degrees.
    HueRotate(f32),
    /// Gaussian blur standard deviation in pixels.
    Blur(f32),
    /// Sepia amount (0..1).
    Sepia(f32),
    /// Inversion amount (0..1).
    Invert(f32),
}

impl FilterOp {
    /// CSS function name.
    pub fn name(&self) -> &'static str {
        match self {
            FilterOp::Saturate(_) => "saturate",
            FilterOp::Contrast(_) => "contrast",
            FilterOp::Brightness(_) => "brightness",
            FilterOp::HueRotate(_) => "hue-rotate",
            FilterOp::Blur(_) => "blur",
            FilterOp::Sepia(_) => "sepia",
            FilterOp::Invert(_) => "invert",
        }
    }

    /// The numeric argument.
    pub fn amount(&self) -> f32 {
        match *self {
            FilterOp::Saturate(v)
            | FilterOp::Contrast(v)
            | FilterOp::Brightness(v)
            | FilterOp::HueRotate(v)
            | FilterOp::Blur(v)
            | FilterOp::Sepia(v)
            | FilterOp::Invert(v) => v,
        }
    }

    /// Whether this step leaves every pixel unchanged.
    pub fn is_noop(&self) -> bool {
        match *self {
            FilterOp::Saturate(v) | FilterOp::Contrast(v) | FilterOp::Brightness(v) => v == 1.0,
            FilterOp::HueRotate(v) => v % 360.0 == 0.0,
            FilterOp::Blur(v) => v <= 0.0,
            FilterOp::Sepia(v) | FilterOp::Invert(v) => v <= 0.0,
        }
    }

    /// Whether the step works on each pixel independently.
    pub fn is_per_pixel(&self) -> bool {
        !matches!(self, FilterOp::Blur(_))
    }

    fn parse(name: &str, arg: &str, source: &str) -> Result<Self, CatalogError> {
        let invalid = |reason: String| CatalogError::InvalidRecipe {
            recipe: source.to_string(),
            reason,
        };
        let arg = arg.trim();

        if name == "hue-rotate" {
            let degrees = if let Some(v) = arg.strip_suffix("deg") {
                parse_number(v)
            } else if let Some(v) = arg.strip_suffix("turn") {
                parse_number(v).map(|t| t * 360.0)
            } else if let Some(v) = arg.strip_suffix("rad") {
                parse_number(v).map(f32::to_degrees)
            } else {
                parse_number(arg)
            };
            return degrees
                .map(FilterOp::HueRotate)
                .ok_or_else(|| invalid(format!("bad angle '{}'", arg)));
        }

        if name == "blur" {
            let px = arg.strip_suffix("px").unwrap_or(arg);
            return match parse_number(px) {
                Some(v) if v >= 0.0 => Ok(FilterOp::Blur(v)),
                _ => Err(invalid(format!("bad blur radius '{}'", arg))),
            };
        }

        let amount = match arg.strip_suffix('%') {
            Some(pct) => parse_number(pct).map(|v| v / 100.0),
            None => parse_number(arg),
        }
        .filter(|v| *v >= 0.0)
        .ok_or_else(|| invalid(format!("bad amount '{}' for {}", arg, name)))?;

        match name {
            "saturate" => Ok(FilterOp::Saturate(amount)),
            "contrast" => Ok(FilterOp::Contrast(amount)),
            "brightness" => Ok(FilterOp::Brightness(amount)),
            "sepia" => Ok(FilterOp::Sepia(amount)),
            "invert" => Ok(FilterOp::Invert(amount)),
            other => Err(invalid(format!("unknown filter '{}'", other))),
        }
    }
}

fn parse_number(s: &str) -> Option<f32> {
    s.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterOp::HueRotate(v) => write!(f, "hue-rotate({}deg)", v),
            FilterOp::Blur(v) => write!(f, "blur({}px)", v),
            other => write!(f, "{}({})", other.name(), other.amount()),
        }
    }
}

/// An ordered sequence of [`FilterOp`]s.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterRecipe {
    ops: Vec<FilterOp>,
}

impl FilterRecipe {
    /// The empty recipe.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Build from explicit steps.
    pub fn from_ops(ops: Vec<FilterOp>) -> Self {
        Self { ops }
    }

    /// Parse a CSS filter string.
    pub fn parse(source: &str) -> Result<Self, CatalogError> {
        let mut ops = Vec::new();
        let mut rest = source.trim();

        while !rest.is_empty() {
            let open = rest.find('(').ok_or_else(|| CatalogError::InvalidRecipe {
                recipe: source.to_string(),
                reason: format!("expected '(' in '{}'", rest),
            })?;
            let close = rest.find(')').ok_or_else(|| CatalogError::InvalidRecipe {
                recipe: source.to_string(),
                reason: "unterminated filter function".to_string(),
            })?;
            if close < open {
                return Err(CatalogError::InvalidRecipe {
                    recipe: source.to_string(),
                    reason: "unbalanced parentheses".to_string(),
                });
            }

            let name = rest[..open].trim().to_lowercase();
            ops.push(FilterOp::parse(&name, &rest[open + 1..close], source)?);
            rest = rest[close + 1..].trim_start();
        }

        Ok(Self { ops })
    }

    /// Append a saturation step.
    pub fn saturate(mut self, amount: f32) -> Self {
        self.ops.push(FilterOp::Saturate(amount));
        self
    }

    /// Append a contrast step.
    pub fn contrast(mut self, amount: f32) -> Self {
        self.ops.push(FilterOp::Contrast(amount));
        self
    }

    /// Append a brightness step.
    pub fn brightness(mut self, amount: f32) -> Self {
        self.ops.push(FilterOp::Brightness(amount));
        self
    }

    /// Append a hue rotation in degrees.
    pub fn hue_rotate(mut self, degrees: f32) -> Self {
        self.ops.push(FilterOp::HueRotate(degrees));
        self
    }

    /// Append a gaussian blur.
    pub fn blur(mut self, px: f32) -> Self {
        self.ops.push(FilterOp::Blur(px));
        self
    }

    /// Append a sepia step.
    pub fn sepia(mut self, amount: f32) -> Self {
        self.ops.push(FilterOp::Sepia(amount));
        self
    }

    /// Append an invert step.
    pub fn invert(mut self, amount: f32) -> Self {
        self.ops.push(FilterOp::Invert(amount));
        self
    }

    /// Steps in application order.
    pub fn ops(&self) -> &[FilterOp] {
        &self.ops
    }

    /// Whether applying the recipe changes nothing.
    pub fn is_identity(&self) -> bool {
        self.ops.iter().all(FilterOp::is_noop)
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether there are no steps.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl fmt::Display for FilterRecipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", op)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for FilterRecipe {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_renders_empty() {
        assert_eq!(FilterRecipe::identity().to_string(), "");
        assert!(FilterRecipe::identity().is_identity());
    }

    #[test]
    fn test_display_css_form() {
        let recipe = FilterRecipe::identity()
            .saturate(1.8)
            .contrast(1.4)
            .brightness(1.1)
            .hue_rotate(5.0);
        assert_eq!(
            recipe.to_string(),
            "saturate(1.8) contrast(1.4) brightness(1.1) hue-rotate(5deg)"
        );

        let blurred = FilterRecipe::identity().contrast(2.0).blur(0.5);
        assert_eq!(blurred.to_string(), "contrast(2) blur(0.5px)");
    }

    #[test]
    fn test_parse_keeps_order() {
        let recipe = FilterRecipe::parse("contrast(1.5) brightness(1.2) saturate(1.5)").unwrap();
        assert_eq!(
            recipe.ops(),
            &[
                FilterOp::Contrast(1.5),
                FilterOp::Brightness(1.2),
                FilterOp::Saturate(1.5)
            ]
        );
    }

    #[test]
    fn test_parse_units() {
        let recipe = FilterRecipe::parse("saturate(150%) hue-rotate(0.5turn) blur(2px) sepia(20%)").unwrap();
        assert_eq!(recipe.ops()[0], FilterOp::Saturate(1.5));
        assert_eq!(recipe.ops()[1], FilterOp::HueRotate(180.0));
        assert_eq!(recipe.ops()[2], FilterOp::Blur(2.0));
        assert_eq!(recipe.ops()[3], FilterOp::Sepia(0.2));
    }

    #[test]
    fn test_parse_errors() {
        assert!(FilterRecipe::parse("sharpen(2)").is_err());
        assert!(FilterRecipe::parse("contrast(").is_err());
        assert!(FilterRecipe::parse("contrast 2").is_err());
        assert!(FilterRecipe::parse("brightness(-1)").is_err());
        assert!(FilterRecipe::parse("blur(abc)").is_err());
        assert!(FilterRecipe::parse("   ").unwrap().is_empty());
    }

    #[test]
    fn test_noop_detection() {
        let recipe = FilterRecipe::identity()
            .saturate(1.0)
            .hue_rotate(360.0)
            .blur(0.0)
            .invert(0.0);
        assert!(recipe.is_identity());
        assert!(!recipe.clone().sepia(0.2).is_identity());
    }

    #[test]
    fn test_serde_shape() {
        let recipe = FilterRecipe::identity().sepia(0.2);
        let json = serde_json::to_string(&recipe).unwrap();
        assert_eq!(json, r#"[{"op":"sepia","amount":0.2}]"#);
    }
}
